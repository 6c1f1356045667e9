//! Simulation plugin: registers the arena's resources and messages and
//! orders the per-frame pipeline.
//!
//! One frame runs, in order:
//!
//! 1. [`FlightSet::Steer`]: reload timers, player commands, enemy AI
//! 2. [`FlightSet::Integrate`]: advance positions and wrap at the edges
//! 3. [`FlightSet::Collide`]: grid rebuild, elastic resolution, laser hits
//! 4. [`FlightSet::Damage`]: impact forces to hit points, hull loss
//! 5. [`FlightSet::Cascade`]: splits, explosions, population events
//! 6. [`FlightSet::Missions`]: mission start, wave progression, resets

use crate::arena::{setup_arena_context, ArenaBounds, ArenaEvent, ArenaRng};
use crate::collision::{resolve_collisions_system, ImpactMessage};
use crate::config::{load_arena_config, ArenaConfig};
use crate::damage::{apply_damage_system, destruction_cascade_system, impact_damage_system, DamageMessage};
use crate::enemy::{enemy_movement_system, enemy_weapon_system};
use crate::kinematics::{integrate_bodies_system, wrap_bodies_system};
use crate::laser::laser_hit_system;
use crate::mission::{
    mission_director_system, mission_start_system, population_tracking_system, MissionDirector,
    MissionRequest, MissionStatus,
};
use crate::player::{ship_command_system, weapon_reload_system, ShipCommand};
use crate::spatial_partition::{rebuild_spatial_grid_system, SpatialGrid};
use bevy::prelude::*;

#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlightSet {
    Steer,
    Integrate,
    Collide,
    Damage,
    Cascade,
    Missions,
}

pub struct FlightSimulationPlugin {
    /// Read `assets/arena.toml` at startup.  Tests turn this off and insert
    /// their own `ArenaConfig` before adding the plugin.
    pub load_config_file: bool,
}

impl Default for FlightSimulationPlugin {
    fn default() -> Self {
        Self {
            load_config_file: true,
        }
    }
}

impl Plugin for FlightSimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ArenaConfig>()
            .init_resource::<ArenaBounds>()
            .init_resource::<ArenaRng>()
            .init_resource::<SpatialGrid>()
            .init_resource::<MissionDirector>()
            .add_message::<ImpactMessage>()
            .add_message::<DamageMessage>()
            .add_message::<ArenaEvent>()
            .add_message::<ShipCommand>()
            .add_message::<MissionRequest>()
            .add_message::<MissionStatus>()
            .configure_sets(
                Update,
                (
                    FlightSet::Steer,
                    FlightSet::Integrate,
                    FlightSet::Collide,
                    FlightSet::Damage,
                    FlightSet::Cascade,
                    FlightSet::Missions,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (
                    // Enemy probes read the grid, so it is rebuilt here and
                    // again after integration for the collision pass.
                    rebuild_spatial_grid_system,
                    weapon_reload_system,
                    ship_command_system,
                    enemy_movement_system,
                    enemy_weapon_system,
                )
                    .chain()
                    .in_set(FlightSet::Steer),
            )
            .add_systems(
                Update,
                (integrate_bodies_system, wrap_bodies_system)
                    .chain()
                    .in_set(FlightSet::Integrate),
            )
            .add_systems(
                Update,
                (rebuild_spatial_grid_system, resolve_collisions_system, laser_hit_system)
                    .chain()
                    .in_set(FlightSet::Collide),
            )
            .add_systems(
                Update,
                (impact_damage_system, apply_damage_system)
                    .chain()
                    .in_set(FlightSet::Damage),
            )
            .add_systems(Update, destruction_cascade_system.in_set(FlightSet::Cascade))
            .add_systems(
                Update,
                (
                    population_tracking_system,
                    mission_director_system,
                    mission_start_system,
                )
                    .chain()
                    .in_set(FlightSet::Missions),
            );

        if self.load_config_file {
            app.add_systems(Startup, (load_arena_config, setup_arena_context).chain());
        } else {
            app.add_systems(Startup, setup_arena_context);
        }
    }
}
