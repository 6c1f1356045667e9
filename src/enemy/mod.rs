//! Enemy ships: spawning, per-wave difficulty, movement and weapons.
//!
//! ## Sub-module layout
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`movement`] | patrol state machine, arrival steering, forward probe |
//! | [`targeting`] | lead prediction, turret slewing, firing |

pub mod movement;
pub mod targeting;

pub use movement::{enemy_movement_system, EnemyPilot, MoveState};
pub use targeting::{enemy_weapon_system, EnemyTurret};

use crate::arena::{ArenaBounds, FlightCollider};
use crate::config::ArenaConfig;
use crate::constants::{
    DIFFICULTY_CYCLE, ENEMY_FORMATION_ROW, ENEMY_FORMATION_SPACING, ENEMY_FORMATION_TOP,
    ENEMY_HOLD_DELAY, ENEMY_INITIAL_FIRE_DELAY, ENEMY_LASER_DELAY, ENEMY_LASER_DELAY_STEP,
    ENEMY_LATER_INITIAL_FIRE_DELAY, ENEMY_SIDE,
};
use crate::damage::Hull;
use crate::kinematics::{BodySize, KinematicBody};
use bevy::math::DVec2;
use bevy::prelude::*;
use rand::Rng;

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct EnemyShip;

/// Difficulty knobs handed to every enemy of one wave.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyWaveConfig {
    pub hold_position_delay: f64,
    pub initial_fire_delay: f64,
    pub laser_delay: f64,
    pub max_aiming_iterations: u32,
}

impl EnemyWaveConfig {
    /// Difficulty ramps over a five-wave cycle, then resets with one more
    /// ship per wave.  Wave numbers start at 1.
    pub fn for_wave(wave: u32) -> Self {
        let step = wave.saturating_sub(1) % DIFFICULTY_CYCLE;
        Self {
            hold_position_delay: ENEMY_HOLD_DELAY - step as f64,
            initial_fire_delay: if wave <= 1 {
                ENEMY_INITIAL_FIRE_DELAY
            } else {
                ENEMY_LATER_INITIAL_FIRE_DELAY
            },
            laser_delay: ENEMY_LASER_DELAY - ENEMY_LASER_DELAY_STEP * step as f64,
            max_aiming_iterations: match step {
                0 => 0,
                1 | 2 => 1,
                _ => 5,
            },
        }
    }

    pub fn ship_count(wave: u32) -> u32 {
        wave.saturating_sub(1) / DIFFICULTY_CYCLE + 1
    }
}

pub fn spawn_enemy_ship(
    commands: &mut Commands,
    rng: &mut impl Rng,
    bounds: &ArenaBounds,
    config: &ArenaConfig,
    position: DVec2,
    wave_config: EnemyWaveConfig,
) -> Entity {
    let patrol = movement::pick_patrol_point(rng, bounds, position, config.patrol_min_hop);
    commands
        .spawn((
            EnemyShip,
            EnemyPilot::new(patrol, wave_config.hold_position_delay),
            EnemyTurret::new(
                wave_config.initial_fire_delay,
                wave_config.laser_delay,
                wave_config.max_aiming_iterations,
            ),
            Hull::new(config.enemy_hull),
            KinematicBody::new(position, DVec2::ZERO, BodySize::square(ENEMY_SIDE)),
            FlightCollider,
        ))
        .id()
}

/// Formation slots for `count` ships: rows of ten, centred horizontally,
/// starting near the top edge.
pub fn formation_positions(bounds: &ArenaBounds, count: u32) -> Vec<DVec2> {
    let row_len = count.min(ENEMY_FORMATION_ROW).max(1);
    let left = bounds.width() / 2.0 - (row_len - 1) as f64 * ENEMY_FORMATION_SPACING / 2.0;
    (0..count)
        .map(|i| {
            let column = i % ENEMY_FORMATION_ROW;
            let row = i / ENEMY_FORMATION_ROW;
            DVec2::new(
                left + column as f64 * ENEMY_FORMATION_SPACING,
                ENEMY_FORMATION_TOP + row as f64 * ENEMY_FORMATION_SPACING,
            )
        })
        .collect()
}

/// Spawn the enemy wave `wave`.  Returns how many ships were spawned.
pub fn spawn_enemy_wave(
    commands: &mut Commands,
    rng: &mut impl Rng,
    bounds: &ArenaBounds,
    config: &ArenaConfig,
    wave: u32,
) -> u32 {
    let wave_config = EnemyWaveConfig::for_wave(wave);
    let count = EnemyWaveConfig::ship_count(wave);
    for position in formation_positions(bounds, count) {
        spawn_enemy_ship(commands, rng, bounds, config, position, wave_config);
    }
    count
}
