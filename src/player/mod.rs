//! Player module: the crewed ship and the commands its consoles send.
//!
//! ## Sub-module layout
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`state`] | `PlayerShip` component: engine, weapon mounts, subsystem damage and repair |
//! | [`combat`] | `ShipCommand` handling (thrust, aim, fire, repair) and weapon reload |
//!
//! All public items are re-exported at this level so that the rest of the crate
//! can use flat `crate::player::*` imports.

pub mod combat;
pub mod state;

pub use combat::{ship_command_system, weapon_reload_system, ShipCommand};
pub use state::{PlayerShip, WeaponMount};

// ── Ship spawn ─────────────────────────────────────────────────────────────────

use crate::arena::{ArenaBounds, FlightCollider};
use crate::config::ArenaConfig;
use crate::constants::{SHIP_HEIGHT, SHIP_INITIAL_DRIFT, SHIP_MIN_DRIFT_SPEED, SHIP_WIDTH};
use crate::damage::Hull;
use crate::kinematics::{BodySize, KinematicBody};
use bevy::math::DVec2;
use bevy::prelude::*;
use rand::Rng;

/// Small random starting drift so the ship is never perfectly still.
pub fn initial_drift(rng: &mut impl Rng) -> DVec2 {
    loop {
        let drift = DVec2::new(
            rng.gen_range(-SHIP_INITIAL_DRIFT..SHIP_INITIAL_DRIFT),
            rng.gen_range(-SHIP_INITIAL_DRIFT..SHIP_INITIAL_DRIFT),
        );
        if drift.length() >= SHIP_MIN_DRIFT_SPEED {
            return drift;
        }
    }
}

/// Spawn the player's ship at the arena centre.
pub fn spawn_player_ship(
    commands: &mut Commands,
    rng: &mut impl Rng,
    bounds: &ArenaBounds,
    config: &ArenaConfig,
) -> Entity {
    let entity = commands
        .spawn((
            PlayerShip::with_weapons(config.ship_weapon_count),
            Hull::new(config.ship_hull),
            KinematicBody::new(
                bounds.center(),
                initial_drift(rng),
                BodySize::new(SHIP_WIDTH, SHIP_HEIGHT),
            ),
            FlightCollider,
        ))
        .id();
    info!("Player ship spawned at {:?}", bounds.center());
    entity
}
