//! Player ship components.
//!
//! Systems that mutate this state are in the sibling modules:
//! - [`super::combat`]: crew commands, weapon reload

use crate::constants::SHIP_WEAPON_COUNT;
use rand::Rng;
use bevy::prelude::*;

/// One independently aimed laser mount.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponMount {
    pub enabled: bool,
    /// Degrees, counter-clockwise from +x with screen-y pointing down.
    pub aim_angle: f64,
    /// Seconds until this mount may fire again; clamped at 0.
    pub fire_timer: f64,
}

impl Default for WeaponMount {
    fn default() -> Self {
        Self {
            enabled: true,
            aim_angle: 0.0,
            fire_timer: 0.0,
        }
    }
}

impl WeaponMount {
    pub fn ready(&self) -> bool {
        self.enabled && self.fire_timer <= 0.0
    }
}

/// The crewed ship.  Hull lives in [`crate::damage::Hull`]; this component
/// tracks the subsystems damage can knock out before the hull takes a hit.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct PlayerShip {
    pub engine_enabled: bool,
    pub weapons: Vec<WeaponMount>,
}

impl Default for PlayerShip {
    fn default() -> Self {
        Self::with_weapons(SHIP_WEAPON_COUNT)
    }
}

impl PlayerShip {
    pub fn with_weapons(count: usize) -> Self {
        Self {
            engine_enabled: true,
            weapons: vec![WeaponMount::default(); count],
        }
    }

    /// Let working subsystems soak up hit points before the hull does.
    ///
    /// The engine and then each weapon in turn is knocked out on a coin flip,
    /// costing one hit point each.  Subsystems that are already down are
    /// skipped and absorb nothing.  Returns the hit points left for the hull.
    pub fn absorb_subsystem_damage(&mut self, hit_points: u32, rng: &mut impl Rng) -> u32 {
        let mut remaining = hit_points;

        if self.engine_enabled && remaining > 0 && rng.gen_bool(0.5) {
            self.engine_enabled = false;
            remaining -= 1;
            debug!("Engine knocked out");
        }

        for (index, weapon) in self.weapons.iter_mut().enumerate() {
            if weapon.enabled && remaining > 0 && rng.gen_bool(0.5) {
                weapon.enabled = false;
                remaining -= 1;
                debug!("Weapon {index} knocked out");
            }
        }

        remaining
    }

    pub fn repair_engine(&mut self) {
        self.engine_enabled = true;
    }

    /// Returns `false` for a mount index the ship does not have.
    pub fn repair_weapon(&mut self, index: usize) -> bool {
        match self.weapons.get_mut(index) {
            Some(weapon) => {
                weapon.enabled = true;
                true
            }
            None => false,
        }
    }

    /// Count every reload timer down by `dt`, clamping at zero.
    pub fn tick_weapons(&mut self, dt: f64) {
        for weapon in &mut self.weapons {
            weapon.fire_timer = (weapon.fire_timer - dt).max(0.0);
        }
    }
}
