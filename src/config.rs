//! Runtime arena configuration loaded from `assets/arena.toml`.
//!
//! [`ArenaConfig`] is a Bevy [`Resource`] that mirrors the tunable constants in
//! [`crate::constants`].  At startup, [`load_arena_config`] reads
//! `assets/arena.toml` and overwrites the defaults with any values present in
//! the file.  Missing keys fall back to the compile-time defaults, so a minimal
//! TOML can override just the values you care about.
//!
//! ## Usage in systems
//!
//! Add `config: Res<ArenaConfig>` to any system parameter list and read values
//! with `config.laser_speed`, `config.enemy_max_speed`, etc.
//!
//! Keep `src/constants.rs` in sync: it remains the **authoritative default**
//! source used by `ArenaConfig::default()`.

use crate::constants::*;
use crate::error::{
    validate_extent, validate_non_negative, validate_positive, ArenaError, ArenaResult,
};
use bevy::prelude::*;
use serde::Deserialize;

/// Default location of the override file, relative to the working directory.
pub const ARENA_CONFIG_PATH: &str = "assets/arena.toml";

/// Runtime-tunable arena physics and gameplay configuration.
#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    // ── World Bounds ─────────────────────────────────────────────────────────
    pub arena_width: f64,
    pub arena_height: f64,
    /// Seed for [`crate::arena::ArenaRng`]; `None` seeds from entropy.
    pub rng_seed: Option<u64>,
    pub players: u32,

    // ── Spatial Grid ──────────────────────────────────────────────────────────
    pub grid_cell_size: f64,

    // ── Collision ─────────────────────────────────────────────────────────────
    pub impact_force_per_hit_point: f64,

    // ── Asteroids ─────────────────────────────────────────────────────────────
    pub asteroid_max_speed: i32,

    // ── Lasers ────────────────────────────────────────────────────────────────
    pub laser_speed: f64,
    pub laser_damage: u32,

    // ── Player Ship ───────────────────────────────────────────────────────────
    pub ship_hull: u32,
    pub ship_weapon_count: usize,
    pub ship_laser_delay: f64,
    pub ship_max_acceleration: f64,

    // ── Enemy Ships ───────────────────────────────────────────────────────────
    pub enemy_hull: u32,
    pub enemy_max_speed: f64,
    pub enemy_max_acceleration: f64,
    pub enemy_slow_radius: f64,
    pub enemy_arrive_radius: f64,
    pub enemy_aim_rate: f64,
    pub patrol_min_hop: f64,
    pub probe_base_length: f64,
    pub probe_lookahead_secs: f64,
    pub probe_half_angle_deg: f64,

    // ── Waves ─────────────────────────────────────────────────────────────────
    pub wave_break_secs: f64,
    pub mission_reset_secs: f64,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            // World Bounds
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            rng_seed: None,
            players: DEFAULT_PLAYERS,
            // Spatial Grid
            grid_cell_size: GRID_CELL_SIZE,
            // Collision
            impact_force_per_hit_point: IMPACT_FORCE_PER_HIT_POINT,
            // Asteroids
            asteroid_max_speed: ASTEROID_MAX_SPEED,
            // Lasers
            laser_speed: LASER_SPEED,
            laser_damage: LASER_DAMAGE,
            // Player Ship
            ship_hull: SHIP_HULL,
            ship_weapon_count: SHIP_WEAPON_COUNT,
            ship_laser_delay: SHIP_LASER_DELAY,
            ship_max_acceleration: SHIP_MAX_ACCELERATION,
            // Enemy Ships
            enemy_hull: ENEMY_HULL,
            enemy_max_speed: ENEMY_MAX_SPEED,
            enemy_max_acceleration: ENEMY_MAX_ACCELERATION,
            enemy_slow_radius: ENEMY_SLOW_RADIUS,
            enemy_arrive_radius: ENEMY_ARRIVE_RADIUS,
            enemy_aim_rate: ENEMY_AIM_RATE,
            patrol_min_hop: PATROL_MIN_HOP,
            probe_base_length: PROBE_BASE_LENGTH,
            probe_lookahead_secs: PROBE_LOOKAHEAD_SECS,
            probe_half_angle_deg: PROBE_HALF_ANGLE_DEG,
            // Waves
            wave_break_secs: WAVE_BREAK_SECS,
            mission_reset_secs: MISSION_RESET_SECS,
        }
    }
}

impl ArenaConfig {
    /// Parse a TOML document; keys not present keep their defaults.
    pub fn from_toml_str(path: &str, contents: &str) -> ArenaResult<Self> {
        let config: ArenaConfig =
            toml::from_str(contents).map_err(|e| ArenaError::ConfigParse {
                path: path.to_string(),
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> ArenaResult<()> {
        validate_extent(self.arena_width, self.arena_height)?;
        validate_positive("players", self.players as f64)?;
        validate_positive("grid_cell_size", self.grid_cell_size)?;
        validate_positive("impact_force_per_hit_point", self.impact_force_per_hit_point)?;
        validate_positive("asteroid_max_speed", self.asteroid_max_speed as f64)?;
        validate_positive("laser_speed", self.laser_speed)?;
        validate_positive("ship_hull", self.ship_hull as f64)?;
        validate_non_negative("ship_laser_delay", self.ship_laser_delay)?;
        validate_non_negative("ship_max_acceleration", self.ship_max_acceleration)?;
        validate_positive("enemy_hull", self.enemy_hull as f64)?;
        validate_non_negative("enemy_max_speed", self.enemy_max_speed)?;
        validate_non_negative("enemy_max_acceleration", self.enemy_max_acceleration)?;
        validate_positive("enemy_arrive_radius", self.enemy_arrive_radius)?;
        if self.enemy_slow_radius <= self.enemy_arrive_radius {
            return Err(ArenaError::InvalidConfig {
                name: "enemy_slow_radius",
                value: self.enemy_slow_radius,
                expected: "(enemy_arrive_radius, ∞)",
            });
        }
        validate_non_negative("enemy_aim_rate", self.enemy_aim_rate)?;
        validate_non_negative("patrol_min_hop", self.patrol_min_hop)?;
        validate_non_negative("probe_base_length", self.probe_base_length)?;
        validate_non_negative("probe_lookahead_secs", self.probe_lookahead_secs)?;
        if !(0.0..90.0).contains(&self.probe_half_angle_deg) {
            return Err(ArenaError::InvalidConfig {
                name: "probe_half_angle_deg",
                value: self.probe_half_angle_deg,
                expected: "[0.0, 90.0)",
            });
        }
        validate_non_negative("wave_break_secs", self.wave_break_secs)?;
        validate_non_negative("mission_reset_secs", self.mission_reset_secs)?;
        Ok(())
    }
}

/// Startup system: attempt to load `assets/arena.toml` and overwrite the
/// `ArenaConfig` resource with the values in the file.
///
/// Parse and validation errors are logged and the compiled defaults stay in
/// place.  A missing file is not an error.
pub fn load_arena_config(mut config: ResMut<ArenaConfig>) {
    let path = ARENA_CONFIG_PATH;
    match std::fs::read_to_string(path) {
        Ok(contents) => match ArenaConfig::from_toml_str(path, &contents) {
            Ok(loaded) => {
                *config = loaded;
                info!("Loaded arena config from {path}");
            }
            Err(e) => {
                warn!("{e}; using defaults");
            }
        },
        Err(_) => {
            info!("No {path} found; using compiled defaults");
        }
    }
}
