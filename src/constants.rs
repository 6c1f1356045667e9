//! Centralised arena physics and gameplay constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place without source-diving across multiple modules.
//!
//! ## Tuning guidance
//!
//! Each constant notes the observable consequence of changing it.  Most of
//! them are mirrored by [`crate::config::ArenaConfig`] so they can be
//! overridden from `assets/arena.toml` without recompiling; this file stays
//! the authoritative default.
//!
//! Units: pixels (px) for distances, px/s for speeds, seconds for timers and
//! degrees for angles.  Screen-style coordinates: +y points *down*.

// ── World Bounds ──────────────────────────────────────────────────────────────

/// Width of the flight arena (px).  The arena is one half of a 1920 px wide
/// two-pane display; the other half belongs to the ship interior.
pub const ARENA_WIDTH: f64 = 960.0;

/// Height of the flight arena (px).
pub const ARENA_HEIGHT: f64 = 1080.0;

/// Number of players sharing one mission.  Scales the asteroid wave size.
pub const DEFAULT_PLAYERS: u32 = 1;

// ── Spatial Grid ──────────────────────────────────────────────────────────────

/// World-space size of each broad-phase grid cell (px).
///
/// Should be at least the side of the largest body so a collision query only
/// has to look at the 3×3 neighbourhood.
pub const GRID_CELL_SIZE: f64 = 128.0;

/// Largest body extent in the arena (px).  Added to query radii so the grid
/// never misses a candidate whose centre sits in a farther cell.
pub const MAX_BODY_EXTENT: f64 = 64.0;

// ── Collision ─────────────────────────────────────────────────────────────────

/// Fallback collision normal angle (radians) used when two centres coincide
/// exactly and `atan2(0, 0)` carries no direction.  Points along +x.
pub const COINCIDENT_NORMAL_ANGLE: f64 = 0.0;

/// Collision force that converts into one hit point against a ship hull.
///
/// `hit_points = floor(force / IMPACT_FORCE_PER_HIT_POINT)`.  A 1200 px² ship
/// stopped dead from 50 px/s takes 60 000 force → 3 hit points.
pub const IMPACT_FORCE_PER_HIT_POINT: f64 = 20_000.0;

// ── Asteroids ─────────────────────────────────────────────────────────────────

/// Maximum per-axis asteroid speed (px/s).  Spawn velocities are whole
/// numbers drawn from `[-ASTEROID_MAX_SPEED, ASTEROID_MAX_SPEED]`, never both 0.
pub const ASTEROID_MAX_SPEED: i32 = 120;

/// Side length (px) of each asteroid size class.  Mass is side².
pub const SMALL_ASTEROID_SIDE: u32 = 24;
pub const MEDIUM_ASTEROID_SIDE: u32 = 40;
pub const BIG_ASTEROID_SIDE: u32 = 64;

/// Single-collision force that shatters an asteroid of each size.
///
/// Damage is not cumulative: only one impact above the threshold breaks it.
/// Lowering these makes asteroid fields collapse into debris very quickly.
pub const SMALL_ASTEROID_BREAK_FORCE: f64 = 125_000.0;
pub const MEDIUM_ASTEROID_BREAK_FORCE: f64 = 250_000.0;
pub const BIG_ASTEROID_BREAK_FORCE: f64 = 500_000.0;

/// Fraction of the arena height (from the top) where asteroid waves spawn.
pub const ASTEROID_SPAWN_BAND: f64 = 0.1;

// ── Lasers ────────────────────────────────────────────────────────────────────

/// Laser speed (px/s).  Also the projectile speed used by enemy lead prediction.
pub const LASER_SPEED: f64 = 1000.0;

/// Hit points dealt by one laser hit.
pub const LASER_DAMAGE: u32 = 1;

/// Side length (px) of the laser hit box.
pub const LASER_SIDE: u32 = 6;

// ── Player Ship ───────────────────────────────────────────────────────────────

/// Starting hull of the player ship.
pub const SHIP_HULL: u32 = 10;

/// Number of independently aimed weapon mounts.
pub const SHIP_WEAPON_COUNT: usize = 2;

/// Seconds between consecutive shots from one mount.
pub const SHIP_LASER_DELAY: f64 = 0.5;

/// Velocity change per frame at full thrust (px/s per frame, per axis).
pub const SHIP_MAX_ACCELERATION: f64 = 5.0;

/// Per-axis range of the player ship's spawn drift (px/s).
pub const SHIP_INITIAL_DRIFT: f64 = 5.0;

/// Minimum spawn drift speed (px/s); rerolled until reached.
pub const SHIP_MIN_DRIFT_SPEED: f64 = 1.0;

/// Player ship hit box (px).
pub const SHIP_WIDTH: u32 = 30;
pub const SHIP_HEIGHT: u32 = 40;

// ── Enemy Ships: Movement ─────────────────────────────────────────────────────

/// Starting hull of an enemy ship.
pub const ENEMY_HULL: u32 = 3;

/// Enemy ship hit box side (px).
pub const ENEMY_SIDE: u32 = 32;

/// Cruise speed toward a patrol point (px/s).
pub const ENEMY_MAX_SPEED: f64 = 300.0;

/// Largest velocity change per frame (px/s).  Not scaled by dt.
pub const ENEMY_MAX_ACCELERATION: f64 = 5.0;

/// Inside this distance (px) the desired speed ramps down linearly.
pub const ENEMY_SLOW_RADIUS: f64 = 150.0;

/// Inside this distance (px) the enemy counts as arrived and wants zero speed.
pub const ENEMY_ARRIVE_RADIUS: f64 = 10.0;

/// Below this speed (px/s) an arrived enemy settles into holding position.
pub const ENEMY_HOLD_SPEED: f64 = 0.5;

/// Below this speed (px/s) an avoiding enemy has stopped and re-plans.
/// Also the minimum speed for the probe to trigger avoidance at all.
pub const ENEMY_STOPPED_SPEED: f64 = 0.1;

/// Minimum distance (px) between successive patrol points.
pub const PATROL_MIN_HOP: f64 = 150.0;

/// Random jitter (px) applied around a quadrant post.
pub const PATROL_JITTER_X: f64 = 20.0;
pub const PATROL_JITTER_Y: f64 = 30.0;

/// Attempts at finding a patrol point far enough from the previous one before
/// accepting the last draw.  Only tiny arenas ever exhaust this.
pub const PATROL_PICK_ATTEMPTS: u32 = 32;

/// Probe wedge length at rest (px).
pub const PROBE_BASE_LENGTH: f64 = 40.0;

/// Extra probe length per px/s of speed, i.e. the look-ahead horizon in seconds.
pub const PROBE_LOOKAHEAD_SECS: f64 = 0.5;

/// Half-angle of the probe wedge (degrees).
pub const PROBE_HALF_ANGLE_DEG: f64 = 30.0;

// ── Enemy Ships: Weapons ──────────────────────────────────────────────────────

/// Turret slew rate (degrees per second).
pub const ENEMY_AIM_RATE: f64 = 120.0;

/// Turret angle at spawn (degrees, pointing "up" the screen).
pub const ENEMY_INITIAL_AIM: f64 = 90.0;

/// Largest aim error (degrees) at which the turret is allowed to fire.
pub const ENEMY_FIRE_ALIGNMENT: f64 = 0.5;

/// Two successive intercept predictions closer than this (px) have converged.
pub const AIM_CONVERGENCE: f64 = 10.0;

/// Upper bound on lead-prediction iterations.
pub const MAX_AIMING_ITERATIONS: u32 = 5;

/// Wave-one defaults for the per-wave enemy timers (seconds).
pub const ENEMY_HOLD_DELAY: f64 = 5.0;
pub const ENEMY_INITIAL_FIRE_DELAY: f64 = 6.0;
pub const ENEMY_LATER_INITIAL_FIRE_DELAY: f64 = 3.0;
pub const ENEMY_LASER_DELAY: f64 = 3.0;

/// Reload time shaved off per difficulty step (seconds).
pub const ENEMY_LASER_DELAY_STEP: f64 = 0.5;

// ── Waves ─────────────────────────────────────────────────────────────────────

/// Difficulty repeats every this many waves, with one extra enemy per cycle.
pub const DIFFICULTY_CYCLE: u32 = 5;

/// Horizontal and vertical spacing (px) of an enemy wave formation.
pub const ENEMY_FORMATION_SPACING: f64 = 40.0;

/// Y coordinate (px) of the first enemy formation row.
pub const ENEMY_FORMATION_TOP: f64 = 30.0;

/// Enemies per formation row.
pub const ENEMY_FORMATION_ROW: u32 = 10;

/// Pause between a cleared wave and the next one (seconds).
pub const WAVE_BREAK_SECS: f64 = 3.0;

/// Pause between losing the player ship and clearing the arena (seconds).
pub const MISSION_RESET_SECS: f64 = 3.0;
