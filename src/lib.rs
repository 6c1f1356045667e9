//! Flight arena engine library
//!
//! Headless 2-D arena simulation: kinematic bodies in a wrapping arena,
//! normal-only elastic collisions, asteroid fragmentation, ship damage and
//! combat AI, all driven through Bevy ECS systems.

pub mod arena;
pub mod asteroid;
pub mod collision;
pub mod config;
pub mod constants;
pub mod damage;
pub mod enemy;
pub mod error;
pub mod kinematics;
pub mod laser;
pub mod mission;
pub mod player;
pub mod simulation;
pub mod spatial_partition;
