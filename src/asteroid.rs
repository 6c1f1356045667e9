//! Asteroid component and utilities
//!
//! Asteroids come in three sizes.  A hard enough single impact shatters one:
//! big and medium asteroids break into two of the next size down, small ones
//! turn into debris.

use crate::arena::{ArenaBounds, FlightCollider};
use crate::config::ArenaConfig;
use crate::constants::{
    ASTEROID_SPAWN_BAND, BIG_ASTEROID_BREAK_FORCE, BIG_ASTEROID_SIDE, MEDIUM_ASTEROID_BREAK_FORCE,
    MEDIUM_ASTEROID_SIDE, SMALL_ASTEROID_BREAK_FORCE, SMALL_ASTEROID_SIDE,
};
use crate::kinematics::{BodySize, KinematicBody};
use bevy::math::DVec2;
use bevy::prelude::*;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AsteroidSize {
    Small,
    Medium,
    Big,
}

impl AsteroidSize {
    /// Size of the two fragments a shattered asteroid leaves behind.
    /// `None` for `Small`: nothing is smaller.
    pub fn smaller(self) -> Option<AsteroidSize> {
        match self {
            AsteroidSize::Small => None,
            AsteroidSize::Medium => Some(AsteroidSize::Small),
            AsteroidSize::Big => Some(AsteroidSize::Medium),
        }
    }

    pub fn body_size(self) -> BodySize {
        match self {
            AsteroidSize::Small => BodySize::square(SMALL_ASTEROID_SIDE),
            AsteroidSize::Medium => BodySize::square(MEDIUM_ASTEROID_SIDE),
            AsteroidSize::Big => BodySize::square(BIG_ASTEROID_SIDE),
        }
    }

    /// Minimum single-collision force that shatters this size.
    pub fn break_force(self) -> f64 {
        match self {
            AsteroidSize::Small => SMALL_ASTEROID_BREAK_FORCE,
            AsteroidSize::Medium => MEDIUM_ASTEROID_BREAK_FORCE,
            AsteroidSize::Big => BIG_ASTEROID_BREAK_FORCE,
        }
    }

    pub fn breaks_under(self, force: f64) -> bool {
        force >= self.break_force()
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Asteroid {
    pub size: AsteroidSize,
}

/// Whole-number velocity in `[-max_speed, max_speed]` per axis, rerolled
/// until at least one axis moves.
pub fn random_asteroid_velocity(rng: &mut impl Rng, max_speed: i32) -> DVec2 {
    let max_speed = max_speed.max(1);
    loop {
        let dx = rng.gen_range(-max_speed..=max_speed);
        let dy = rng.gen_range(-max_speed..=max_speed);
        if dx != 0 || dy != 0 {
            return DVec2::new(dx as f64, dy as f64);
        }
    }
}

pub fn spawn_asteroid(
    commands: &mut Commands,
    size: AsteroidSize,
    position: DVec2,
    velocity: DVec2,
) -> Entity {
    commands
        .spawn((
            Asteroid { size },
            KinematicBody::new(position, velocity, size.body_size()),
            FlightCollider,
        ))
        .id()
}

/// Spawn the two fragments of a shattered asteroid at its centre.  Returns
/// `None` when a small asteroid shatters into nothing.
pub fn split_asteroid(
    commands: &mut Commands,
    rng: &mut impl Rng,
    config: &ArenaConfig,
    size: AsteroidSize,
    position: DVec2,
) -> Option<(AsteroidSize, [Entity; 2])> {
    let child_size = size.smaller()?;
    let children = [0, 1].map(|_| {
        let velocity = random_asteroid_velocity(rng, config.asteroid_max_speed);
        spawn_asteroid(commands, child_size, position, velocity)
    });
    Some((child_size, children))
}

/// Asteroid wave `wave`: `wave × players` big asteroids scattered along the
/// top band of the arena.  Returns how many were spawned.
pub fn spawn_asteroid_wave(
    commands: &mut Commands,
    rng: &mut impl Rng,
    bounds: &ArenaBounds,
    config: &ArenaConfig,
    wave: u32,
) -> u32 {
    let count = wave * config.players;
    let band = (bounds.height() * ASTEROID_SPAWN_BAND).max(1.0);
    for _ in 0..count {
        let position = DVec2::new(
            rng.gen_range(0.0..bounds.width()),
            rng.gen_range(0.0..=band),
        );
        let velocity = random_asteroid_velocity(rng, config.asteroid_max_speed);
        spawn_asteroid(commands, AsteroidSize::Big, position, velocity);
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::ArenaRng;

    #[test]
    fn sizes_step_down_and_stop_at_small() {
        assert_eq!(AsteroidSize::Big.smaller(), Some(AsteroidSize::Medium));
        assert_eq!(AsteroidSize::Medium.smaller(), Some(AsteroidSize::Small));
        assert_eq!(AsteroidSize::Small.smaller(), None);
    }

    #[test]
    fn break_thresholds_are_inclusive() {
        assert!(AsteroidSize::Small.breaks_under(125_000.0));
        assert!(!AsteroidSize::Small.breaks_under(124_999.9));
        assert!(AsteroidSize::Medium.breaks_under(250_000.0));
        assert!(!AsteroidSize::Big.breaks_under(499_999.0));
        assert!(AsteroidSize::Big.breaks_under(500_001.0));
    }

    #[test]
    fn spawn_velocity_is_never_zero_and_within_range() {
        let mut rng = ArenaRng::seeded(3);
        for _ in 0..500 {
            let v = random_asteroid_velocity(&mut rng.0, 1);
            assert!(v != DVec2::ZERO);
            assert!(v.x.abs() <= 1.0 && v.y.abs() <= 1.0);
        }
    }

    #[test]
    fn asteroid_wave_scales_with_wave_and_players() {
        let mut world = World::new();
        world.insert_resource(ArenaRng::seeded(11));
        world.insert_resource(ArenaBounds::new(800.0, 600.0).unwrap());
        world.insert_resource(ArenaConfig {
            players: 2,
            ..ArenaConfig::default()
        });

        let mut schedule = Schedule::default();
        schedule.add_systems(
            |mut commands: Commands,
             mut rng: ResMut<ArenaRng>,
             bounds: Res<ArenaBounds>,
             config: Res<ArenaConfig>| {
                let spawned = spawn_asteroid_wave(&mut commands, &mut rng.0, &bounds, &config, 3);
                assert_eq!(spawned, 6);
            },
        );
        schedule.run(&mut world);

        let mut query = world.query::<(&Asteroid, &KinematicBody)>();
        let bodies: Vec<_> = query.iter(&world).collect();
        assert_eq!(bodies.len(), 6);
        for (asteroid, body) in bodies {
            assert_eq!(asteroid.size, AsteroidSize::Big);
            assert!(body.position.y <= 60.0);
            assert!(body.position.x >= 0.0 && body.position.x < 800.0);
        }
    }
}
