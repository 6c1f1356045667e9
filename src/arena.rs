//! World context shared by every arena system: bounds, randomness, the
//! collision-set and tombstone markers, and the outward event stream.

use crate::asteroid::AsteroidSize;
use crate::config::ArenaConfig;
use crate::constants::{ARENA_HEIGHT, ARENA_WIDTH};
use crate::error::{validate_extent, ArenaResult};
use bevy::math::DVec2;
use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Size of the toroidal play field.  Both axes run over `[0, extent)`.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct ArenaBounds {
    width: f64,
    height: f64,
}

impl ArenaBounds {
    pub fn new(width: f64, height: f64) -> ArenaResult<Self> {
        validate_extent(width, height)?;
        Ok(Self { width, height })
    }

    pub fn from_config(config: &ArenaConfig) -> ArenaResult<Self> {
        Self::new(config.arena_width, config.arena_height)
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn size(&self) -> DVec2 {
        DVec2::new(self.width, self.height)
    }

    pub fn center(&self) -> DVec2 {
        self.size() * 0.5
    }

    /// Half-open containment test used for laser lifetime.
    pub fn contains(&self, point: DVec2) -> bool {
        point.x >= 0.0 && point.x < self.width && point.y >= 0.0 && point.y < self.height
    }
}

impl Default for ArenaBounds {
    fn default() -> Self {
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
        }
    }
}

/// The single random source for spawn velocities, patrol points and damage
/// coin flips.  Seed it for reproducible runs.
#[derive(Resource, Debug, Clone)]
pub struct ArenaRng(pub StdRng);

impl ArenaRng {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    pub fn from_config(config: &ArenaConfig) -> Self {
        match config.rng_seed {
            Some(seed) => Self::seeded(seed),
            None => Self(StdRng::from_entropy()),
        }
    }
}

impl Default for ArenaRng {
    fn default() -> Self {
        Self(StdRng::from_entropy())
    }
}

/// Marks a body that takes part in elastic collision resolution.
/// Asteroids and ships carry it; lasers do not.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct FlightCollider;

/// Tombstone: the entity was destroyed this step.  It is skipped by every
/// other system and despawned by the destruction cascade at the end of the step.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Wrecked;

/// Which live counter a [`ArenaEvent::PopulationChanged`] adjusts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Population {
    Asteroids,
    Enemies,
}

/// Visual effect the renderer should play at a destruction site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplosionKind {
    /// Debris cloud left behind by a small asteroid.
    AsteroidDebris,
    /// Fireball of a destroyed ship.
    ShipExplosion,
}

/// Everything the core reports to the outside world.  The wave director and
/// any renderer/audio layer read these instead of the core reaching out.
#[derive(Message, Debug, Clone, PartialEq)]
pub enum ArenaEvent {
    AsteroidSplit {
        parent: Entity,
        size: AsteroidSize,
        position: DVec2,
        children: [Entity; 2],
    },
    PopulationChanged {
        population: Population,
        delta: i32,
    },
    Explosion {
        position: DVec2,
        kind: ExplosionKind,
    },
    PlayerShipLost {
        position: DVec2,
    },
}

/// Startup system: derive bounds and randomness from the loaded config.
pub fn setup_arena_context(mut commands: Commands, config: Res<ArenaConfig>) {
    let bounds = match ArenaBounds::from_config(&config) {
        Ok(bounds) => bounds,
        Err(e) => {
            warn!("{e}; falling back to default arena bounds");
            ArenaBounds::default()
        }
    };
    info!(
        "Arena {}×{} px, seed {:?}",
        bounds.width(),
        bounds.height(),
        config.rng_seed
    );
    commands.insert_resource(bounds);
    commands.insert_resource(ArenaRng::from_config(&config));
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn zero_area_arena_is_rejected() {
        assert!(ArenaBounds::new(0.0, 100.0).is_err());
        assert!(ArenaBounds::new(100.0, -1.0).is_err());
    }

    #[test]
    fn containment_is_half_open() {
        let bounds = ArenaBounds::new(100.0, 50.0).unwrap();
        assert!(bounds.contains(DVec2::new(0.0, 0.0)));
        assert!(bounds.contains(DVec2::new(99.9, 49.9)));
        assert!(!bounds.contains(DVec2::new(100.0, 10.0)));
        assert!(!bounds.contains(DVec2::new(10.0, -0.1)));
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let mut a = ArenaRng::seeded(42);
        let mut b = ArenaRng::seeded(42);
        let xs: Vec<i32> = (0..8).map(|_| a.0.gen_range(-120..=120)).collect();
        let ys: Vec<i32> = (0..8).map(|_| b.0.gen_range(-120..=120)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn setup_falls_back_on_degenerate_config() {
        let mut world = World::new();
        world.insert_resource(ArenaConfig {
            arena_width: 0.0,
            rng_seed: Some(1),
            ..ArenaConfig::default()
        });

        let mut schedule = Schedule::default();
        schedule.add_systems(setup_arena_context);
        schedule.run(&mut world);

        assert_eq!(*world.resource::<ArenaBounds>(), ArenaBounds::default());
        assert!(world.get_resource::<ArenaRng>().is_some());
    }
}
