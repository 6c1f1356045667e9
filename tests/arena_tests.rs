//! Headless integration tests for the full [`FlightSimulationPlugin`]
//! pipeline.
//!
//! These tests use [`MinimalPlugins`] with a fixed 60 Hz time step, so they run
//! fast and deterministically in CI.
//!
//! Covered scenarios:
//! 1. A mission request spawns the ship and the first asteroid wave.
//! 2. Two equal asteroids meeting head-on swap velocities.
//! 3. A laser shatters a big asteroid into two medium fragments.
//! 4. Losing the player ship fails the mission and clears the arena.

use bevy::math::DVec2;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use flight_arena::arena::{ArenaEvent, FlightCollider, Population};
use flight_arena::asteroid::{Asteroid, AsteroidSize};
use flight_arena::config::ArenaConfig;
use flight_arena::damage::DamageMessage;
use flight_arena::kinematics::{BodySize, KinematicBody};
use flight_arena::laser::Laser;
use flight_arena::mission::{GameMode, MissionDirector, MissionPhase, MissionRequest};
use flight_arena::player::PlayerShip;
use flight_arena::simulation::FlightSimulationPlugin;
use std::time::Duration;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn arena_app(config: ArenaConfig) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
        1.0 / 60.0,
    )));
    app.insert_resource(config);
    app.add_plugins(FlightSimulationPlugin {
        load_config_file: false,
    });
    app
}

fn seeded_config() -> ArenaConfig {
    ArenaConfig {
        rng_seed: Some(42),
        ..ArenaConfig::default()
    }
}

fn count<C: Component>(app: &mut App) -> usize {
    app.world_mut()
        .query_filtered::<Entity, With<C>>()
        .iter(app.world())
        .count()
}

fn spawn_asteroid_body(app: &mut App, size: AsteroidSize, at: DVec2, velocity: DVec2) -> Entity {
    app.world_mut()
        .spawn((
            Asteroid { size },
            KinematicBody::new(at, velocity, size.body_size()),
            FlightCollider,
        ))
        .id()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn mission_request_spawns_ship_and_first_asteroid_wave() {
    let mut app = arena_app(seeded_config());
    app.update();
    app.world_mut().write_message(MissionRequest {
        mode: GameMode::AsteroidField,
    });
    app.update();

    let director = app.world().resource::<MissionDirector>().clone();
    assert_eq!(director.phase, MissionPhase::ActiveWave);
    assert_eq!(director.wave, 1);
    assert_eq!(director.asteroid_count, 1);
    assert_eq!(count::<PlayerShip>(&mut app), 1);
    assert_eq!(count::<Asteroid>(&mut app), 1);
}

#[test]
fn equal_asteroids_meeting_head_on_swap_velocities() {
    let mut app = arena_app(seeded_config());
    let left = spawn_asteroid_body(
        &mut app,
        AsteroidSize::Medium,
        DVec2::new(200.0, 500.0),
        DVec2::new(10.0, 0.0),
    );
    let right = spawn_asteroid_body(
        &mut app,
        AsteroidSize::Medium,
        DVec2::new(230.0, 500.0),
        DVec2::new(-10.0, 0.0),
    );
    app.update();

    let world = app.world();
    let left_body = world.get::<KinematicBody>(left).expect("left survives");
    let right_body = world.get::<KinematicBody>(right).expect("right survives");
    assert!((left_body.velocity.x + 10.0).abs() < 1e-9);
    assert!((right_body.velocity.x - 10.0).abs() < 1e-9);
    assert!(!left_body.aabb().overlaps(&right_body.aabb()));
    assert_eq!(count::<Asteroid>(&mut app), 2);
}

#[test]
fn laser_shatters_big_asteroid_into_two_mediums() {
    let mut app = arena_app(seeded_config());
    let owner = app.world_mut().spawn_empty().id();
    let rock = spawn_asteroid_body(
        &mut app,
        AsteroidSize::Big,
        DVec2::new(400.0, 400.0),
        DVec2::ZERO,
    );
    app.world_mut().spawn((
        Laser { owner },
        KinematicBody::new(DVec2::new(400.0, 400.0), DVec2::ZERO, BodySize::square(6)),
    ));
    app.update();

    assert!(app.world().get_entity(rock).is_err());
    assert_eq!(count::<Laser>(&mut app), 0);

    let mut sizes: Vec<AsteroidSize> = app
        .world_mut()
        .query::<&Asteroid>()
        .iter(app.world())
        .map(|a| a.size)
        .collect();
    sizes.sort_by_key(|s| *s as u8);
    assert_eq!(sizes, vec![AsteroidSize::Medium, AsteroidSize::Medium]);

    let events: Vec<ArenaEvent> = app
        .world_mut()
        .resource_mut::<Messages<ArenaEvent>>()
        .drain()
        .collect();
    assert!(events.iter().any(|e| matches!(
        e,
        ArenaEvent::AsteroidSplit { parent, size: AsteroidSize::Medium, .. } if *parent == rock
    )));
    assert!(events.contains(&ArenaEvent::PopulationChanged {
        population: Population::Asteroids,
        delta: 1,
    }));
}

#[test]
fn losing_the_ship_fails_the_mission_and_clears_the_arena() {
    let mut app = arena_app(ArenaConfig {
        mission_reset_secs: 0.0,
        ..seeded_config()
    });
    app.update();
    app.world_mut().write_message(MissionRequest {
        mode: GameMode::Combat,
    });
    app.update();

    let ship = app
        .world_mut()
        .query_filtered::<Entity, With<PlayerShip>>()
        .single(app.world())
        .expect("mission spawns one ship");
    app.world_mut().write_message(DamageMessage {
        entity: ship,
        hit_points: 100,
    });
    for _ in 0..3 {
        app.update();
    }

    assert_eq!(
        app.world().resource::<MissionDirector>().phase,
        MissionPhase::Inactive
    );
    assert_eq!(count::<KinematicBody>(&mut app), 0);
}
