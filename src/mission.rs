//! Mission director: the world controller that consumes the core's
//! population events, spawns waves and ends missions.
//!
//! The physics core never touches these counters; it only reports
//! [`ArenaEvent`]s.  The director turns them into wave progression.

use crate::arena::{ArenaBounds, ArenaEvent, ArenaRng, Population};
use crate::asteroid::spawn_asteroid_wave;
use crate::config::ArenaConfig;
use crate::enemy::spawn_enemy_wave;
use crate::kinematics::KinematicBody;
use crate::player::spawn_player_ship;
use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameMode {
    #[default]
    AsteroidField,
    Combat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissionPhase {
    #[default]
    Inactive,
    ActiveWave,
    InterWaveBreak,
    Failed,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct MissionDirector {
    pub mode: GameMode,
    pub phase: MissionPhase,
    /// 1-indexed wave currently running (or about to run during a break).
    pub wave: u32,
    pub asteroid_count: i32,
    pub enemy_count: i32,
    pub phase_timer_secs: f64,
    /// Monotonic counter for mission starts in this process.
    pub missions_started: u64,
}

impl MissionDirector {
    /// Live hostiles the current mode waits on before the wave is cleared.
    pub fn hostiles_remaining(&self) -> i32 {
        match self.mode {
            GameMode::AsteroidField => self.asteroid_count,
            GameMode::Combat => self.enemy_count,
        }
    }
}

/// Ask the director to (re)start a mission.  Anything still in the arena is
/// cleared first.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissionRequest {
    pub mode: GameMode,
}

/// Progress notifications for the outer game (menus, HUD, the headless runner).
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissionStatus {
    Started { mode: GameMode },
    WaveStarted { wave: u32, hostiles: u32 },
    WaveCleared { wave: u32 },
    Failed { wave: u32 },
    Reset,
}

fn spawn_wave(
    commands: &mut Commands,
    rng: &mut ArenaRng,
    bounds: &ArenaBounds,
    config: &ArenaConfig,
    director: &mut MissionDirector,
) -> u32 {
    let spawned = match director.mode {
        GameMode::AsteroidField => {
            let n = spawn_asteroid_wave(commands, &mut rng.0, bounds, config, director.wave);
            director.asteroid_count = n as i32;
            n
        }
        GameMode::Combat => {
            let n = spawn_enemy_wave(commands, &mut rng.0, bounds, config, director.wave);
            director.enemy_count = n as i32;
            n
        }
    };
    director.phase = MissionPhase::ActiveWave;
    info!("Wave {} started with {} hostiles", director.wave, spawned);
    spawned
}

fn clear_arena(commands: &mut Commands, bodies: &Query<Entity, With<KinematicBody>>) {
    for entity in bodies.iter() {
        commands.entity(entity).despawn();
    }
}

/// Start a fresh mission for the most recent request this step.
#[allow(clippy::too_many_arguments)]
pub fn mission_start_system(
    mut commands: Commands,
    mut requests: MessageReader<MissionRequest>,
    mut director: ResMut<MissionDirector>,
    mut rng: ResMut<ArenaRng>,
    bounds: Res<ArenaBounds>,
    config: Res<ArenaConfig>,
    bodies: Query<Entity, With<KinematicBody>>,
    mut status: MessageWriter<MissionStatus>,
) {
    let Some(request) = requests.read().last().copied() else {
        return;
    };

    clear_arena(&mut commands, &bodies);
    let missions_started = director.missions_started + 1;
    *director = MissionDirector {
        mode: request.mode,
        wave: 1,
        missions_started,
        ..MissionDirector::default()
    };
    info!("Mission {} started in {:?} mode", director.missions_started, request.mode);
    status.write(MissionStatus::Started { mode: request.mode });

    spawn_player_ship(&mut commands, &mut rng.0, &bounds, &config);
    let hostiles = spawn_wave(&mut commands, &mut rng, &bounds, &config, &mut director);
    status.write(MissionStatus::WaveStarted {
        wave: director.wave,
        hostiles,
    });
}

/// Fold population deltas and ship loss into the director.
pub fn population_tracking_system(
    mut events: MessageReader<ArenaEvent>,
    mut director: ResMut<MissionDirector>,
    config: Res<ArenaConfig>,
    mut status: MessageWriter<MissionStatus>,
) {
    for event in events.read() {
        match *event {
            ArenaEvent::PopulationChanged { population, delta } => match population {
                Population::Asteroids => director.asteroid_count += delta,
                Population::Enemies => director.enemy_count += delta,
            },
            ArenaEvent::PlayerShipLost { .. } => {
                if director.phase != MissionPhase::Inactive && director.phase != MissionPhase::Failed {
                    director.phase = MissionPhase::Failed;
                    director.phase_timer_secs = config.mission_reset_secs;
                    info!("Mission failed on wave {}", director.wave);
                    status.write(MissionStatus::Failed {
                        wave: director.wave,
                    });
                }
            }
            ArenaEvent::AsteroidSplit { .. } | ArenaEvent::Explosion { .. } => {}
        }
    }
}

/// Advance wave clears, inter-wave breaks and mission resets.
#[allow(clippy::too_many_arguments)]
pub fn mission_director_system(
    mut commands: Commands,
    time: Res<Time>,
    mut director: ResMut<MissionDirector>,
    mut rng: ResMut<ArenaRng>,
    bounds: Res<ArenaBounds>,
    config: Res<ArenaConfig>,
    bodies: Query<Entity, With<KinematicBody>>,
    mut status: MessageWriter<MissionStatus>,
) {
    let dt = time.delta_secs_f64();
    let phase = director.phase;

    match phase {
        MissionPhase::ActiveWave => {
            if director.hostiles_remaining() <= 0 {
                info!("Wave {} cleared", director.wave);
                status.write(MissionStatus::WaveCleared {
                    wave: director.wave,
                });
                director.wave += 1;
                director.phase = MissionPhase::InterWaveBreak;
                director.phase_timer_secs = config.wave_break_secs;
            }
        }
        MissionPhase::InterWaveBreak => {
            director.phase_timer_secs = (director.phase_timer_secs - dt).max(0.0);
            if director.phase_timer_secs <= 0.0 {
                let hostiles = spawn_wave(&mut commands, &mut rng, &bounds, &config, &mut director);
                status.write(MissionStatus::WaveStarted {
                    wave: director.wave,
                    hostiles,
                });
            }
        }
        MissionPhase::Failed => {
            director.phase_timer_secs = (director.phase_timer_secs - dt).max(0.0);
            if director.phase_timer_secs <= 0.0 {
                clear_arena(&mut commands, &bodies);
                director.phase = MissionPhase::Inactive;
                info!("Arena cleared after mission failure");
                status.write(MissionStatus::Reset);
            }
        }
        MissionPhase::Inactive => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asteroid::Asteroid;
    use crate::enemy::EnemyShip;
    use crate::player::PlayerShip;
    use bevy::ecs::system::ScheduleSystem;
    use bevy::math::DVec2;
    use std::time::Duration;

    fn director_world() -> World {
        let mut world = World::new();
        world.insert_resource(Time::<()>::default());
        world.insert_resource(ArenaConfig::default());
        world.insert_resource(ArenaBounds::default());
        world.insert_resource(ArenaRng::seeded(4));
        world.insert_resource(MissionDirector::default());
        world.init_resource::<Messages<MissionRequest>>();
        world.init_resource::<Messages<MissionStatus>>();
        world.init_resource::<Messages<ArenaEvent>>();
        world
    }

    fn run<M>(world: &mut World, systems: impl IntoScheduleConfigs<ScheduleSystem, M>) {
        let mut schedule = Schedule::default();
        schedule.add_systems(systems);
        schedule.run(world);
    }

    fn count<C: Component>(world: &mut World) -> usize {
        world.query_filtered::<Entity, With<C>>().iter(world).count()
    }

    #[test]
    fn start_request_spawns_ship_and_first_wave() {
        let mut world = director_world();
        world.write_message(MissionRequest {
            mode: GameMode::Combat,
        });
        run(&mut world, mission_start_system);

        let director = world.resource::<MissionDirector>().clone();
        assert_eq!(director.phase, MissionPhase::ActiveWave);
        assert_eq!(director.wave, 1);
        assert_eq!(director.enemy_count, 1);
        assert_eq!(director.missions_started, 1);
        assert_eq!(count::<PlayerShip>(&mut world), 1);
        assert_eq!(count::<EnemyShip>(&mut world), 1);
    }

    #[test]
    fn population_deltas_update_counts_and_clear_the_wave() {
        let mut world = director_world();
        world.insert_resource(MissionDirector {
            mode: GameMode::AsteroidField,
            phase: MissionPhase::ActiveWave,
            wave: 2,
            asteroid_count: 1,
            ..MissionDirector::default()
        });
        world.write_message(ArenaEvent::PopulationChanged {
            population: Population::Asteroids,
            delta: 1,
        });
        world.write_message(ArenaEvent::PopulationChanged {
            population: Population::Asteroids,
            delta: -1,
        });
        world.write_message(ArenaEvent::PopulationChanged {
            population: Population::Asteroids,
            delta: -1,
        });
        run(
            &mut world,
            (population_tracking_system, mission_director_system).chain(),
        );

        let director = world.resource::<MissionDirector>();
        assert_eq!(director.asteroid_count, 0);
        assert_eq!(director.phase, MissionPhase::InterWaveBreak);
        assert_eq!(director.wave, 3);
        assert_eq!(director.phase_timer_secs, 3.0);
    }

    #[test]
    fn break_expiry_spawns_the_next_asteroid_wave() {
        let mut world = director_world();
        world.insert_resource(MissionDirector {
            mode: GameMode::AsteroidField,
            phase: MissionPhase::InterWaveBreak,
            wave: 3,
            phase_timer_secs: 0.01,
            ..MissionDirector::default()
        });
        world
            .resource_mut::<Time>()
            .advance_by(Duration::from_millis(20));
        run(&mut world, mission_director_system);

        let director = world.resource::<MissionDirector>().clone();
        assert_eq!(director.phase, MissionPhase::ActiveWave);
        assert_eq!(director.asteroid_count, 3);
        assert_eq!(count::<Asteroid>(&mut world), 3);
    }

    #[test]
    fn ship_loss_fails_then_resets_the_arena() {
        let mut world = director_world();
        world.insert_resource(MissionDirector {
            mode: GameMode::Combat,
            phase: MissionPhase::ActiveWave,
            wave: 1,
            enemy_count: 1,
            ..MissionDirector::default()
        });
        world.spawn(KinematicBody::new(
            DVec2::new(5.0, 5.0),
            DVec2::ZERO,
            crate::kinematics::BodySize::square(8),
        ));
        world.write_message(ArenaEvent::PlayerShipLost {
            position: DVec2::ZERO,
        });
        run(&mut world, population_tracking_system);
        assert_eq!(world.resource::<MissionDirector>().phase, MissionPhase::Failed);

        world
            .resource_mut::<Time>()
            .advance_by(Duration::from_secs(4));
        run(&mut world, mission_director_system);

        assert_eq!(world.resource::<MissionDirector>().phase, MissionPhase::Inactive);
        assert_eq!(count::<KinematicBody>(&mut world), 0);
        let statuses: Vec<MissionStatus> = world
            .resource_mut::<Messages<MissionStatus>>()
            .drain()
            .collect();
        assert!(statuses.contains(&MissionStatus::Failed { wave: 1 }));
        assert!(statuses.contains(&MissionStatus::Reset));
    }
}
