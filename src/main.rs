use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use flight_arena::mission::{GameMode, MissionRequest, MissionStatus};
use flight_arena::simulation::{FlightSet, FlightSimulationPlugin};
use std::env;
use std::time::Duration;

#[derive(Resource, Debug, Clone, Copy)]
struct RequestedMode(GameMode);

fn mode_from_env() -> GameMode {
    match env::var("ARENA_MODE").ok().as_deref() {
        Some("combat") => GameMode::Combat,
        Some("asteroids") | None => GameMode::AsteroidField,
        Some(other) => {
            eprintln!("Unknown ARENA_MODE {other:?}; expected asteroids or combat");
            GameMode::AsteroidField
        }
    }
}

fn request_mission(mode: Res<RequestedMode>, mut requests: MessageWriter<MissionRequest>) {
    requests.write(MissionRequest { mode: mode.0 });
}

/// Quit once the first mission has failed and the arena was cleared.
fn exit_on_reset(mut statuses: MessageReader<MissionStatus>, mut exit: MessageWriter<AppExit>) {
    for status in statuses.read() {
        info!("{status:?}");
        if *status == MissionStatus::Reset {
            exit.write(AppExit::Success);
        }
    }
}

fn main() -> AppExit {
    let mode = mode_from_env();

    App::new()
        .add_plugins(
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
                1.0 / 60.0,
            ))),
        )
        .add_plugins(LogPlugin::default())
        .insert_resource(RequestedMode(mode))
        .add_plugins(FlightSimulationPlugin::default())
        .add_systems(Startup, request_mission)
        .add_systems(Update, exit_on_reset.after(FlightSet::Missions))
        .run()
}
