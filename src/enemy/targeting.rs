//! Enemy turret: iterative lead prediction, slewing and firing.

use super::EnemyShip;
use crate::arena::Wrecked;
use crate::config::ArenaConfig;
use crate::constants::{AIM_CONVERGENCE, ENEMY_FIRE_ALIGNMENT, ENEMY_INITIAL_AIM, MAX_AIMING_ITERATIONS};
use crate::kinematics::KinematicBody;
use crate::laser::spawn_laser;
use crate::player::PlayerShip;
use bevy::math::DVec2;
use bevy::prelude::*;

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct EnemyTurret {
    /// Where the barrel points now (degrees, `[0, 360)`).
    pub aim_angle: f64,
    /// Where the barrel wants to point after the last prediction.
    pub target_angle: f64,
    /// Grace period after spawning before the first shot (seconds).
    pub initial_fire_timer: f64,
    pub laser_fire_timer: f64,
    pub laser_delay: f64,
    /// Lead-prediction refinement budget, `0..=5`.
    pub max_aiming_iterations: u32,
}

impl Default for EnemyTurret {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0)
    }
}

impl EnemyTurret {
    pub fn new(initial_fire_delay: f64, laser_delay: f64, max_aiming_iterations: u32) -> Self {
        Self {
            aim_angle: ENEMY_INITIAL_AIM,
            target_angle: ENEMY_INITIAL_AIM,
            initial_fire_timer: initial_fire_delay,
            laser_fire_timer: 0.0,
            laser_delay,
            max_aiming_iterations: max_aiming_iterations.min(MAX_AIMING_ITERATIONS),
        }
    }

    pub fn tick(&mut self, dt: f64) {
        self.initial_fire_timer = (self.initial_fire_timer - dt).max(0.0);
        self.laser_fire_timer = (self.laser_fire_timer - dt).max(0.0);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterceptSolution {
    pub point: DVec2,
    pub iterations: u32,
}

/// Refine where a moving target will be when a shot fired now arrives.
///
/// Starts from the target's current position and re-estimates the flight
/// time against the latest prediction until two successive predictions are
/// within [`AIM_CONVERGENCE`] px or the iteration budget runs out.  A budget
/// of zero aims straight at the target.
pub fn predict_intercept(
    shooter: DVec2,
    target_position: DVec2,
    target_velocity: DVec2,
    projectile_speed: f64,
    max_iterations: u32,
) -> InterceptSolution {
    let mut predicted = target_position;
    let mut previous: Option<DVec2> = None;
    let mut iterations = 0;

    while iterations < max_iterations {
        if previous.is_some_and(|p| p.distance(predicted) <= AIM_CONVERGENCE) {
            break;
        }
        previous = Some(predicted);
        let travel_time = shooter.distance(predicted) / projectile_speed;
        predicted = target_position + target_velocity * travel_time;
        iterations += 1;
    }

    InterceptSolution {
        point: predicted,
        iterations,
    }
}

/// Screen-space bearing from `from` to `to` in degrees, `[0, 360)`.
/// Screen y grows downward, so it is negated before `atan2`.
pub fn bearing_deg(from: DVec2, to: DVec2) -> f64 {
    let delta = to - from;
    (-delta.y).atan2(delta.x).to_degrees().rem_euclid(360.0)
}

/// Signed turn from `from` to `to` along the shorter way, in `(-180, 180]`.
/// Exactly opposite headings turn counter-clockwise (positive).
pub fn shortest_turn(from: f64, to: f64) -> f64 {
    let diff = (to - from).rem_euclid(360.0);
    if diff <= 180.0 {
        diff
    } else {
        diff - 360.0
    }
}

/// Rotate `aim` toward `target` by at most `max_step` degrees.
pub fn slew_toward(aim: f64, target: f64, max_step: f64) -> f64 {
    let turn = shortest_turn(aim, target);
    let next = if turn.abs() <= max_step {
        target
    } else {
        aim + max_step.copysign(turn)
    };
    next.rem_euclid(360.0)
}

/// Track the player ship and fire once lined up and reloaded.
#[allow(clippy::type_complexity)]
pub fn enemy_weapon_system(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<ArenaConfig>,
    player: Query<&KinematicBody, (With<PlayerShip>, Without<Wrecked>)>,
    mut enemies: Query<
        (Entity, &KinematicBody, &mut EnemyTurret),
        (With<EnemyShip>, Without<PlayerShip>, Without<Wrecked>),
    >,
) {
    let dt = time.delta_secs_f64();
    let target = player.single().ok();

    for (entity, body, mut turret) in enemies.iter_mut() {
        turret.tick(dt);
        let Some(target) = target else {
            continue;
        };
        if turret.initial_fire_timer > 0.0 {
            continue;
        }

        let solution = predict_intercept(
            body.position,
            target.position,
            target.velocity,
            config.laser_speed,
            turret.max_aiming_iterations,
        );
        turret.target_angle = bearing_deg(body.position, solution.point);
        debug!(
            "{:?} target angle {:.1} in {} iteration(s)",
            entity, turret.target_angle, solution.iterations
        );

        turret.aim_angle = slew_toward(
            turret.aim_angle,
            turret.target_angle,
            config.enemy_aim_rate * dt,
        );

        let aligned = shortest_turn(turret.aim_angle, turret.target_angle).abs() < ENEMY_FIRE_ALIGNMENT;
        if aligned && turret.laser_fire_timer <= 0.0 {
            spawn_laser(
                &mut commands,
                entity,
                body.position,
                turret.aim_angle,
                config.laser_speed,
            );
            turret.laser_fire_timer = turret.laser_delay;
        }
    }
}
