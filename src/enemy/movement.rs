//! Enemy flight: patrol-point state machine, arrival steering and the
//! forward probe used to avoid running into other bodies.

use crate::arena::{ArenaBounds, ArenaRng, FlightCollider, Wrecked};
use crate::config::ArenaConfig;
use crate::constants::{
    ENEMY_HOLD_SPEED, ENEMY_STOPPED_SPEED, MAX_BODY_EXTENT, PATROL_JITTER_X, PATROL_JITTER_Y,
    PATROL_PICK_ATTEMPTS,
};
use crate::kinematics::{Aabb, KinematicBody};
use crate::spatial_partition::SpatialGrid;
use bevy::math::DVec2;
use bevy::prelude::*;
use rand::Rng;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MoveState {
    #[default]
    MovingToTarget,
    HoldingAtTarget,
    AvoidingCollision,
}

/// Movement brain of one enemy ship.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct EnemyPilot {
    pub state: MoveState,
    pub move_target: DVec2,
    /// Seconds left before a holding ship picks a new patrol point.
    pub hold_timer: f64,
    /// Value `hold_timer` resets to on arrival.
    pub hold_delay: f64,
}

impl Default for EnemyPilot {
    fn default() -> Self {
        Self::new(DVec2::ZERO, 0.0)
    }
}

impl EnemyPilot {
    pub fn new(move_target: DVec2, hold_delay: f64) -> Self {
        Self {
            state: MoveState::MovingToTarget,
            move_target,
            hold_timer: 0.0,
            hold_delay,
        }
    }
}

/// Per-step observations the state machine decides on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveInputs {
    pub target_distance: f64,
    pub speed: f64,
    pub probe_hit: bool,
    pub hold_expired: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveDecision {
    pub next: MoveState,
    pub new_patrol_point: bool,
}

impl MoveDecision {
    fn stay(state: MoveState) -> Self {
        Self {
            next: state,
            new_patrol_point: false,
        }
    }

    fn go(next: MoveState, new_patrol_point: bool) -> Self {
        Self {
            next,
            new_patrol_point,
        }
    }
}

/// Transition function.  Every state handles every input combination.
pub fn next_move_state(state: MoveState, inputs: MoveInputs, arrive_radius: f64) -> MoveDecision {
    let arrived = inputs.target_distance < arrive_radius;
    match state {
        MoveState::MovingToTarget => {
            if arrived && inputs.speed < ENEMY_HOLD_SPEED {
                MoveDecision::go(MoveState::HoldingAtTarget, false)
            } else if inputs.probe_hit && inputs.speed > ENEMY_STOPPED_SPEED {
                MoveDecision::go(MoveState::AvoidingCollision, false)
            } else {
                MoveDecision::stay(state)
            }
        }
        MoveState::HoldingAtTarget => {
            if !arrived {
                MoveDecision::go(MoveState::MovingToTarget, false)
            } else if inputs.hold_expired {
                MoveDecision::go(MoveState::MovingToTarget, true)
            } else {
                MoveDecision::stay(state)
            }
        }
        MoveState::AvoidingCollision => {
            if inputs.speed < ENEMY_STOPPED_SPEED {
                MoveDecision::go(MoveState::MovingToTarget, true)
            } else if !inputs.probe_hit {
                MoveDecision::go(MoveState::MovingToTarget, false)
            } else {
                MoveDecision::stay(state)
            }
        }
    }
}

/// Velocity the ship wants this step: cruise toward the patrol point,
/// ramping down inside the slow radius, and stop everywhere else.
pub fn desired_velocity(state: MoveState, position: DVec2, target: DVec2, config: &ArenaConfig) -> DVec2 {
    if state != MoveState::MovingToTarget {
        return DVec2::ZERO;
    }
    let offset = target - position;
    let distance = offset.length();
    let direction = offset.normalize_or_zero();

    if distance < config.enemy_arrive_radius {
        DVec2::ZERO
    } else if distance < config.enemy_slow_radius {
        direction * config.enemy_max_speed * (distance / config.enemy_slow_radius)
    } else {
        direction * config.enemy_max_speed
    }
}

/// Move `velocity` toward `desired` by at most `max_accel` (per step, not per second).
pub fn steer(velocity: DVec2, desired: DVec2, max_accel: f64) -> DVec2 {
    velocity + (desired - velocity).clamp_length_max(max_accel)
}

/// Random point near one of the four quadrant posts at least `min_hop` away
/// from `previous`.  Gives up after a bounded number of draws in arenas too
/// small to satisfy the hop.
pub fn pick_patrol_point(
    rng: &mut impl Rng,
    bounds: &ArenaBounds,
    previous: DVec2,
    min_hop: f64,
) -> DVec2 {
    let near = bounds.width() / 6.0;
    let far = bounds.width() * 5.0 / 6.0;
    let top = bounds.height() / 6.0;
    let bottom = bounds.height() * 5.0 / 6.0;
    let posts = [
        DVec2::new(near, top),
        DVec2::new(far, top),
        DVec2::new(near, bottom),
        DVec2::new(far, bottom),
    ];

    let mut candidate = previous;
    for _ in 0..PATROL_PICK_ATTEMPTS {
        let post = posts[rng.gen_range(0..posts.len())];
        candidate = post
            + DVec2::new(
                rng.gen_range(-PATROL_JITTER_X..=PATROL_JITTER_X),
                rng.gen_range(-PATROL_JITTER_Y..=PATROL_JITTER_Y),
            );
        if candidate.distance(previous) >= min_hop {
            break;
        }
    }
    candidate
}

/// Wedge-shaped look-ahead region along the direction of travel.  Its
/// length grows with speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeWedge {
    pub apex: DVec2,
    pub direction: DVec2,
    pub length: f64,
    pub cos_half_angle: f64,
}

impl ProbeWedge {
    /// `None` for a stationary body: no direction to look in.
    pub fn ahead_of(body: &KinematicBody, config: &ArenaConfig) -> Option<Self> {
        let direction = body.velocity.try_normalize()?;
        Some(Self {
            apex: body.position,
            direction,
            length: config.probe_base_length + body.speed() * config.probe_lookahead_secs,
            cos_half_angle: config.probe_half_angle_deg.to_radians().cos(),
        })
    }

    pub fn contains(&self, point: DVec2) -> bool {
        let offset = point - self.apex;
        let distance = offset.length();
        if distance > self.length {
            return false;
        }
        distance == 0.0 || offset.dot(self.direction) / distance >= self.cos_half_angle
    }

    /// Corners, centre, or any sample along the axis inside `aabb`.
    pub fn hits(&self, aabb: &Aabb) -> bool {
        const AXIS_SAMPLES: usize = 8;
        let center = (aabb.min + aabb.max) * 0.5;
        if self.contains(center) || aabb.corners().iter().any(|&c| self.contains(c)) {
            return true;
        }
        (0..=AXIS_SAMPLES).any(|i| {
            let t = self.length * i as f64 / AXIS_SAMPLES as f64;
            aabb.contains_point(self.apex + self.direction * t)
        })
    }
}

/// Run every enemy's state machine and apply one step of acceleration.
#[allow(clippy::type_complexity)]
pub fn enemy_movement_system(
    time: Res<Time>,
    config: Res<ArenaConfig>,
    bounds: Res<ArenaBounds>,
    grid: Res<SpatialGrid>,
    mut rng: ResMut<ArenaRng>,
    mut bodies: Query<
        (Entity, &mut KinematicBody, Option<&mut EnemyPilot>),
        (With<FlightCollider>, Without<Wrecked>),
    >,
) {
    let dt = time.delta_secs_f64();
    let boxes: HashMap<Entity, Aabb> = bodies
        .iter()
        .map(|(entity, body, _)| (entity, body.aabb()))
        .collect();

    for (entity, mut body, pilot) in bodies.iter_mut() {
        let Some(mut pilot) = pilot else {
            continue;
        };

        let probe_hit = ProbeWedge::ahead_of(&body, &config).is_some_and(|wedge| {
            grid.get_neighbors_excluding(entity, body.position, wedge.length + MAX_BODY_EXTENT)
                .iter()
                .filter_map(|other| boxes.get(other))
                .any(|aabb| wedge.hits(aabb))
        });

        if pilot.state == MoveState::HoldingAtTarget {
            pilot.hold_timer = (pilot.hold_timer - dt).max(0.0);
        }
        let inputs = MoveInputs {
            target_distance: body.position.distance(pilot.move_target),
            speed: body.speed(),
            probe_hit,
            hold_expired: pilot.hold_timer <= 0.0,
        };

        let decision = next_move_state(pilot.state, inputs, config.enemy_arrive_radius);
        if decision.next != pilot.state {
            debug!("{:?}: {:?} -> {:?}", entity, pilot.state, decision.next);
            if decision.next == MoveState::HoldingAtTarget {
                pilot.hold_timer = pilot.hold_delay;
            }
            pilot.state = decision.next;
        }
        if decision.new_patrol_point {
            pilot.move_target =
                pick_patrol_point(&mut rng.0, &bounds, pilot.move_target, config.patrol_min_hop);
        }

        let desired = desired_velocity(pilot.state, body.position, pilot.move_target, &config);
        body.velocity = steer(body.velocity, desired, config.enemy_max_acceleration);
    }
}
