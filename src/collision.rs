//! Normal-only elastic collision resolver.
//!
//! Every overlapping pair exchanges momentum along the line between their
//! centres using the 1-D elastic formula; the tangential components are left
//! untouched.  Mass is the hit-box area.  Pairs are processed one at a time in
//! a stable order, and each body remembers which subjects already resolved
//! against it so a pair is never handled twice in the same step.
//!
//! The resolver only moves momentum around.  What an impact *does* to the
//! bodies involved is decided downstream from the [`ImpactMessage`]s it emits
//! (see [`crate::damage`]).

use crate::arena::{FlightCollider, Wrecked};
use crate::constants::{COINCIDENT_NORMAL_ANGLE, MAX_BODY_EXTENT};
use crate::kinematics::KinematicBody;
use crate::spatial_partition::SpatialGrid;
use bevy::math::DVec2;
use bevy::prelude::*;
use std::collections::HashMap;

/// One side of a resolved collision.  Every pair produces two of these, one
/// per participant, carrying the same force.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct ImpactMessage {
    pub entity: Entity,
    pub other: Entity,
    pub force: f64,
}

/// Decides whether two bodies are touching.  The resolver itself never looks
/// at geometry beyond centres and masses.
pub trait ImpactOracle {
    fn touching(&self, a: &KinematicBody, b: &KinematicBody) -> bool;
}

/// Axis-aligned bounding-box intersection.
#[derive(Debug, Clone, Copy, Default)]
pub struct AabbOracle;

impl ImpactOracle for AabbOracle {
    fn touching(&self, a: &KinematicBody, b: &KinematicBody) -> bool {
        a.aabb().overlaps(&b.aabb())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElasticOutcome {
    pub subject_velocity: DVec2,
    pub other_velocity: DVec2,
    /// `subject mass × |Δv|` along the normal.
    pub force: f64,
}

/// Angle of the line from `subject` to `other`.  Coincident centres have no
/// direction, so they fall back to a fixed normal instead of producing NaN.
pub fn collision_normal_angle(subject: DVec2, other: DVec2) -> f64 {
    let delta = other - subject;
    if delta == DVec2::ZERO {
        COINCIDENT_NORMAL_ANGLE
    } else {
        delta.y.atan2(delta.x)
    }
}

/// Express `v` in the frame whose x-axis points along `angle`.
pub fn to_normal_frame(v: DVec2, angle: f64) -> DVec2 {
    let (sin, cos) = angle.sin_cos();
    DVec2::new(v.x * cos + v.y * sin, -v.x * sin + v.y * cos)
}

/// Inverse of [`to_normal_frame`].
pub fn from_normal_frame(v: DVec2, angle: f64) -> DVec2 {
    let (sin, cos) = angle.sin_cos();
    DVec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Exchange momentum between two bodies along their collision normal.
pub fn resolve_elastic(subject: &KinematicBody, other: &KinematicBody) -> ElasticOutcome {
    let angle = collision_normal_angle(subject.position, other.position);
    let v1 = to_normal_frame(subject.velocity, angle);
    let v2 = to_normal_frame(other.velocity, angle);

    let m1 = subject.mass();
    let m2 = other.mass();
    let total = m1 + m2;

    let v1x = ((m1 - m2) * v1.x + 2.0 * m2 * v2.x) / total;
    let v2x = (2.0 * m1 * v1.x + (m2 - m1) * v2.x) / total;

    ElasticOutcome {
        subject_velocity: from_normal_frame(DVec2::new(v1x, v1.y), angle),
        other_velocity: from_normal_frame(DVec2::new(v2x, v2.y), angle),
        force: m1 * (v1x - v1.x).abs(),
    }
}

/// Move `subject` out of `other` along the axis with the larger centre
/// offset, snapping its near edge onto the other's facing edge.
pub fn push_out(subject: &mut KinematicBody, other: &KinematicBody) {
    let delta = subject.position - other.position;
    let reach = subject.size.half_extents() + other.size.half_extents();

    if delta.x.abs() < delta.y.abs() {
        if subject.position.y < other.position.y {
            subject.position.y = other.position.y - reach.y;
        } else {
            subject.position.y = other.position.y + reach.y;
        }
    } else if subject.position.x <= other.position.x {
        subject.position.x = other.position.x - reach.x;
    } else {
        subject.position.x = other.position.x + reach.x;
    }
}

/// A body copied out of the world for one resolver pass.
#[derive(Debug, Clone)]
pub struct ResolverEntry {
    pub entity: Entity,
    pub body: KinematicBody,
}

fn pair_mut<T>(items: &mut [T], i: usize, j: usize) -> (&mut T, &mut T) {
    debug_assert_ne!(i, j);
    if i < j {
        let (head, tail) = items.split_at_mut(j);
        (&mut head[i], &mut tail[0])
    } else {
        let (head, tail) = items.split_at_mut(i);
        (&mut tail[0], &mut head[j])
    }
}

/// Resolve every touching pair in `entries`, in slice order.
///
/// `grid` must have been built from the same bodies at their pre-pass
/// positions; push-out moves bodies by at most one body extent, which the
/// query radius absorbs.  Returns two impacts per resolved pair, the
/// candidate's first.
pub fn resolve_collisions<O: ImpactOracle>(
    entries: &mut [ResolverEntry],
    grid: &SpatialGrid,
    oracle: &O,
) -> Vec<ImpactMessage> {
    let index: HashMap<Entity, usize> = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| (entry.entity, i))
        .collect();
    let mut impacts = Vec::new();

    for i in 0..entries.len() {
        let subject_entity = entries[i].entity;
        let reach = entries[i].body.size.half_extents().length() + 2.0 * MAX_BODY_EXTENT;
        let mut candidates: Vec<usize> = grid
            .get_neighbors_excluding(subject_entity, entries[i].body.position, reach)
            .into_iter()
            .filter_map(|e| index.get(&e).copied())
            .collect();
        candidates.sort_unstable();

        for j in candidates {
            let (subject, candidate) = pair_mut(entries, i, j);
            if subject.body.collided_this_step.contains(&candidate.entity) {
                continue;
            }
            if !oracle.touching(&subject.body, &candidate.body) {
                continue;
            }

            let outcome = resolve_elastic(&subject.body, &candidate.body);
            candidate.body.velocity = outcome.other_velocity;
            subject.body.velocity = outcome.subject_velocity;
            impacts.push(ImpactMessage {
                entity: candidate.entity,
                other: subject.entity,
                force: outcome.force,
            });
            impacts.push(ImpactMessage {
                entity: subject.entity,
                other: candidate.entity,
                force: outcome.force,
            });

            push_out(&mut subject.body, &candidate.body);
            candidate.body.collided_this_step.push(subject.entity);
        }
    }

    for entry in entries.iter_mut() {
        entry.body.collided_this_step.clear();
    }
    impacts
}

/// Collision pass over every live collidable body.
pub fn resolve_collisions_system(
    grid: Res<SpatialGrid>,
    mut bodies: Query<(Entity, &mut KinematicBody), (With<FlightCollider>, Without<Wrecked>)>,
    mut impacts: MessageWriter<ImpactMessage>,
) {
    let mut entries: Vec<ResolverEntry> = bodies
        .iter()
        .map(|(entity, body)| ResolverEntry {
            entity,
            body: body.clone(),
        })
        .collect();
    entries.sort_by_key(|entry| entry.entity);

    let reports = resolve_collisions(&mut entries, &grid, &AabbOracle);
    if reports.is_empty() {
        return;
    }

    for entry in entries {
        if let Ok((_, mut body)) = bodies.get_mut(entry.entity) {
            *body = entry.body;
        }
    }
    for report in reports {
        debug!(
            "impact on {:?} from {:?}: force {:.0}",
            report.entity, report.other, report.force
        );
        impacts.write(report);
    }
}
