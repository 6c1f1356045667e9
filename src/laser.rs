//! Lasers: fixed-velocity hit-testers.
//!
//! A laser never takes part in elastic collisions.  It flies straight until
//! its centre leaves the arena or its box touches a collidable body other
//! than the ship that fired it, which then takes [`ArenaConfig::laser_damage`].

use crate::arena::{ArenaBounds, FlightCollider, Wrecked};
use crate::config::ArenaConfig;
use crate::constants::LASER_SIDE;
use crate::damage::DamageMessage;
use crate::kinematics::{BodySize, KinematicBody};
use bevy::math::DVec2;
use bevy::prelude::*;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Laser {
    /// The ship that fired it; never hit by its own shot.
    pub owner: Entity,
}

/// Velocity for a shot fired at `angle_deg` (counter-clockwise on screen, so
/// the y component is negated).
pub fn laser_velocity(angle_deg: f64, speed: f64) -> DVec2 {
    let radians = angle_deg.to_radians();
    DVec2::new(speed * radians.cos(), speed * (-radians).sin())
}

pub fn spawn_laser(
    commands: &mut Commands,
    owner: Entity,
    origin: DVec2,
    angle_deg: f64,
    speed: f64,
) -> Entity {
    commands
        .spawn((
            Laser { owner },
            KinematicBody::new(
                origin,
                laser_velocity(angle_deg, speed),
                BodySize::square(LASER_SIDE),
            ),
        ))
        .id()
}

/// Expire lasers that left the arena and resolve hits for the rest.
pub fn laser_hit_system(
    mut commands: Commands,
    bounds: Res<ArenaBounds>,
    config: Res<ArenaConfig>,
    lasers: Query<(Entity, &Laser, &KinematicBody)>,
    targets: Query<(Entity, &KinematicBody), (With<FlightCollider>, Without<Wrecked>, Without<Laser>)>,
    mut damage: MessageWriter<DamageMessage>,
) {
    for (laser_entity, laser, body) in lasers.iter() {
        if !bounds.contains(body.position) {
            commands.entity(laser_entity).despawn();
            continue;
        }

        let hit_box = body.aabb();
        let nearest = targets
            .iter()
            .filter(|(entity, target)| {
                *entity != laser.owner && hit_box.overlaps(&target.aabb())
            })
            .min_by(|(_, a), (_, b)| {
                a.position
                    .distance_squared(body.position)
                    .total_cmp(&b.position.distance_squared(body.position))
            });

        if let Some((target, _)) = nearest {
            damage.write(DamageMessage {
                entity: target,
                hit_points: config.laser_damage,
            });
            commands.entity(laser_entity).despawn();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn laser_test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_message::<DamageMessage>();
        app.insert_resource(ArenaConfig::default());
        app.insert_resource(ArenaBounds::new(800.0, 600.0).unwrap());
        app.add_systems(Update, laser_hit_system);
        app
    }

    fn target(app: &mut App, at: DVec2) -> Entity {
        app.world_mut()
            .spawn((
                KinematicBody::new(at, DVec2::ZERO, BodySize::square(30)),
                FlightCollider,
            ))
            .id()
    }

    fn laser(app: &mut App, owner: Entity, at: DVec2) -> Entity {
        app.world_mut()
            .spawn((
                Laser { owner },
                KinematicBody::new(at, laser_velocity(0.0, 1000.0), BodySize::square(LASER_SIDE)),
            ))
            .id()
    }

    #[test]
    fn velocity_follows_screen_angle_convention() {
        let right = laser_velocity(0.0, 1000.0);
        assert!((right - DVec2::new(1000.0, 0.0)).length() < EPS);
        let up = laser_velocity(90.0, 1000.0);
        assert!((up - DVec2::new(0.0, -1000.0)).length() < 1e-6);
        let down_left = laser_velocity(225.0, 10.0);
        assert!(down_left.x < 0.0 && down_left.y > 0.0);
    }

    #[test]
    fn laser_leaving_arena_is_removed_without_damage() {
        let mut app = laser_test_app();
        let shot = laser(&mut app, Entity::PLACEHOLDER, DVec2::new(800.0, 100.0));
        app.update();
        assert!(app.world().get_entity(shot).is_err());
        assert!(app
            .world_mut()
            .resource_mut::<Messages<DamageMessage>>()
            .drain()
            .next()
            .is_none());
    }

    #[test]
    fn laser_ignores_owner_and_hits_nearest_other() {
        let mut app = laser_test_app();
        let owner = target(&mut app, DVec2::new(100.0, 100.0));
        let near = target(&mut app, DVec2::new(110.0, 100.0));
        let _far = target(&mut app, DVec2::new(125.0, 100.0));
        let shot = laser(&mut app, owner, DVec2::new(104.0, 100.0));

        app.update();

        assert!(app.world().get_entity(shot).is_err());
        let hits: Vec<DamageMessage> = app
            .world_mut()
            .resource_mut::<Messages<DamageMessage>>()
            .drain()
            .collect();
        assert_eq!(
            hits,
            vec![DamageMessage {
                entity: near,
                hit_points: 1
            }]
        );
    }

    #[test]
    fn laser_touching_only_owner_keeps_flying() {
        let mut app = laser_test_app();
        let owner = target(&mut app, DVec2::new(400.0, 300.0));
        let shot = laser(&mut app, owner, DVec2::new(400.0, 300.0));
        app.update();
        assert!(app.world().get::<Laser>(shot).is_some());
    }
}
