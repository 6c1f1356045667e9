//! Damage model and destruction cascade.
//!
//! Impacts and laser hits both end up as [`DamageMessage`]s.  Each class of
//! body answers them differently:
//!
//! | Body | Impact → damage | On damage |
//! |------|-----------------|-----------|
//! | Asteroid | one hit if force ≥ size threshold | shatters |
//! | Enemy ship | `floor(force / 20 000)` hit points | hull loss |
//! | Player ship | `floor(force / 20 000)` hit points | subsystems first, then hull |
//!
//! A destroyed body is tagged [`Wrecked`] and handled by
//! [`destruction_cascade_system`] at the end of the step, which spawns
//! fragments, reports [`ArenaEvent`]s and despawns it.

use crate::arena::{ArenaEvent, ArenaRng, ExplosionKind, Population, Wrecked};
use crate::asteroid::{split_asteroid, Asteroid};
use crate::collision::ImpactMessage;
use crate::config::ArenaConfig;
use crate::enemy::EnemyShip;
use crate::kinematics::KinematicBody;
use crate::player::PlayerShip;
use bevy::prelude::*;

/// Hit points to subtract from `entity`.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageMessage {
    pub entity: Entity,
    pub hit_points: u32,
}

/// Structural integrity of a ship.  Never goes below zero; zero is terminal.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hull {
    pub current: u32,
}

impl Hull {
    pub fn new(hit_points: u32) -> Self {
        Self {
            current: hit_points,
        }
    }

    /// Subtract hit points, clamping at zero.  Returns `true` once destroyed.
    pub fn apply(&mut self, hit_points: u32) -> bool {
        self.current = self.current.saturating_sub(hit_points);
        self.is_destroyed()
    }

    pub fn is_destroyed(&self) -> bool {
        self.current == 0
    }
}

/// `floor(force / force_per_hit_point)`; negative or NaN forces deal nothing.
pub fn impact_hit_points(force: f64, force_per_hit_point: f64) -> u32 {
    (force / force_per_hit_point).floor() as u32
}

/// Translate resolver impacts into damage according to the body's class.
pub fn impact_damage_system(
    mut impacts: MessageReader<ImpactMessage>,
    mut damage: MessageWriter<DamageMessage>,
    config: Res<ArenaConfig>,
    bodies: Query<(Option<&Asteroid>, Has<Hull>), Without<Wrecked>>,
) {
    for impact in impacts.read() {
        let Ok((asteroid, has_hull)) = bodies.get(impact.entity) else {
            continue;
        };

        let hit_points = if let Some(asteroid) = asteroid {
            u32::from(asteroid.size.breaks_under(impact.force))
        } else if has_hull {
            impact_hit_points(impact.force, config.impact_force_per_hit_point)
        } else {
            0
        };

        if hit_points > 0 {
            debug!(
                "{:?} takes {} hit point(s) from a {:.0} impact",
                impact.entity, hit_points, impact.force
            );
            damage.write(DamageMessage {
                entity: impact.entity,
                hit_points,
            });
        }
    }
}

/// Apply hit points.  Asteroids shatter on any damage; ships lose hull, the
/// player ship after its subsystems have had a chance to absorb the blow.
pub fn apply_damage_system(
    mut commands: Commands,
    mut damage: MessageReader<DamageMessage>,
    mut rng: ResMut<ArenaRng>,
    mut targets: Query<
        (Has<Asteroid>, Option<&mut Hull>, Option<&mut PlayerShip>),
        Without<Wrecked>,
    >,
) {
    for hit in damage.read() {
        if hit.hit_points == 0 {
            continue;
        }
        let Ok((is_asteroid, hull, player)) = targets.get_mut(hit.entity) else {
            continue;
        };

        if is_asteroid {
            commands.entity(hit.entity).insert(Wrecked);
            continue;
        }

        let Some(mut hull) = hull else {
            continue;
        };
        if hull.is_destroyed() {
            continue;
        }

        let remaining = match player {
            Some(mut ship) => ship.absorb_subsystem_damage(hit.hit_points, &mut rng.0),
            None => hit.hit_points,
        };
        if hull.apply(remaining) {
            commands.entity(hit.entity).insert(Wrecked);
        }
    }
}

/// Consume tombstones: spawn fragments, report what happened and despawn.
#[allow(clippy::type_complexity)]
pub fn destruction_cascade_system(
    mut commands: Commands,
    mut rng: ResMut<ArenaRng>,
    mut events: MessageWriter<ArenaEvent>,
    config: Res<ArenaConfig>,
    wrecks: Query<
        (
            Entity,
            &KinematicBody,
            Option<&Asteroid>,
            Has<EnemyShip>,
            Has<PlayerShip>,
        ),
        With<Wrecked>,
    >,
) {
    for (entity, body, asteroid, is_enemy, is_player) in wrecks.iter() {
        let position = body.position;

        if let Some(asteroid) = asteroid {
            match split_asteroid(&mut commands, &mut rng.0, &config, asteroid.size, position) {
                Some((size, children)) => {
                    events.write(ArenaEvent::AsteroidSplit {
                        parent: entity,
                        size,
                        position,
                        children,
                    });
                    events.write(ArenaEvent::PopulationChanged {
                        population: Population::Asteroids,
                        delta: 1,
                    });
                }
                None => {
                    events.write(ArenaEvent::Explosion {
                        position,
                        kind: ExplosionKind::AsteroidDebris,
                    });
                    events.write(ArenaEvent::PopulationChanged {
                        population: Population::Asteroids,
                        delta: -1,
                    });
                }
            }
        } else if is_enemy {
            debug!("Enemy ship {:?} destroyed at {:?}", entity, position);
            events.write(ArenaEvent::Explosion {
                position,
                kind: ExplosionKind::ShipExplosion,
            });
            events.write(ArenaEvent::PopulationChanged {
                population: Population::Enemies,
                delta: -1,
            });
        } else if is_player {
            info!("Player ship destroyed at {:?}", position);
            events.write(ArenaEvent::Explosion {
                position,
                kind: ExplosionKind::ShipExplosion,
            });
            events.write(ArenaEvent::PlayerShipLost { position });
        }

        commands.entity(entity).despawn();
    }
}
