//! Crew commands and weapon reload for the player ship.
//!
//! The interior consoles never touch the ship's physics directly; they send
//! [`ShipCommand`]s which are applied here once per step, before integration.

use super::state::PlayerShip;
use crate::arena::Wrecked;
use crate::config::ArenaConfig;
use crate::kinematics::KinematicBody;
use crate::laser::spawn_laser;
use bevy::math::DVec2;
use bevy::prelude::*;

#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub enum ShipCommand {
    /// Pilot console stick, each axis in `[-1, 1]`.
    Thrust { x: f64, y: f64 },
    /// Weapon console aim, degrees.
    Aim { weapon: usize, angle: f64 },
    Fire { weapon: usize },
    /// Engine console: bring a knocked-out engine back online.
    RepairEngine,
    /// Weapon-system console: bring a knocked-out mount back online.
    RepairWeapon { weapon: usize },
}

/// Count every mount's reload timer down by the frame delta.
pub fn weapon_reload_system(time: Res<Time>, mut ships: Query<&mut PlayerShip>) {
    let dt = time.delta_secs_f64();
    for mut ship in ships.iter_mut() {
        ship.tick_weapons(dt);
    }
}

pub fn ship_command_system(
    mut commands: Commands,
    mut orders: MessageReader<ShipCommand>,
    config: Res<ArenaConfig>,
    mut ships: Query<(Entity, &mut KinematicBody, &mut PlayerShip), Without<Wrecked>>,
) {
    let Ok((entity, mut body, mut ship)) = ships.single_mut() else {
        orders.clear();
        return;
    };

    for order in orders.read() {
        match *order {
            ShipCommand::Thrust { x, y } => {
                if ship.engine_enabled {
                    let axes = DVec2::new(x.clamp(-1.0, 1.0), y.clamp(-1.0, 1.0));
                    body.velocity += axes * config.ship_max_acceleration;
                }
            }
            ShipCommand::Aim { weapon, angle } => {
                if let Some(mount) = ship.weapons.get_mut(weapon) {
                    mount.aim_angle = angle.rem_euclid(360.0);
                }
            }
            ShipCommand::Fire { weapon } => {
                let origin = body.position;
                if let Some(mount) = ship.weapons.get_mut(weapon) {
                    if mount.ready() {
                        spawn_laser(
                            &mut commands,
                            entity,
                            origin,
                            mount.aim_angle,
                            config.laser_speed,
                        );
                        mount.fire_timer = config.ship_laser_delay;
                    }
                }
            }
            ShipCommand::RepairEngine => ship.repair_engine(),
            ShipCommand::RepairWeapon { weapon } => {
                if !ship.repair_weapon(weapon) {
                    warn!("Repair requested for missing weapon mount {weapon}");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::FlightCollider;
    use crate::constants::SHIP_LASER_DELAY;
    use crate::damage::Hull;
    use crate::kinematics::BodySize;
    use crate::laser::Laser;

    fn command_test_app() -> (App, Entity) {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_message::<ShipCommand>();
        app.insert_resource(ArenaConfig::default());
        app.add_systems(Update, (weapon_reload_system, ship_command_system).chain());
        let ship = app
            .world_mut()
            .spawn((
                PlayerShip::default(),
                Hull::new(10),
                KinematicBody::new(DVec2::new(200.0, 200.0), DVec2::ZERO, BodySize::new(30, 40)),
                FlightCollider,
            ))
            .id();
        (app, ship)
    }

    fn laser_count(app: &mut App) -> usize {
        app.world_mut()
            .query::<&Laser>()
            .iter(app.world())
            .count()
    }

    #[test]
    fn thrust_needs_a_working_engine() {
        let (mut app, ship) = command_test_app();
        app.world_mut()
            .write_message(ShipCommand::Thrust { x: 1.0, y: -0.5 });
        app.update();
        let v = app.world().get::<KinematicBody>(ship).unwrap().velocity;
        assert_eq!(v, DVec2::new(5.0, -2.5));

        app.world_mut()
            .get_mut::<PlayerShip>(ship)
            .unwrap()
            .engine_enabled = false;
        app.world_mut()
            .write_message(ShipCommand::Thrust { x: 1.0, y: 1.0 });
        app.update();
        let v = app.world().get::<KinematicBody>(ship).unwrap().velocity;
        assert_eq!(v, DVec2::new(5.0, -2.5));
    }

    #[test]
    fn fire_spawns_one_laser_then_reloads() {
        let (mut app, ship) = command_test_app();
        app.world_mut().write_message(ShipCommand::Aim {
            weapon: 1,
            angle: -90.0,
        });
        app.world_mut()
            .write_message(ShipCommand::Fire { weapon: 1 });
        app.world_mut()
            .write_message(ShipCommand::Fire { weapon: 1 });
        app.update();

        assert_eq!(laser_count(&mut app), 1);
        let state = app.world().get::<PlayerShip>(ship).unwrap();
        assert_eq!(state.weapons[1].aim_angle, 270.0);
        assert!(state.weapons[1].fire_timer > 0.0);
        assert!(state.weapons[1].fire_timer <= SHIP_LASER_DELAY);

        let mut query = app.world_mut().query::<(&Laser, &KinematicBody)>();
        let (laser, body) = query.single(app.world()).unwrap();
        assert_eq!(laser.owner, ship);
        assert!(body.velocity.y > 0.0);
    }

    #[test]
    fn disabled_weapon_does_not_fire_until_repaired() {
        let (mut app, ship) = command_test_app();
        app.world_mut()
            .get_mut::<PlayerShip>(ship)
            .unwrap()
            .weapons[0]
            .enabled = false;
        app.world_mut()
            .write_message(ShipCommand::Fire { weapon: 0 });
        app.update();
        assert_eq!(laser_count(&mut app), 0);

        app.world_mut()
            .write_message(ShipCommand::RepairWeapon { weapon: 0 });
        app.world_mut()
            .write_message(ShipCommand::Fire { weapon: 0 });
        app.update();
        assert_eq!(laser_count(&mut app), 1);
    }
}
