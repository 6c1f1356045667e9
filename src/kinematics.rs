//! Kinematic body: the position/velocity/bounds facet shared by every arena
//! entity, plus explicit-Euler integration and torus wrap-around.

use crate::arena::{ArenaBounds, FlightCollider, Wrecked};
use bevy::math::DVec2;
use bevy::prelude::*;

/// Integer hit-box dimensions.  The area doubles as the collision mass, so a
/// zero side is never representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodySize {
    width: u32,
    height: u32,
}

impl BodySize {
    /// Compile-time constructor for the fixed per-class sizes.
    pub const fn new(width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "body size must have positive area");
        Self { width, height }
    }

    pub const fn square(side: u32) -> Self {
        Self::new(side, side)
    }

    /// Collision mass proxy: `width * height`.
    pub fn mass(&self) -> f64 {
        self.width as f64 * self.height as f64
    }

    pub fn half_extents(&self) -> DVec2 {
        DVec2::new(self.width as f64, self.height as f64) * 0.5
    }
}

/// Axis-aligned bounding box in arena pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: DVec2,
    pub max: DVec2,
}

impl Aabb {
    pub fn from_center(center: DVec2, half_extents: DVec2) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Strict overlap: boxes that only share an edge do not touch.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    pub fn contains_point(&self, point: DVec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    pub fn corners(&self) -> [DVec2; 4] {
        [
            self.min,
            DVec2::new(self.max.x, self.min.y),
            self.max,
            DVec2::new(self.min.x, self.max.y),
        ]
    }
}

#[derive(Component, Debug, Clone, PartialEq)]
pub struct KinematicBody {
    /// Centre of the hit box.
    pub position: DVec2,
    pub velocity: DVec2,
    pub size: BodySize,
    /// Bodies that already resolved a collision against this one during the
    /// current step.  Cleared at the end of every collision pass.
    pub collided_this_step: Vec<Entity>,
}

impl KinematicBody {
    pub fn new(position: DVec2, velocity: DVec2, size: BodySize) -> Self {
        Self {
            position,
            velocity,
            size,
            collided_this_step: Vec::new(),
        }
    }

    pub fn mass(&self) -> f64 {
        self.size.mass()
    }

    pub fn speed(&self) -> f64 {
        self.velocity.length()
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.position, self.size.half_extents())
    }

    /// Explicit Euler step: `position += velocity * dt`.
    pub fn integrate(&mut self, dt: f64) {
        self.position += self.velocity * dt;
    }

    /// Teleport a body whose box has left the arena entirely so it re-enters
    /// flush with the opposite edge.  Axes are handled independently and the
    /// velocity is left alone.
    pub fn wrap(&mut self, bounds: &ArenaBounds) {
        let half = self.size.half_extents();
        self.position.x = wrap_axis(self.position.x, half.x, bounds.width());
        self.position.y = wrap_axis(self.position.y, half.y, bounds.height());
    }
}

fn wrap_axis(center: f64, half: f64, extent: f64) -> f64 {
    if center - half >= extent {
        // max edge lands on 0
        -half
    } else if center + half <= 0.0 {
        // min edge lands on the far side
        extent + half
    } else {
        center
    }
}

/// Advance every live body by the frame delta.
pub fn integrate_bodies_system(
    time: Res<Time>,
    mut bodies: Query<&mut KinematicBody, Without<Wrecked>>,
) {
    let dt = time.delta_secs_f64();
    for mut body in bodies.iter_mut() {
        body.integrate(dt);
    }
}

/// Toroidal correction for every collidable body.  Lasers are not wrapped;
/// they expire at the arena edge instead.
pub fn wrap_bodies_system(
    bounds: Res<ArenaBounds>,
    mut bodies: Query<&mut KinematicBody, (With<FlightCollider>, Without<Wrecked>)>,
) {
    for mut body in bodies.iter_mut() {
        body.wrap(&bounds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn arena() -> ArenaBounds {
        ArenaBounds::new(800.0, 600.0).unwrap()
    }

    fn body_at(x: f64, y: f64) -> KinematicBody {
        KinematicBody::new(
            DVec2::new(x, y),
            DVec2::new(12.0, -7.0),
            BodySize::new(20, 10),
        )
    }

    #[test]
    fn mass_is_area() {
        assert_eq!(BodySize::new(20, 10).mass(), 200.0);
        assert_eq!(BodySize::square(24).mass(), 576.0);
    }

    #[test]
    fn integrate_moves_by_velocity_times_dt() {
        let mut body = body_at(100.0, 100.0);
        body.integrate(0.5);
        assert_eq!(body.position, DVec2::new(106.0, 96.5));
    }

    #[test]
    fn body_one_width_past_right_edge_reenters_from_left() {
        let mut body = body_at(100.0 + 800.0, 300.0);
        body.wrap(&arena());
        assert_eq!(body.aabb().max.x, 0.0);
        assert_eq!(body.position.y, 300.0);
        assert_eq!(body.velocity, DVec2::new(12.0, -7.0));
    }

    #[test]
    fn body_past_left_edge_reenters_from_right() {
        let mut body = body_at(-10.0, 300.0);
        body.wrap(&arena());
        assert_eq!(body.aabb().min.x, 800.0);
        assert_eq!(body.position.y, 300.0);
    }

    #[test]
    fn vertical_wrap_is_independent_of_horizontal() {
        let mut body = body_at(400.0, 606.0);
        body.wrap(&arena());
        assert_eq!(body.position.x, 400.0);
        assert_eq!(body.aabb().max.y, 0.0);

        let mut corner = body_at(810.0, 606.0);
        corner.wrap(&arena());
        assert_eq!(corner.aabb().max.x, 0.0);
        assert_eq!(corner.aabb().max.y, 0.0);
    }

    #[test]
    fn partially_visible_body_is_not_wrapped() {
        let mut body = body_at(795.0, 2.0);
        let before = body.clone();
        body.wrap(&arena());
        assert_eq!(body, before);
    }

    #[test]
    fn systems_integrate_then_wrap_colliders_only() {
        let mut world = World::new();
        let mut time = Time::<()>::default();
        time.advance_by(Duration::from_secs(1));
        world.insert_resource(time);
        world.insert_resource(arena());

        let mut fast = body_at(795.0, 300.0);
        fast.velocity = DVec2::new(30.0, 0.0);
        let collider = world.spawn((fast.clone(), FlightCollider)).id();
        let loose = world.spawn(fast).id();

        let mut schedule = Schedule::default();
        schedule.add_systems((integrate_bodies_system, wrap_bodies_system).chain());
        schedule.run(&mut world);

        let wrapped = world.get::<KinematicBody>(collider).unwrap();
        assert_eq!(wrapped.aabb().max.x, 0.0);
        let unwrapped = world.get::<KinematicBody>(loose).unwrap();
        assert_eq!(unwrapped.position.x, 825.0);
    }
}
