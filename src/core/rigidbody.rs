use serde::{Deserialize, Serialize};

use super::types::MassProperties;
use crate::dynamics::integrator::{self, Integrator};
use crate::utils::{
    math::{Vector2, Vector2Ext},
    matrix::{mat2, Matrix2x2},
};

/// Core rigid body description storing kinematic state and properties.
///
/// Inverse mass and inertia are stored so that a value of zero can stand for
/// an infinitely heavy body. Static bodies (`is_static`) never move through
/// integration, impulses, or forces; they act as fixed anchors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RigidBody {
    pub position: Vector2,
    pub velocity: Vector2,
    /// Orientation in radians.
    pub rotation: f64,
    pub angular_velocity: f64,
    pub inverse_mass: f64,
    pub inverse_inertia: f64,
    /// Force accumulated for the next integration.
    pub force: Vector2,
    /// Torque accumulated for the next integration.
    pub torque: f64,
    pub is_static: bool,
}

impl Default for RigidBody {
    fn default() -> Self {
        Self::new(Vector2::ZERO, MassProperties::default())
    }
}

impl RigidBody {
    /// Creates a dynamic body at rest.
    pub fn new(position: Vector2, mass_properties: MassProperties) -> Self {
        Self {
            position,
            velocity: Vector2::ZERO,
            rotation: 0.0,
            angular_velocity: 0.0,
            inverse_mass: mass_properties.inverse_mass(),
            inverse_inertia: mass_properties.inverse_inertia(),
            force: Vector2::ZERO,
            torque: 0.0,
            is_static: false,
        }
    }

    pub fn with_velocity(mut self, velocity: Vector2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_angular_velocity(mut self, angular_velocity: f64) -> Self {
        self.angular_velocity = angular_velocity;
        self
    }

    pub fn into_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn is_dynamic(&self) -> bool {
        !self.is_static
    }

    pub fn set_mass_properties(&mut self, props: MassProperties) {
        self.inverse_mass = props.inverse_mass();
        self.inverse_inertia = props.inverse_inertia();
    }

    /// Mass, or `f64::INFINITY` when the inverse mass is zero.
    pub fn mass(&self) -> f64 {
        reciprocal(self.inverse_mass)
    }

    /// Moment of inertia, or `f64::INFINITY` when the inverse inertia is zero.
    pub fn inertia(&self) -> f64 {
        reciprocal(self.inverse_inertia)
    }

    /// Advances the body by `dt` using the accumulated force and torque.
    pub fn integrate(&mut self, dt: f64) {
        Integrator::new().integrate_body(self, dt);
    }

    /// Displacement of the center of mass after `dt` of free motion.
    pub fn predict_displacement(&self, dt: f64) -> Vector2 {
        if self.is_static {
            return Vector2::ZERO;
        }
        integrator::predict(self, dt).position - self.position
    }

    /// Applies an impulse through the center of mass.
    pub fn apply_impulse(&mut self, impulse: Vector2) {
        if self.is_static {
            return;
        }
        self.velocity += impulse * self.inverse_mass;
    }

    /// Applies an impulse at a world-space point, changing both velocities.
    pub fn apply_impulse_at(&mut self, impulse: Vector2, point: Vector2) {
        if self.is_static {
            return;
        }
        self.velocity += impulse * self.inverse_mass;
        self.angular_velocity += (point - self.position).cross_2d(impulse) * self.inverse_inertia;
    }

    /// Accumulates a force acting on the center of mass for the next step.
    pub fn apply_force(&mut self, force: Vector2) {
        if self.is_static {
            return;
        }
        self.force += force;
    }

    /// Accumulates a force acting at a world-space point for the next step.
    pub fn apply_force_at(&mut self, force: Vector2, point: Vector2) {
        if self.is_static {
            return;
        }
        self.force += force;
        self.torque += force.cross_2d(point - self.position);
    }

    pub fn clear_accumulators(&mut self) {
        self.force = Vector2::ZERO;
        self.torque = 0.0;
    }

    /// Transforms a body-local point into world coordinates.
    pub fn to_world(&self, local: Vector2) -> Vector2 {
        self.position + local.rotate_by(self.rotation)
    }

    /// World position of `local` after `dt` of unconstrained motion.
    ///
    /// Static bodies do not move, so this equals [`Self::to_world`] for them.
    pub fn to_world_after(&self, local: Vector2, dt: f64) -> Vector2 {
        if self.is_static {
            return self.to_world(local);
        }
        let motion = integrator::predict(self, dt);
        motion.position + local.rotate_by(motion.rotation)
    }

    /// Transforms a world point into body-local coordinates.
    pub fn to_local(&self, world: Vector2) -> Vector2 {
        (world - self.position).rotate_by(-self.rotation)
    }

    /// Velocity of the material point currently at `world`.
    pub fn velocity_at(&self, world: Vector2) -> Vector2 {
        if self.is_static {
            return Vector2::ZERO;
        }
        self.velocity + (world - self.position).angular_cross(self.angular_velocity)
    }

    /// Matrix mapping an impulse at `world` to the velocity change at that point.
    ///
    /// `K = inv_m * I + inv_I * [[r.y², -r.x*r.y], [-r.x*r.y, r.x²]]`, zero for
    /// static bodies.
    pub fn effective_mass(&self, world: Vector2) -> Matrix2x2 {
        if self.is_static {
            return Matrix2x2::ZERO;
        }
        let r = world - self.position;
        let m = self.inverse_mass;
        let i = self.inverse_inertia;
        let off_diagonal = -i * r.x * r.y;
        mat2(m + i * r.y * r.y, off_diagonal, off_diagonal, m + i * r.x * r.x)
    }

    /// Kinetic plus gravitational potential energy.
    ///
    /// Terms whose mass or inertia is infinite are left out.
    pub fn energy(&self, gravity: Vector2) -> f64 {
        let mut energy = 0.0;
        if self.inverse_mass > 0.0 {
            let mass = 1.0 / self.inverse_mass;
            energy += 0.5 * mass * self.velocity.length_squared() - mass * gravity.dot(self.position);
        }
        if self.inverse_inertia > 0.0 {
            energy += 0.5 / self.inverse_inertia * self.angular_velocity * self.angular_velocity;
        }
        energy
    }
}

fn reciprocal(inverse: f64) -> f64 {
    if inverse == 0.0 {
        f64::INFINITY
    } else {
        1.0 / inverse
    }
}
