use crate::{
    core::rigidbody::RigidBody,
    utils::{
        allocator::{Arena, BodyId},
        math::Vector2,
    },
};

/// Pose and velocity of a body after a timestep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    pub position: Vector2,
    pub velocity: Vector2,
    pub rotation: f64,
    pub angular_velocity: f64,
}

/// Advances `body` by `dt` under its accumulated force and torque, held constant.
///
/// `s + v*dt + ½*F/m*dt²`, `v + F/m*dt`, and the same for rotation. The body
/// itself is left untouched so this doubles as the prediction used by joints.
pub fn predict(body: &RigidBody, dt: f64) -> Motion {
    let linear_accel = body.force * body.inverse_mass;
    let angular_accel = body.torque * body.inverse_inertia;

    Motion {
        position: body.position + body.velocity * dt + linear_accel * (0.5 * dt * dt),
        velocity: body.velocity + linear_accel * dt,
        rotation: body.rotation + body.angular_velocity * dt + 0.5 * angular_accel * dt * dt,
        angular_velocity: body.angular_velocity + angular_accel * dt,
    }
}

/// Integrator responsible for stepping every dynamic body forward in time.
#[derive(Debug, Clone, Copy, Default)]
pub struct Integrator;

impl Integrator {
    pub fn new() -> Self {
        Self
    }

    /// Applies [`predict`] in place. Static bodies are skipped.
    pub fn integrate_body(&self, body: &mut RigidBody, dt: f64) {
        if body.is_static {
            return;
        }
        let motion = predict(body, dt);
        body.position = motion.position;
        body.velocity = motion.velocity;
        body.rotation = motion.rotation;
        body.angular_velocity = motion.angular_velocity;
    }

    /// Integrates all bodies and returns how many moved.
    pub fn step(&self, bodies: &mut Arena<BodyId, RigidBody>, dt: f64) -> usize {
        let mut integrated = 0;
        for body in bodies.iter_mut() {
            if body.is_dynamic() {
                self.integrate_body(body, dt);
                integrated += 1;
            }
        }
        integrated
    }
}
