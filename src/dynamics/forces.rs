use crate::{
    core::rigidbody::RigidBody,
    utils::{
        allocator::{Arena, BodyId},
        math::Vector2,
    },
};

/// Uniform gravity. Unlike [`ForceGenerator`]s it replaces the accumulated
/// force instead of adding to it, so nothing applied earlier survives a step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravityForce {
    pub gravity: Vector2,
}

impl GravityForce {
    pub fn new(gravity: Vector2) -> Self {
        Self { gravity }
    }

    /// Sets `force = gravity * mass` and clears torque on a dynamic body.
    pub fn reset(&self, body: &mut RigidBody) {
        if body.is_static {
            return;
        }
        body.force = if body.inverse_mass > 0.0 {
            self.gravity / body.inverse_mass
        } else {
            Vector2::ZERO
        };
        body.torque = 0.0;
    }
}

/// Persistent force source re-applied on every step, after gravity.
pub trait ForceGenerator: Send + Sync {
    fn apply(&self, body: &mut RigidBody, dt: f64);
}

/// Quadratic drag resisting the direction of motion.
pub struct DragForce {
    pub drag_coefficient: f64,
}

impl ForceGenerator for DragForce {
    fn apply(&self, body: &mut RigidBody, _dt: f64) {
        let speed = body.velocity.length();
        if speed < 1e-9 {
            return;
        }
        body.apply_force(-body.velocity * speed * self.drag_coefficient);
    }
}

/// Damped Hookean spring pulling a body-local point towards a fixed world point.
pub struct SpringForce {
    pub anchor: Vector2,
    pub local_point: Vector2,
    pub rest_length: f64,
    pub spring_constant: f64,
    pub damping: f64,
}

impl ForceGenerator for SpringForce {
    fn apply(&self, body: &mut RigidBody, _dt: f64) {
        let attach = body.to_world(self.local_point);
        let displacement = attach - self.anchor;
        let distance = displacement.length();
        if distance < 1e-9 {
            return;
        }

        let extension = distance - self.rest_length;
        let spring_force = -self.spring_constant * extension * (displacement / distance);
        let damping_force = -self.damping * body.velocity_at(attach);
        body.apply_force_at(spring_force + damping_force, attach);
    }
}

/// Bodies a registered force acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForceTarget {
    All,
    Body(BodyId),
}

/// Collection of persistent forces applied each step.
#[derive(Default)]
pub struct ForceRegistry {
    forces: Vec<(ForceTarget, Box<dyn ForceGenerator>)>,
}

impl ForceRegistry {
    pub fn new() -> Self {
        Self { forces: Vec::new() }
    }

    pub fn add_force<F: ForceGenerator + 'static>(&mut self, force: F) {
        self.forces.push((ForceTarget::All, Box::new(force)));
    }

    pub fn add_force_to<F: ForceGenerator + 'static>(&mut self, body: BodyId, force: F) {
        self.forces.push((ForceTarget::Body(body), Box::new(force)));
    }

    /// Drops every force that targets `body`.
    pub fn remove_forces_for(&mut self, body: BodyId) {
        self.forces
            .retain(|(target, _)| *target != ForceTarget::Body(body));
    }

    pub fn clear(&mut self) {
        self.forces.clear();
    }

    pub fn len(&self) -> usize {
        self.forces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forces.is_empty()
    }

    pub fn apply_all(&self, bodies: &mut Arena<BodyId, RigidBody>, dt: f64) {
        for (target, force) in &self.forces {
            match *target {
                ForceTarget::All => {
                    for body in bodies.iter_mut() {
                        force.apply(body, dt);
                    }
                }
                ForceTarget::Body(id) => {
                    if let Some(body) = bodies.get_mut(id) {
                        force.apply(body, dt);
                    }
                }
            }
        }
    }
}
