//! Ball joint removing the two translational degrees of freedom between two bodies.

use serde::{Deserialize, Serialize};

use super::rigidbody::RigidBody;
use crate::{
    config::JointParams,
    error::{ensure_timestep, PhysicsError, PhysicsResult},
    utils::{
        allocator::BodyId,
        math::Vector2,
        matrix::Matrix2x2Ext,
    },
};

/// Point-to-point joint pinning `anchor_a` of `body_a` to `anchor_b` of `body_b`.
///
/// Anchors are expressed in their body's local frame. The joint only stores
/// handles; the bodies themselves are passed in by the caller (normally the
/// [`World`](crate::world::World), which resolves the handles).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallJoint {
    pub body_a: BodyId,
    pub body_b: BodyId,
    pub anchor_a: Vector2,
    pub anchor_b: Vector2,
    pub eps_pos: f64,
    pub eps_vel: f64,
    pub p_factor: f64,
}

impl BallJoint {
    pub fn new(body_a: BodyId, anchor_a: Vector2, body_b: BodyId, anchor_b: Vector2) -> Self {
        Self::with_params(body_a, anchor_a, body_b, anchor_b, JointParams::default())
    }

    pub fn with_params(
        body_a: BodyId,
        anchor_a: Vector2,
        body_b: BodyId,
        anchor_b: Vector2,
        params: JointParams,
    ) -> Self {
        Self {
            body_a,
            body_b,
            anchor_a,
            anchor_b,
            eps_pos: params.eps_pos,
            eps_vel: params.eps_vel,
            p_factor: params.p_factor,
        }
    }

    /// Joint whose anchors both sit at the shared world point `point`.
    pub fn at_world_point(
        (body_a, a): (BodyId, &RigidBody),
        (body_b, b): (BodyId, &RigidBody),
        point: Vector2,
        params: JointParams,
    ) -> Self {
        Self::with_params(body_a, a.to_local(point), body_b, b.to_local(point), params)
    }

    pub fn with_tolerances(mut self, eps_pos: f64, eps_vel: f64) -> Self {
        self.eps_pos = eps_pos;
        self.eps_vel = eps_vel;
        self
    }

    pub fn with_p_factor(mut self, p_factor: f64) -> Self {
        self.p_factor = p_factor;
        self
    }

    pub fn params(&self) -> JointParams {
        JointParams {
            eps_pos: self.eps_pos,
            eps_vel: self.eps_vel,
            p_factor: self.p_factor,
        }
    }

    pub fn set_params(&mut self, params: JointParams) {
        self.eps_pos = params.eps_pos;
        self.eps_vel = params.eps_vel;
        self.p_factor = params.p_factor;
    }

    pub fn connects(&self, body: BodyId) -> bool {
        self.body_a == body || self.body_b == body
    }

    pub fn a_in_world(&self, a: &RigidBody) -> Vector2 {
        a.to_world(self.anchor_a)
    }

    pub fn b_in_world(&self, b: &RigidBody) -> Vector2 {
        b.to_world(self.anchor_b)
    }

    /// Anchor separation `b - a` after `dt` of free motion of both bodies.
    pub fn predicted_separation(&self, a: &RigidBody, b: &RigidBody, dt: f64) -> Vector2 {
        b.to_world_after(self.anchor_b, dt) - a.to_world_after(self.anchor_a, dt)
    }

    pub fn position_error(&self, a: &RigidBody, b: &RigidBody, dt: f64) -> f64 {
        self.predicted_separation(a, b, dt).length()
    }

    /// Current (unpredicted) anchor separation.
    pub fn separation(&self, a: &RigidBody, b: &RigidBody) -> f64 {
        (self.b_in_world(b) - self.a_in_world(a)).length()
    }

    /// Applies equal and opposite impulses so the anchors meet after `dt`.
    ///
    /// Call before the bodies are integrated. Returns `Ok(false)` without
    /// touching anything if both bodies are static or the predicted separation
    /// is already within `eps_pos`.
    pub fn correct_position(
        &self,
        a: &mut RigidBody,
        b: &mut RigidBody,
        dt: f64,
    ) -> PhysicsResult<bool> {
        ensure_timestep(dt)?;
        if a.is_static && b.is_static {
            return Ok(false);
        }

        let separation = self.predicted_separation(a, b, dt);
        if separation.length() <= self.eps_pos {
            return Ok(false);
        }

        // The correction happens through velocity, so the gap is spread over dt.
        self.apply_correction(a, b, separation / dt)?;
        Ok(true)
    }

    pub fn relative_velocity(&self, a: &RigidBody, b: &RigidBody) -> Vector2 {
        b.velocity_at(self.b_in_world(b)) - a.velocity_at(self.a_in_world(a))
    }

    pub fn velocity_error(&self, a: &RigidBody, b: &RigidBody) -> f64 {
        self.relative_velocity(a, b).length()
    }

    /// Applies equal and opposite impulses so the anchors move together.
    ///
    /// Call after the bodies were integrated. Same no-op rules as
    /// [`Self::correct_position`], with `eps_vel`.
    pub fn correct_velocity(&self, a: &mut RigidBody, b: &mut RigidBody) -> PhysicsResult<bool> {
        if a.is_static && b.is_static {
            return Ok(false);
        }

        let dv = self.relative_velocity(a, b);
        if dv.length() <= self.eps_vel {
            return Ok(false);
        }

        self.apply_correction(a, b, dv)?;
        Ok(true)
    }

    /// Impulse that changes the relative anchor velocity by `target`, scaled by `p_factor`.
    pub fn correction_impulse(
        &self,
        a: &RigidBody,
        b: &RigidBody,
        target: Vector2,
    ) -> PhysicsResult<Vector2> {
        let k = a.effective_mass(self.a_in_world(a)) + b.effective_mass(self.b_in_world(b));
        let inverse = k.checked_inverse().map_err(|err| match err {
            PhysicsError::SingularMatrix { determinant } => PhysicsError::SingularConstraint {
                body_a: self.body_a,
                body_b: self.body_b,
                determinant,
            },
            other => other,
        })?;
        Ok(inverse.mul_vec2(target) * self.p_factor)
    }

    fn apply_correction(
        &self,
        a: &mut RigidBody,
        b: &mut RigidBody,
        target: Vector2,
    ) -> PhysicsResult<()> {
        let impulse = self.correction_impulse(a, b, target)?;
        let anchor_a = self.a_in_world(a);
        let anchor_b = self.b_in_world(b);
        a.apply_impulse_at(impulse, anchor_a);
        b.apply_impulse_at(-impulse, anchor_b);
        Ok(())
    }
}
