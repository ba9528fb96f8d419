//! Error types for the impulse2d engine.

use thiserror::Error;

use crate::utils::allocator::{BodyId, JointId};

/// Convenience alias used by every fallible engine operation.
pub type PhysicsResult<T> = Result<T, PhysicsError>;

/// Errors raised by the math layer, body construction, joints, and the world.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    /// A 2x2 matrix has no inverse (its determinant is numerically zero).
    #[error("matrix is singular (determinant {determinant:e})")]
    SingularMatrix {
        /// Determinant that failed the singularity test.
        determinant: f64,
    },

    /// The combined effective-mass matrix of a joint cannot be inverted.
    #[error("singular constraint between {body_a:?} and {body_b:?} (determinant {determinant:e})")]
    SingularConstraint {
        /// First body of the joint.
        body_a: BodyId,
        /// Second body of the joint.
        body_b: BodyId,
        /// Determinant of the combined effective-mass matrix.
        determinant: f64,
    },

    /// Mass or inertia was zero, negative, or not finite.
    #[error("invalid body parameters: mass {mass}, inertia {inertia}")]
    InvalidBodyParameters {
        /// Mass that was supplied.
        mass: f64,
        /// Moment of inertia that was supplied.
        inertia: f64,
    },

    /// Timestep was zero, negative, or not finite.
    #[error("invalid timestep: {0}")]
    InvalidTimestep(f64),

    /// A handle does not refer to a live body.
    #[error("unknown body: {0:?}")]
    UnknownBody(BodyId),

    /// A handle does not refer to a live joint.
    #[error("unknown joint: {0:?}")]
    UnknownJoint(JointId),

    /// The joint description itself is unusable.
    #[error("invalid joint: {reason}")]
    InvalidJoint {
        /// Human-readable description of the problem.
        reason: &'static str,
    },

    /// A body cannot be removed while joints still reference it.
    #[error("body {body:?} is still referenced by {joints} joint(s)")]
    BodyInUse {
        /// Body whose removal was requested.
        body: BodyId,
        /// Number of joints referencing it.
        joints: usize,
    },
}

/// Rejects timesteps the integrator and the position corrector cannot divide by.
pub(crate) fn ensure_timestep(dt: f64) -> PhysicsResult<()> {
    if dt.is_finite() && dt > 0.0 {
        Ok(())
    } else {
        Err(PhysicsError::InvalidTimestep(dt))
    }
}
