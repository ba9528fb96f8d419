//! Impulse2D – planar rigid-body dynamics with ball joints.
//!
//! Bodies are integrated with constant-acceleration kinematics and held
//! together by ball joints that are enforced with impulses: a position pass
//! before integration aims the anchors at each other, and a velocity pass
//! afterwards makes them move together.

pub mod config;
pub mod core;
pub mod dynamics;
pub mod error;
pub mod utils;
pub mod world;

pub use config::{JointParams, WorldConfig};
pub use crate::core::{
    constraints::BallJoint,
    rigidbody::RigidBody,
    types::MassProperties,
};
pub use dynamics::{
    forces::{DragForce, ForceGenerator, ForceRegistry, ForceTarget, GravityForce, SpringForce},
    integrator::Integrator,
    solver::{CorrectionReport, JointSolver},
};
pub use error::{PhysicsError, PhysicsResult};
pub use utils::{
    allocator::{Arena, BodyId, GenerationalId, Handle, JointId},
    math::{Vector2, Vector2Ext},
    matrix::{Matrix2x2, Matrix2x2Ext},
};
pub use world::{StepReport, World};
