//! Simulated entities: rigid bodies, their mass properties, and joints between them.

pub mod constraints;
pub mod rigidbody;
pub mod types;

pub use constraints::BallJoint;
pub use rigidbody::RigidBody;
pub use types::MassProperties;
