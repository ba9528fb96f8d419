//! Simulation dynamics modules: integration, forces, and the joint solver.

pub mod forces;
pub mod integrator;
pub mod solver;

pub use forces::{DragForce, ForceGenerator, ForceRegistry, ForceTarget, GravityForce, SpringForce};
pub use integrator::{Integrator, Motion};
pub use solver::{CorrectionReport, JointSolver};
