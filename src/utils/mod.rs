//! Utility helpers: vector/matrix math, generational handles, and logging.

pub mod allocator;
pub mod logging;
pub mod math;
pub mod matrix;

pub use allocator::{Arena, BodyId, GenerationalId, Handle, JointId};
pub use math::{Vector2, Vector2Ext};
pub use matrix::{mat2, solve_linear_2x2, Matrix2x2, Matrix2x2Ext};
