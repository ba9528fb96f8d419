//! 2x2 matrix helpers and the closed-form 2x2 linear solver.

use glam::{DMat2, DVec2};

use crate::config::SINGULAR_EPSILON;
use crate::error::{PhysicsError, PhysicsResult};

/// 2x2 matrix used as the constraint effective-mass matrix.
pub type Matrix2x2 = DMat2;

/// Builds `[[a, b], [c, d]]` from row-major entries.
#[inline]
pub fn mat2(a: f64, b: f64, c: f64, d: f64) -> Matrix2x2 {
    DMat2::from_cols(DVec2::new(a, c), DVec2::new(b, d))
}

/// Solves `a*x1 + b*x2 = e`, `c*x1 + d*x2 = f` with Cramer's rule.
///
/// Returns `None` when the system has no unique solution.
pub fn solve_linear_2x2(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Option<(f64, f64)> {
    let det = a * d - b * c;
    if is_singular(det) {
        return None;
    }
    Some(((e * d - b * f) / det, (a * f - e * c) / det))
}

/// Checked operations on [`Matrix2x2`].
pub trait Matrix2x2Ext: Sized {
    /// Row-major entries `[a, b, c, d]`.
    fn entries(&self) -> [f64; 4];

    /// Inverse, or [`PhysicsError::SingularMatrix`] when `|det| < 1e-12`.
    fn checked_inverse(&self) -> PhysicsResult<Self>;

    /// Solves `self * x = rhs` via [`solve_linear_2x2`].
    fn solve_linear(&self, rhs: DVec2) -> PhysicsResult<DVec2>;
}

impl Matrix2x2Ext for DMat2 {
    fn entries(&self) -> [f64; 4] {
        [self.x_axis.x, self.y_axis.x, self.x_axis.y, self.y_axis.y]
    }

    fn checked_inverse(&self) -> PhysicsResult<Self> {
        let [a, b, c, d] = self.entries();
        let determinant = a * d - b * c;
        if is_singular(determinant) {
            return Err(PhysicsError::SingularMatrix { determinant });
        }
        let inv_det = 1.0 / determinant;
        Ok(mat2(d * inv_det, -b * inv_det, -c * inv_det, a * inv_det))
    }

    fn solve_linear(&self, rhs: DVec2) -> PhysicsResult<DVec2> {
        let [a, b, c, d] = self.entries();
        solve_linear_2x2(a, b, c, d, rhs.x, rhs.y)
            .map(|(x1, x2)| DVec2::new(x1, x2))
            .ok_or(PhysicsError::SingularMatrix {
                determinant: a * d - b * c,
            })
    }
}

// NaN determinants count as singular.
#[inline]
fn is_singular(determinant: f64) -> bool {
    determinant.is_nan() || determinant.abs() < SINGULAR_EPSILON
}
