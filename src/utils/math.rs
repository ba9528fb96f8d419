//! Additional 2D vector helpers layered on top of `glam`.

use glam::DVec2;

/// 2D point/vector used throughout the engine.
pub type Vector2 = DVec2;

/// Operations the engine needs that `glam` does not name directly.
pub trait Vector2Ext {
    /// Rotates the vector counter-clockwise by `angle` radians.
    fn rotate_by(self, angle: f64) -> Self;

    /// Scalar 2D cross product `self.x * other.y - self.y * other.x`.
    fn cross_2d(self, other: Self) -> f64;

    /// Cross product of a scalar angular velocity with this lever arm (`w × r`).
    fn angular_cross(self, w: f64) -> Self;
}

impl Vector2Ext for DVec2 {
    #[inline]
    fn rotate_by(self, angle: f64) -> Self {
        DVec2::from_angle(angle).rotate(self)
    }

    #[inline]
    fn cross_2d(self, other: Self) -> f64 {
        self.perp_dot(other)
    }

    #[inline]
    fn angular_cross(self, w: f64) -> Self {
        self.perp() * w
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn quarter_turn_maps_x_to_y() {
        let rotated = Vector2::X.rotate_by(FRAC_PI_2);
        assert_abs_diff_eq!(rotated.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(rotated.y, 1.0, epsilon = 1e-12);

        let back = rotated.rotate_by(-FRAC_PI_2);
        assert_abs_diff_eq!(back.x, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(back.y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn cross_products_follow_right_hand_rule() {
        assert_eq!(Vector2::X.cross_2d(Vector2::Y), 1.0);
        assert_eq!(Vector2::Y.cross_2d(Vector2::X), -1.0);
        assert_eq!(Vector2::new(2.0, 3.0).cross_2d(Vector2::new(4.0, 6.0)), 0.0);

        // w × r for r = (rx, ry) is (-w * ry, w * rx).
        let r = Vector2::new(2.0, -1.0);
        assert_eq!(r.angular_cross(3.0), Vector2::new(3.0, 6.0));
    }
}
