//! Global configuration constants and serializable settings for the engine.

use serde::{Deserialize, Serialize};

use crate::utils::math::Vector2;

/// Default gravity vector (screen coordinates, +Y points down).
pub const DEFAULT_GRAVITY: [f64; 2] = [0.0, 10.0];

/// Default integration timestep (in seconds) used by demos and benchmarks.
pub const DEFAULT_TIME_STEP: f64 = 1.0 / 100.0;

/// Maximum position-correction passes per step.
pub const DEFAULT_POSITION_ITERATIONS: u32 = 10;

/// Maximum velocity-correction passes per step.
pub const DEFAULT_VELOCITY_ITERATIONS: u32 = 10;

/// Joint anchor separation below which no position correction is applied.
pub const DEFAULT_POSITION_TOLERANCE: f64 = 1e-3;

/// Joint anchor relative speed below which no velocity correction is applied.
pub const DEFAULT_VELOCITY_TOLERANCE: f64 = 1e-3;

/// Scale applied to every corrective impulse.
pub const DEFAULT_IMPULSE_FACTOR: f64 = 1.0;

/// Allowed overlap between touching shapes. Reserved; the solver ignores it.
pub const DEFAULT_COLLISION_TOLERANCE: f64 = 0.001;

/// Determinants with a smaller magnitude are treated as singular.
pub const SINGULAR_EPSILON: f64 = 1e-12;

/// Per-joint solver parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JointParams {
    pub eps_pos: f64,
    pub eps_vel: f64,
    /// Values above 1.0 speed up convergence of the iterative corrector.
    pub p_factor: f64,
}

impl Default for JointParams {
    fn default() -> Self {
        Self {
            eps_pos: DEFAULT_POSITION_TOLERANCE,
            eps_vel: DEFAULT_VELOCITY_TOLERANCE,
            p_factor: DEFAULT_IMPULSE_FACTOR,
        }
    }
}

/// World-level settings. Missing fields fall back to the defaults above.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub gravity: Vector2,
    pub max_position_iterations: u32,
    pub max_velocity_iterations: u32,
    /// Stop a correction loop as soon as the summed joint error stops improving.
    pub stop_on_worse: bool,
    pub collision_tolerance: f64,
    /// Parameters given to joints created with [`World::add_joint_at`](crate::world::World::add_joint_at).
    pub joint_defaults: JointParams,
    /// Warn when total energy drifts further than this from its first-step value. 0 disables.
    pub energy_drift_warning: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            gravity: Vector2::from_array(DEFAULT_GRAVITY),
            max_position_iterations: DEFAULT_POSITION_ITERATIONS,
            max_velocity_iterations: DEFAULT_VELOCITY_ITERATIONS,
            stop_on_worse: true,
            collision_tolerance: DEFAULT_COLLISION_TOLERANCE,
            joint_defaults: JointParams::default(),
            energy_drift_warning: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config: WorldConfig =
            serde_json::from_str(r#"{ "max_position_iterations": 25, "joint_defaults": { "p_factor": 1.5 } }"#)
                .unwrap();
        assert_eq!(config.max_position_iterations, 25);
        assert_eq!(config.max_velocity_iterations, DEFAULT_VELOCITY_ITERATIONS);
        assert_eq!(config.joint_defaults.p_factor, 1.5);
        assert_eq!(config.joint_defaults.eps_pos, DEFAULT_POSITION_TOLERANCE);
        assert_eq!(config.gravity, Vector2::new(0.0, 10.0));
        assert!(config.stop_on_worse);
    }

    #[test]
    fn config_survives_serialization() {
        let config = WorldConfig {
            gravity: Vector2::new(1.0, -9.81),
            stop_on_worse: false,
            ..WorldConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: WorldConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
