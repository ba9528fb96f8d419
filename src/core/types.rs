use serde::{Deserialize, Serialize};

use crate::error::{PhysicsError, PhysicsResult};

/// Validated mass and moment of inertia of a rigid body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MassProperties {
    mass: f64,
    inertia: f64,
}

impl Default for MassProperties {
    fn default() -> Self {
        Self {
            mass: 1.0,
            inertia: 1.0,
        }
    }
}

impl MassProperties {
    /// Both values must be finite and strictly positive.
    pub fn new(mass: f64, inertia: f64) -> PhysicsResult<Self> {
        let valid = |value: f64| value.is_finite() && value > 0.0;
        if !valid(mass) || !valid(inertia) {
            return Err(PhysicsError::InvalidBodyParameters { mass, inertia });
        }
        Ok(Self { mass, inertia })
    }

    /// Thin rod of `length` rotating about its center: `m * l² / 12`.
    pub fn rod(mass: f64, length: f64) -> PhysicsResult<Self> {
        Self::new(mass, mass * length * length / 12.0)
    }

    /// Solid disc of `radius`: `m * r² / 2`.
    pub fn disc(mass: f64, radius: f64) -> PhysicsResult<Self> {
        Self::new(mass, 0.5 * mass * radius * radius)
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn inertia(&self) -> f64 {
        self.inertia
    }

    pub fn inverse_mass(&self) -> f64 {
        1.0 / self.mass
    }

    pub fn inverse_inertia(&self) -> f64 {
        1.0 / self.inertia
    }
}
