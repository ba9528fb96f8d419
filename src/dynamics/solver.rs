//! Sequential-impulse (Gauss-Seidel) relaxation over the joint set.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    config::{DEFAULT_POSITION_ITERATIONS, DEFAULT_VELOCITY_ITERATIONS},
    core::{constraints::BallJoint, rigidbody::RigidBody},
    error::{ensure_timestep, PhysicsError, PhysicsResult},
    utils::allocator::{Arena, BodyId, JointId},
};

/// Outcome of one correction loop.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorrectionReport {
    /// Passes over the joint set that improved the state.
    pub iterations: u32,
    /// Summed joint error after the last pass.
    pub error: f64,
    /// Whether the last pass applied any impulse.
    pub changed: bool,
    /// Whether the loop ended because the summed error stopped decreasing.
    pub stopped_on_worse: bool,
}

/// Iterative joint corrector with bounded passes per step.
///
/// Exceeding a pass limit is not an error; the result is simply approximate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointSolver {
    pub max_position_iterations: u32,
    pub max_velocity_iterations: u32,
    /// Stop as soon as a pass leaves the summed error no better than before.
    pub stop_on_worse: bool,
}

impl Default for JointSolver {
    fn default() -> Self {
        Self {
            max_position_iterations: DEFAULT_POSITION_ITERATIONS,
            max_velocity_iterations: DEFAULT_VELOCITY_ITERATIONS,
            stop_on_worse: true,
        }
    }
}

impl JointSolver {
    pub fn new(max_position_iterations: u32, max_velocity_iterations: u32) -> Self {
        Self {
            max_position_iterations,
            max_velocity_iterations,
            ..Self::default()
        }
    }

    /// Applies impulses so every joint's anchors meet after `dt`. Call before integrating.
    pub fn correct_positions(
        &self,
        bodies: &mut Arena<BodyId, RigidBody>,
        joints: &Arena<JointId, BallJoint>,
        dt: f64,
    ) -> PhysicsResult<CorrectionReport> {
        ensure_timestep(dt)?;
        let report = self.relax(
            bodies,
            joints,
            self.max_position_iterations,
            |joint, a, b| joint.correct_position(a, b, dt),
            |joint, a, b| joint.position_error(a, b, dt),
        )?;
        debug!(
            "position correction: {} iteration(s), error {:.3e}",
            report.iterations, report.error
        );
        Ok(report)
    }

    /// Applies impulses so every joint's anchors move together. Call after integrating.
    pub fn correct_velocities(
        &self,
        bodies: &mut Arena<BodyId, RigidBody>,
        joints: &Arena<JointId, BallJoint>,
    ) -> PhysicsResult<CorrectionReport> {
        let report = self.relax(
            bodies,
            joints,
            self.max_velocity_iterations,
            |joint, a, b| joint.correct_velocity(a, b),
            |joint, a, b| joint.velocity_error(a, b),
        )?;
        debug!(
            "velocity correction: {} iteration(s), error {:.3e}",
            report.iterations, report.error
        );
        Ok(report)
    }

    /// Sums `position_error` over all joints.
    pub fn total_position_error(
        bodies: &Arena<BodyId, RigidBody>,
        joints: &Arena<JointId, BallJoint>,
        dt: f64,
    ) -> PhysicsResult<f64> {
        total_error(bodies, joints, |joint, a, b| joint.position_error(a, b, dt))
    }

    /// Sums `velocity_error` over all joints.
    pub fn total_velocity_error(
        bodies: &Arena<BodyId, RigidBody>,
        joints: &Arena<JointId, BallJoint>,
    ) -> PhysicsResult<f64> {
        total_error(bodies, joints, |joint, a, b| joint.velocity_error(a, b))
    }

    fn relax<C, E>(
        &self,
        bodies: &mut Arena<BodyId, RigidBody>,
        joints: &Arena<JointId, BallJoint>,
        max_iterations: u32,
        mut correct: C,
        mut measure: E,
    ) -> PhysicsResult<CorrectionReport>
    where
        C: FnMut(&BallJoint, &mut RigidBody, &mut RigidBody) -> PhysicsResult<bool>,
        E: FnMut(&BallJoint, &RigidBody, &RigidBody) -> f64,
    {
        let mut report = CorrectionReport::default();
        let mut last = f64::INFINITY;

        loop {
            let mut changed = false;
            for joint in joints.iter() {
                let (a, b) = pair_mut(bodies, joint)?;
                changed |= correct(joint, a, b)?;
            }
            let now = total_error(bodies, joints, &mut measure)?;

            report.error = now;
            report.changed = changed;
            if !changed {
                break;
            }
            if self.stop_on_worse && now >= last {
                report.stopped_on_worse = true;
                break;
            }
            last = now;
            report.iterations += 1;
            if report.iterations >= max_iterations {
                break;
            }
        }

        Ok(report)
    }
}

fn total_error<E>(
    bodies: &Arena<BodyId, RigidBody>,
    joints: &Arena<JointId, BallJoint>,
    mut measure: E,
) -> PhysicsResult<f64>
where
    E: FnMut(&BallJoint, &RigidBody, &RigidBody) -> f64,
{
    let mut sum = 0.0;
    for joint in joints.iter() {
        let a = bodies
            .get(joint.body_a)
            .ok_or(PhysicsError::UnknownBody(joint.body_a))?;
        let b = bodies
            .get(joint.body_b)
            .ok_or(PhysicsError::UnknownBody(joint.body_b))?;
        sum += measure(joint, a, b);
    }
    Ok(sum)
}

fn pair_mut<'a>(
    bodies: &'a mut Arena<BodyId, RigidBody>,
    joint: &BallJoint,
) -> PhysicsResult<(&'a mut RigidBody, &'a mut RigidBody)> {
    if !bodies.contains(joint.body_a) {
        return Err(PhysicsError::UnknownBody(joint.body_a));
    }
    if !bodies.contains(joint.body_b) {
        return Err(PhysicsError::UnknownBody(joint.body_b));
    }
    bodies
        .get2_mut(joint.body_a, joint.body_b)
        .ok_or(PhysicsError::InvalidJoint {
            reason: "joint connects a body to itself",
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{core::types::MassProperties, utils::math::Vector2};

    const DT: f64 = 0.01;

    fn pendulum(p_factor: f64) -> (Arena<BodyId, RigidBody>, Arena<JointId, BallJoint>) {
        let mut bodies = Arena::new();
        let pivot = bodies.insert(RigidBody::default().into_static());
        let mut bob = RigidBody::new(Vector2::new(1.3, 0.2), MassProperties::default()).with_rotation(0.3);
        bob.force = Vector2::new(0.0, 10.0);
        let bob = bodies.insert(bob);

        let mut joints = Arena::new();
        joints.insert(
            BallJoint::new(pivot, Vector2::ZERO, bob, Vector2::new(-1.0, 0.0))
                .with_tolerances(1e-6, 1e-6)
                .with_p_factor(p_factor),
        );
        (bodies, joints)
    }

    #[test]
    fn empty_joint_set_is_a_single_no_op_pass() {
        let mut bodies: Arena<BodyId, RigidBody> = Arena::new();
        bodies.insert(RigidBody::default());
        let joints = Arena::new();

        let report = JointSolver::default()
            .correct_positions(&mut bodies, &joints, DT)
            .unwrap();
        assert_eq!(report, CorrectionReport::default());
    }

    #[test]
    fn position_loop_converges_within_the_cap() {
        let (mut bodies, joints) = pendulum(1.0);
        let solver = JointSolver::default();

        let report = solver.correct_positions(&mut bodies, &joints, DT).unwrap();
        assert!(!report.changed);
        assert!(!report.stopped_on_worse);
        assert!(report.iterations > 0 && report.iterations < solver.max_position_iterations);
        assert!(report.error <= 1e-6);
        assert_eq!(
            JointSolver::total_position_error(&bodies, &joints, DT).unwrap(),
            report.error
        );
    }

    #[test]
    fn stop_on_worse_halts_over_relaxation() {
        let (mut bodies, joints) = pendulum(3.0);
        let initial = JointSolver::total_position_error(&bodies, &joints, DT).unwrap();
        let solver = JointSolver::new(30, 30);

        let report = solver.correct_positions(&mut bodies, &joints, DT).unwrap();
        assert!(report.stopped_on_worse);
        assert_eq!(report.iterations, 1);
        // The rejected pass has already been applied to the bodies.
        assert!(report.error < 10.0 * initial);

        let (mut bodies, joints) = pendulum(3.0);
        let unchecked = JointSolver {
            stop_on_worse: false,
            ..solver
        };
        let report = unchecked.correct_positions(&mut bodies, &joints, DT).unwrap();
        assert_eq!(report.iterations, 30);
        assert!(report.error > 1000.0 * initial);
    }

    #[test]
    fn iteration_cap_bounds_the_loop() {
        let (mut bodies, joints) = pendulum(1.5);
        let report = JointSolver::new(3, 3)
            .correct_positions(&mut bodies, &joints, DT)
            .unwrap();
        assert_eq!(report.iterations, 3);
        assert!(report.changed);
        assert!(report.error > 1e-6);
    }

    #[test]
    fn velocity_loop_aligns_anchor_velocities() {
        let (mut bodies, joints) = pendulum(1.0);
        for body in bodies.iter_mut() {
            if body.is_dynamic() {
                body.velocity = Vector2::new(1.0, -2.0);
                body.angular_velocity = 0.5;
            }
        }

        let report = JointSolver::default()
            .correct_velocities(&mut bodies, &joints)
            .unwrap();
        assert!(report.error <= 1e-6);
        assert!(JointSolver::total_velocity_error(&bodies, &joints).unwrap() <= 1e-6);
    }

    #[test]
    fn dangling_joint_is_reported() {
        let (mut bodies, joints) = pendulum(1.0);
        let ids: Vec<BodyId> = bodies.ids().collect();
        bodies.remove(ids[1]);

        assert_eq!(
            JointSolver::default().correct_positions(&mut bodies, &joints, DT),
            Err(PhysicsError::UnknownBody(ids[1]))
        );
    }
}
