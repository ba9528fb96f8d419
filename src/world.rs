use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{
    config::{JointParams, WorldConfig},
    core::{constraints::BallJoint, rigidbody::RigidBody},
    dynamics::{
        forces::{ForceRegistry, GravityForce},
        integrator::Integrator,
        solver::{CorrectionReport, JointSolver},
    },
    error::{ensure_timestep, PhysicsError, PhysicsResult},
    utils::{
        allocator::{Arena, BodyId, JointId},
        logging::{warn_if_energy_drift_exceeded, ScopedTimer},
        math::Vector2,
    },
};

/// Result of one full [`World::step`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    pub position: CorrectionReport,
    pub velocity: CorrectionReport,
}

/// Central simulation container owning bodies and joints.
///
/// A step runs gravity, position correction, integration, and velocity
/// correction in that order. Bodies and joints live in generational arenas,
/// so a joint can never silently refer to a removed body.
pub struct World {
    pub gravity: Vector2,
    pub solver: JointSolver,
    /// Reserved for contact handling; the joint solver does not read it.
    pub collision_tolerance: f64,
    pub joint_defaults: JointParams,
    pub energy_drift_warning: f64,
    pub force_registry: ForceRegistry,
    bodies: Arena<BodyId, RigidBody>,
    joints: Arena<JointId, BallJoint>,
    integrator: Integrator,
    initial_energy: Option<f64>,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    pub fn new() -> Self {
        Self::with_config(WorldConfig::default())
    }

    pub fn with_config(config: WorldConfig) -> Self {
        Self {
            gravity: config.gravity,
            solver: JointSolver {
                max_position_iterations: config.max_position_iterations,
                max_velocity_iterations: config.max_velocity_iterations,
                stop_on_worse: config.stop_on_worse,
            },
            collision_tolerance: config.collision_tolerance,
            joint_defaults: config.joint_defaults,
            energy_drift_warning: config.energy_drift_warning,
            force_registry: ForceRegistry::new(),
            bodies: Arena::new(),
            joints: Arena::new(),
            integrator: Integrator::new(),
            initial_energy: None,
        }
    }

    /// Replaces the tunable settings. Bodies, joints, and forces are kept.
    pub fn apply_config(&mut self, config: &WorldConfig) {
        self.gravity = config.gravity;
        self.solver = JointSolver {
            max_position_iterations: config.max_position_iterations,
            max_velocity_iterations: config.max_velocity_iterations,
            stop_on_worse: config.stop_on_worse,
        };
        self.collision_tolerance = config.collision_tolerance;
        self.joint_defaults = config.joint_defaults;
        self.energy_drift_warning = config.energy_drift_warning;
    }

    pub fn config(&self) -> WorldConfig {
        WorldConfig {
            gravity: self.gravity,
            max_position_iterations: self.solver.max_position_iterations,
            max_velocity_iterations: self.solver.max_velocity_iterations,
            stop_on_worse: self.solver.stop_on_worse,
            collision_tolerance: self.collision_tolerance,
            joint_defaults: self.joint_defaults,
            energy_drift_warning: self.energy_drift_warning,
        }
    }

    pub fn add_body(&mut self, body: RigidBody) -> BodyId {
        self.bodies.insert(body)
    }

    /// Removes a body that no joint references.
    pub fn remove_body(&mut self, id: BodyId) -> PhysicsResult<RigidBody> {
        let joints = self.joints.iter().filter(|joint| joint.connects(id)).count();
        if joints > 0 {
            return Err(PhysicsError::BodyInUse { body: id, joints });
        }
        let body = self.bodies.remove(id).ok_or(PhysicsError::UnknownBody(id))?;
        self.force_registry.remove_forces_for(id);
        Ok(body)
    }

    /// Removes a body together with every joint attached to it.
    pub fn remove_body_with_joints(
        &mut self,
        id: BodyId,
    ) -> PhysicsResult<(RigidBody, Vec<BallJoint>)> {
        if !self.bodies.contains(id) {
            return Err(PhysicsError::UnknownBody(id));
        }
        let attached: Vec<JointId> = self
            .joints
            .iter_with_ids()
            .filter(|(_, joint)| joint.connects(id))
            .map(|(joint_id, _)| joint_id)
            .collect();
        let removed = attached
            .into_iter()
            .filter_map(|joint_id| self.joints.remove(joint_id))
            .collect();
        let body = self.remove_body(id)?;
        Ok((body, removed))
    }

    /// Adds a joint after checking that it connects two distinct live bodies.
    pub fn add_joint(&mut self, joint: BallJoint) -> PhysicsResult<JointId> {
        for id in [joint.body_a, joint.body_b] {
            if !self.bodies.contains(id) {
                return Err(PhysicsError::UnknownBody(id));
            }
        }
        if joint.body_a == joint.body_b {
            return Err(PhysicsError::InvalidJoint {
                reason: "joint connects a body to itself",
            });
        }
        Ok(self.joints.insert(joint))
    }

    /// Joins two bodies at a shared world point using [`Self::joint_defaults`].
    pub fn add_joint_at(
        &mut self,
        body_a: BodyId,
        body_b: BodyId,
        point: Vector2,
    ) -> PhysicsResult<JointId> {
        let a = self.body(body_a).ok_or(PhysicsError::UnknownBody(body_a))?;
        let b = self.body(body_b).ok_or(PhysicsError::UnknownBody(body_b))?;
        let joint = BallJoint::at_world_point((body_a, a), (body_b, b), point, self.joint_defaults);
        self.add_joint(joint)
    }

    pub fn remove_joint(&mut self, id: JointId) -> PhysicsResult<BallJoint> {
        self.joints.remove(id).ok_or(PhysicsError::UnknownJoint(id))
    }

    pub fn body(&self, id: BodyId) -> Option<&RigidBody> {
        self.bodies.get(id)
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut RigidBody> {
        self.bodies.get_mut(id)
    }

    pub fn joint(&self, id: JointId) -> Option<&BallJoint> {
        self.joints.get(id)
    }

    pub fn joint_mut(&mut self, id: JointId) -> Option<&mut BallJoint> {
        self.joints.get_mut(id)
    }

    /// Bodies in insertion order.
    pub fn bodies(&self) -> impl Iterator<Item = (BodyId, &RigidBody)> + '_ {
        self.bodies.iter_with_ids()
    }

    /// Joints in insertion order, which is also their correction order.
    pub fn joints(&self) -> impl Iterator<Item = (JointId, &BallJoint)> + '_ {
        self.joints.iter_with_ids()
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    /// World positions of both anchors of a joint.
    pub fn joint_anchors(&self, id: JointId) -> PhysicsResult<(Vector2, Vector2)> {
        let joint = self.joints.get(id).ok_or(PhysicsError::UnknownJoint(id))?;
        let (a, b) = self.joint_bodies(joint)?;
        Ok((joint.a_in_world(a), joint.b_in_world(b)))
    }

    /// Predicted anchor separation of a joint after `dt` of free motion.
    pub fn joint_position_error(&self, id: JointId, dt: f64) -> PhysicsResult<f64> {
        let joint = self.joints.get(id).ok_or(PhysicsError::UnknownJoint(id))?;
        let (a, b) = self.joint_bodies(joint)?;
        Ok(joint.position_error(a, b, dt))
    }

    /// Current distance between the two anchors of a joint.
    pub fn joint_separation(&self, id: JointId) -> PhysicsResult<f64> {
        let joint = self.joints.get(id).ok_or(PhysicsError::UnknownJoint(id))?;
        let (a, b) = self.joint_bodies(joint)?;
        Ok(joint.separation(a, b))
    }

    pub fn joint_velocity_error(&self, id: JointId) -> PhysicsResult<f64> {
        let joint = self.joints.get(id).ok_or(PhysicsError::UnknownJoint(id))?;
        let (a, b) = self.joint_bodies(joint)?;
        Ok(joint.velocity_error(a, b))
    }

    /// Advances the simulation by `dt`.
    ///
    /// If any phase fails, every body is restored to its state before the call.
    pub fn step(&mut self, dt: f64) -> PhysicsResult<StepReport> {
        ensure_timestep(dt)?;
        if self.initial_energy.is_none() {
            self.initial_energy = Some(self.calc_energy());
        }

        let report = self.atomically(|world| {
            world.apply_gravity(dt);
            let position = world.joint_position_correction(dt)?;
            world.integrate(dt);
            let velocity = world.joint_velocity_correction()?;
            Ok(StepReport { position, velocity })
        })?;
        debug!(
            "step dt={dt}: {} position / {} velocity iteration(s)",
            report.position.iterations, report.velocity.iterations
        );

        if let Some(drift) = self.energy_drift() {
            warn_if_energy_drift_exceeded(drift, self.energy_drift_warning);
        }
        Ok(report)
    }

    /// Gravity and position correction.
    pub fn step_a(&mut self, dt: f64) -> PhysicsResult<CorrectionReport> {
        ensure_timestep(dt)?;
        self.atomically(|world| {
            world.apply_gravity(dt);
            world.joint_position_correction(dt)
        })
    }

    /// Integration.
    pub fn step_b(&mut self, dt: f64) -> PhysicsResult<()> {
        ensure_timestep(dt)?;
        self.integrate(dt);
        Ok(())
    }

    /// Velocity correction.
    pub fn step_c(&mut self) -> PhysicsResult<CorrectionReport> {
        self.atomically(|world| world.joint_velocity_correction())
    }

    /// Sets every dynamic body's force to `gravity * mass`, then adds registered forces.
    pub fn apply_gravity(&mut self, dt: f64) {
        let gravity = GravityForce::new(self.gravity);
        for body in self.bodies.iter_mut() {
            gravity.reset(body);
        }
        self.force_registry.apply_all(&mut self.bodies, dt);
    }

    pub fn joint_position_correction(&mut self, dt: f64) -> PhysicsResult<CorrectionReport> {
        let _timer = ScopedTimer::new("joints::position");
        self.solver
            .correct_positions(&mut self.bodies, &self.joints, dt)
    }

    pub fn integrate(&mut self, dt: f64) {
        let _timer = ScopedTimer::new("integrator");
        self.integrator.step(&mut self.bodies, dt);
    }

    pub fn joint_velocity_correction(&mut self) -> PhysicsResult<CorrectionReport> {
        let _timer = ScopedTimer::new("joints::velocity");
        self.solver.correct_velocities(&mut self.bodies, &self.joints)
    }

    /// Zeroes linear and angular velocity of every dynamic body.
    pub fn stop_movement(&mut self) {
        for body in self.bodies.iter_mut() {
            if body.is_dynamic() {
                body.velocity = Vector2::ZERO;
                body.angular_velocity = 0.0;
            }
        }
    }

    /// Total kinetic plus potential energy of all bodies.
    pub fn calc_energy(&self) -> f64 {
        self.bodies.iter().map(|body| body.energy(self.gravity)).sum()
    }

    /// Energy recorded before the first step, if any step has run.
    pub fn initial_energy(&self) -> Option<f64> {
        self.initial_energy
    }

    pub fn energy_drift(&self) -> Option<f64> {
        self.initial_energy
            .map(|initial| self.calc_energy() - initial)
    }

    /// Forgets the recorded baseline; the next step records a new one.
    pub fn reset_energy_baseline(&mut self) {
        self.initial_energy = None;
    }

    fn joint_bodies(&self, joint: &BallJoint) -> PhysicsResult<(&RigidBody, &RigidBody)> {
        let a = self
            .bodies
            .get(joint.body_a)
            .ok_or(PhysicsError::UnknownBody(joint.body_a))?;
        let b = self
            .bodies
            .get(joint.body_b)
            .ok_or(PhysicsError::UnknownBody(joint.body_b))?;
        Ok((a, b))
    }

    fn atomically<R>(
        &mut self,
        phase: impl FnOnce(&mut Self) -> PhysicsResult<R>,
    ) -> PhysicsResult<R> {
        let snapshot = self.bodies.clone();
        match phase(self) {
            Ok(result) => Ok(result),
            Err(err) => {
                warn!("step failed, body state rolled back: {err}");
                self.bodies = snapshot;
                Err(err)
            }
        }
    }
}
