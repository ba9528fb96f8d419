//! Chain of sticks hanging from a fixed stick, connected by ball joints.
//!
//! Run with `cargo run --example joint_chain -- [links] [seconds]`.

use impulse2d::*;
use std::f64::consts::FRAC_PI_2;

const LENGTH: f64 = 1.0;
const MASS: f64 = 1.0;
const TIMESTEP: f64 = 1.0 / 100.0;

fn main() -> PhysicsResult<()> {
    let mut args = std::env::args().skip(1);
    let links: usize = args.next().and_then(|arg| arg.parse().ok()).unwrap_or(30);
    let seconds: f64 = args.next().and_then(|arg| arg.parse().ok()).unwrap_or(5.0);

    let mut world = World::new();
    let props = MassProperties::new(MASS, MASS * LENGTH / 3.0)?;

    let mut previous = world.add_body(RigidBody::new(Vector2::new(0.0, LENGTH), props).into_static());
    for i in 0..links {
        let stick = world.add_body(
            RigidBody::new(Vector2::new((i as f64 + 0.5) * LENGTH, 1.5 * LENGTH), props)
                .with_rotation(-FRAC_PI_2),
        );
        world.add_joint(BallJoint::new(
            previous,
            Vector2::new(0.0, LENGTH / 2.0),
            stick,
            Vector2::new(0.0, -LENGTH / 2.0),
        ))?;
        previous = stick;
    }

    let steps = (seconds / TIMESTEP).round() as usize;
    for step in 1..=steps {
        let report = world.step(TIMESTEP)?;
        if step % 100 == 0 {
            let worst = world
                .joints()
                .map(|(id, _)| world.joint_separation(id))
                .collect::<PhysicsResult<Vec<_>>>()?
                .into_iter()
                .fold(0.0, f64::max);
            println!(
                "t={:5.2}s energy drift {:+.4} worst gap {:.2e} passes {}/{}",
                step as f64 * TIMESTEP,
                world.energy_drift().unwrap_or(0.0),
                worst,
                report.position.iterations,
                report.velocity.iterations,
            );
        }
    }

    if let Some((_, tail)) = world.bodies().last() {
        println!("chain end at {:?}", tail.position);
    }
    Ok(())
}
