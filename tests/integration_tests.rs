use approx::assert_abs_diff_eq;
use impulse2d::{
    DragForce, MassProperties, PhysicsError, RigidBody, SpringForce, Vector2, World, WorldConfig,
};

#[test]
fn bodies_fall_under_gravity() {
    let mut world = World::new();
    let start = Vector2::new(2.0, -1.0);
    let v0 = Vector2::new(3.0, -4.0);
    let body = world.add_body(
        RigidBody::new(start, MassProperties::new(2.5, 1.0).unwrap())
            .with_velocity(v0)
            .with_angular_velocity(0.5),
    );

    let dt = 0.02;
    for _ in 0..100 {
        world.step(dt).unwrap();
    }

    // Constant acceleration is integrated exactly, whatever the step size.
    let t = 2.0;
    let expected = start + v0 * t + 0.5 * world.gravity * t * t;
    let state = world.body(body).unwrap();
    assert_abs_diff_eq!(state.position.x, expected.x, epsilon = 1e-9);
    assert_abs_diff_eq!(state.position.y, expected.y, epsilon = 1e-9);
    assert_abs_diff_eq!(state.velocity.y, v0.y + world.gravity.y * t, epsilon = 1e-9);
    assert_abs_diff_eq!(state.rotation, 1.0, epsilon = 1e-9);
}

#[test]
fn free_fall_conserves_energy() {
    let mut world = World::new();
    world.add_body(RigidBody::default().with_velocity(Vector2::new(1.0, -5.0)));
    world.add_body(
        RigidBody::new(Vector2::new(4.0, 0.0), MassProperties::disc(3.0, 0.5).unwrap())
            .with_angular_velocity(-2.0),
    );

    for _ in 0..250 {
        world.step(0.01).unwrap();
    }
    assert_abs_diff_eq!(world.energy_drift().unwrap(), 0.0, epsilon = 1e-8);
}

#[test]
fn static_bodies_never_move() {
    let mut world = World::new();
    let anchor = RigidBody::new(Vector2::new(0.0, -3.0), MassProperties::default())
        .with_velocity(Vector2::new(1.0, 0.0))
        .into_static();
    let id = world.add_body(anchor.clone());
    world.force_registry.add_force(DragForce { drag_coefficient: 0.3 });

    for _ in 0..20 {
        world.step(0.05).unwrap();
    }
    assert_eq!(world.body(id).unwrap(), &anchor);
}

#[test]
fn joint_at_world_point_starts_satisfied() {
    let mut world = World::new();
    let a = world.add_body(
        RigidBody::new(Vector2::new(-0.5, 0.0), MassProperties::rod(1.0, 1.0).unwrap())
            .with_rotation(0.4),
    );
    let b = world.add_body(
        RigidBody::new(Vector2::new(0.6, 0.3), MassProperties::rod(1.0, 1.2).unwrap())
            .with_rotation(-1.1),
    );
    let joint = world.add_joint_at(a, b, Vector2::new(0.05, 0.1)).unwrap();

    assert_abs_diff_eq!(world.joint_separation(joint).unwrap(), 0.0, epsilon = 1e-12);
    assert_eq!(world.joint(joint).unwrap().params(), world.joint_defaults);
}

#[test]
fn bodies_and_joints_can_be_removed() {
    let mut world = World::new();
    let a = world.add_body(RigidBody::default());
    let b = world.add_body(RigidBody::new(Vector2::new(1.0, 0.0), MassProperties::default()));
    let c = world.add_body(RigidBody::new(Vector2::new(2.0, 0.0), MassProperties::default()));
    world.add_joint_at(a, b, Vector2::new(0.5, 0.0)).unwrap();
    let bc = world.add_joint_at(b, c, Vector2::new(1.5, 0.0)).unwrap();

    assert_eq!(
        world.remove_body(b),
        Err(PhysicsError::BodyInUse { body: b, joints: 2 })
    );

    world.remove_joint(bc).unwrap();
    assert_eq!(world.remove_joint(bc), Err(PhysicsError::UnknownJoint(bc)));
    world.remove_body(c).unwrap();

    let (_, joints) = world.remove_body_with_joints(b).unwrap();
    assert_eq!(joints.len(), 1);
    assert_eq!(world.body_count(), 1);
    assert_eq!(world.joint_count(), 0);

    // Stale handles stay invalid after their slot is reused.
    let d = world.add_body(RigidBody::default());
    assert!(world.body(b).is_none());
    assert!(world.body(d).is_some());
    world.step(0.01).unwrap();
}

#[test]
fn spring_holds_body_against_gravity() {
    let mut world = World::new();
    let body = world.add_body(RigidBody::new(Vector2::new(0.0, 1.0), MassProperties::default()));
    world.force_registry.add_force_to(
        body,
        SpringForce {
            anchor: Vector2::ZERO,
            local_point: Vector2::ZERO,
            rest_length: 0.0,
            spring_constant: 10.0,
            damping: 0.0,
        },
    );

    // k * 1 cancels m * g exactly at the starting point.
    world.step(0.01).unwrap();
    let state = world.body(body).unwrap();
    assert_abs_diff_eq!(state.position.y, 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(state.velocity.y, 0.0, epsilon = 1e-12);
}

#[test]
fn world_loads_config_from_json() {
    let config: WorldConfig = serde_json::from_str(
        r#"{ "gravity": [0.0, -9.81], "max_velocity_iterations": 4, "stop_on_worse": false }"#,
    )
    .unwrap();
    let mut world = World::with_config(config);

    assert_eq!(world.gravity, Vector2::new(0.0, -9.81));
    assert_eq!(world.solver.max_velocity_iterations, 4);
    assert!(!world.solver.stop_on_worse);
    assert_eq!(world.config(), config);

    world.apply_config(&WorldConfig::default());
    assert_eq!(world.config(), WorldConfig::default());
}
