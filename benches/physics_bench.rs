use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use impulse2d::*;
use std::hint::black_box;

const DT: f64 = 1.0 / 100.0;

fn prepare_chain(links: usize) -> World {
    let mut world = World::new();
    let mut previous = world.add_body(RigidBody::default().into_static());
    let mut previous_anchor = Vector2::ZERO;
    let props = MassProperties::rod(1.0, 1.0).unwrap();
    for i in 0..links {
        let body = world.add_body(RigidBody::new(Vector2::new(i as f64 + 0.5, 0.0), props));
        world
            .add_joint(
                BallJoint::new(previous, previous_anchor, body, Vector2::new(-0.5, 0.0))
                    .with_tolerances(1e-6, 1e-6),
            )
            .unwrap();
        previous = body;
        previous_anchor = Vector2::new(0.5, 0.0);
    }
    world
}

fn bench_chain_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain_step");
    for &links in &[4usize, 16, 64] {
        group.bench_with_input(BenchmarkId::new("full_step", links), &links, |b, &links| {
            let mut world = prepare_chain(links);
            b.iter(|| world.step(black_box(DT)).unwrap())
        });
        group.bench_with_input(
            BenchmarkId::new("position_pass", links),
            &links,
            |b, &links| {
                b.iter(|| {
                    let mut world = prepare_chain(links);
                    world.step_a(black_box(DT)).unwrap()
                })
            },
        );
    }
    group.finish();
}

fn bench_free_bodies(c: &mut Criterion) {
    let mut group = c.benchmark_group("free_bodies");
    for &count in &[128usize, 512, 2048] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let mut world = World::new();
            for i in 0..count {
                world.add_body(
                    RigidBody::new(Vector2::new(i as f64 * 0.1, 0.0), MassProperties::default())
                        .with_angular_velocity(1.0),
                );
            }
            b.iter(|| world.step(black_box(DT)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_chain_step, bench_free_bodies);
criterion_main!(benches);
