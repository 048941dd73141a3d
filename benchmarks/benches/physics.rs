//! Physics engine benchmarks (criterion - wall-clock time).
//!
//! Run all:    cargo bench --manifest-path benchmarks/Cargo.toml --bench physics
//! Filter:     cargo bench --manifest-path benchmarks/Cargo.toml --bench physics -- broadphase

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec2;
use rein2d::physics::broadphase::SpatialHashGrid;
use rein2d::physics::narrowphase::{circle_circle, circle_polygon, detect_collision, polygon_polygon};
use rein2d::physics::solver::solve_contacts;
use rein2d::{Circle, Polygon, Shape, Transform};
use rein2d_bench::*;

// ---------------------------------------------------------------------------
// Broadphase
// ---------------------------------------------------------------------------

fn bench_broadphase(c: &mut Criterion) {
    let scenes: [(&str, fn(usize) -> anyhow::Result<hecs::World>); 3] = [
        ("broadphase/uniform_circles", setup_circle_world),
        ("broadphase/mixed_shapes", setup_mixed_world),
        ("broadphase/sparse", setup_sparse_world),
    ];

    for (name, setup) in scenes {
        let mut group = c.benchmark_group(name);
        for &n in &[100, 500, 1000, 2000] {
            let world = setup(n).expect("broadphase scene");
            let mut broadphase = SpatialHashGrid::new();
            group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
                b.iter(|| broadphase.find_pairs(&world));
            });
        }
        group.finish();
    }
}

// ---------------------------------------------------------------------------
// Narrowphase
// ---------------------------------------------------------------------------

fn bench_narrowphase(c: &mut Criterion) {
    let circle_a = Circle::new(Vec2::ZERO, 1.0).expect("circle");
    let box_a = Polygon::rectangle(Vec2::ZERO, Vec2::splat(2.0)).expect("box");

    {
        let mut group = c.benchmark_group("narrowphase/circle_circle");
        let hit = Circle::new(Vec2::new(1.5, 0.0), 1.0).expect("circle");
        group.bench_function("intersecting", |b| {
            b.iter(|| circle_circle(&circle_a, &hit));
        });

        let miss = Circle::new(Vec2::new(5.0, 0.0), 1.0).expect("circle");
        group.bench_function("separated", |b| {
            b.iter(|| circle_circle(&circle_a, &miss));
        });
        group.finish();
    }

    {
        let mut group = c.benchmark_group("narrowphase/box_box");
        let hit = box_a.transformed(&Transform::from_position(Vec2::new(1.5, 0.0)));
        group.bench_function("intersecting", |b| {
            b.iter(|| polygon_polygon(&box_a, &hit));
        });

        let miss = box_a.transformed(&Transform::from_position(Vec2::new(5.0, 0.0)));
        group.bench_function("separated", |b| {
            b.iter(|| polygon_polygon(&box_a, &miss));
        });

        let rotated =
            box_a.transformed(&Transform::from_position(Vec2::new(1.5, 0.0)).with_rotation(0.785));
        group.bench_function("rotated", |b| {
            b.iter(|| polygon_polygon(&box_a, &rotated));
        });
        group.finish();
    }

    {
        let mut group = c.benchmark_group("narrowphase/circle_box");
        let hit = Circle::new(Vec2::new(1.5, 0.0), 1.0).expect("circle");
        group.bench_function("intersecting", |b| {
            b.iter(|| circle_polygon(&hit, &box_a));
        });

        let miss = Circle::new(Vec2::new(5.0, 0.0), 1.0).expect("circle");
        group.bench_function("separated", |b| {
            b.iter(|| circle_polygon(&miss, &box_a));
        });
        group.finish();
    }

    {
        let mut group = c.benchmark_group("narrowphase/dispatch");
        let circle = Shape::from(circle_a);
        let circle_b = Shape::from(Circle::new(Vec2::new(1.5, 0.0), 1.0).expect("circle"));
        let bbox = Shape::from(box_a.clone());
        let bbox_b = Shape::from(box_a.transformed(&Transform::from_position(Vec2::new(1.5, 0.0))));
        let octagon = Shape::from(Polygon::regular(Vec2::new(1.5, 0.0), 1.0, 8).expect("octagon"));

        group.bench_function("circle_circle", |b| {
            b.iter(|| detect_collision(&circle, &circle_b));
        });
        group.bench_function("box_box", |b| {
            b.iter(|| detect_collision(&bbox, &bbox_b));
        });
        group.bench_function("box_circle", |b| {
            b.iter(|| detect_collision(&bbox, &circle_b));
        });
        group.bench_function("box_octagon", |b| {
            b.iter(|| detect_collision(&bbox, &octagon));
        });
        group.finish();
    }

    {
        let mut group = c.benchmark_group("narrowphase/batch");
        for &n in &[100, 500, 1000] {
            let pairs: Vec<(Shape, Shape)> = (0..n)
                .map(|i| {
                    let x = (i as f32) * 3.0;
                    let offset = Transform::from_position(Vec2::new(x, 0.0));
                    let a = Shape::from(box_a.transformed(&offset));
                    let b = Shape::from(Circle::new(Vec2::new(x + 1.5, 0.0), 1.0).expect("circle"));
                    (a, b)
                })
                .collect();

            group.bench_with_input(BenchmarkId::from_parameter(n), &pairs, |b, pairs| {
                b.iter(|| {
                    for (sa, sb) in pairs {
                        let _ = detect_collision(sa, sb);
                    }
                });
            });
        }
        group.finish();
    }
}

// ---------------------------------------------------------------------------
// Solver
// ---------------------------------------------------------------------------

fn bench_solver(c: &mut Criterion) {
    {
        let mut group = c.benchmark_group("solver/contact_count");
        for &n in &[10, 50, 100, 500] {
            let (mut world, manifolds) = setup_contacts(n).expect("contacts");
            group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
                b.iter_batched(
                    || manifolds.clone(),
                    |mut m| solve_contacts(&mut m, &mut world, 8),
                    criterion::BatchSize::SmallInput,
                );
            });
        }
        group.finish();
    }

    {
        let mut group = c.benchmark_group("solver/iterations");
        let (mut world, manifolds) = setup_contacts(100).expect("contacts");
        for &iters in &[1, 4, 8, 16, 32] {
            group.bench_with_input(BenchmarkId::from_parameter(iters), &iters, |b, &iters| {
                b.iter_batched(
                    || manifolds.clone(),
                    |mut m| solve_contacts(&mut m, &mut world, iters),
                    criterion::BatchSize::SmallInput,
                );
            });
        }
        group.finish();
    }
}

// ---------------------------------------------------------------------------
// Full pipeline
// ---------------------------------------------------------------------------

fn bench_pipeline(c: &mut Criterion) {
    {
        let mut group = c.benchmark_group("pipeline/step");
        group.sample_size(30);
        for &n in &[50, 100, 500, 1000] {
            group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
                b.iter_batched(
                    || setup_scene(n).expect("scene"),
                    |mut physics| {
                        physics.step(1.0 / 60.0);
                    },
                    criterion::BatchSize::LargeInput,
                );
            });
        }
        group.finish();
    }

    {
        let mut group = c.benchmark_group("pipeline/sustained_10steps");
        group.sample_size(20);
        for &n in &[100, 500] {
            group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
                b.iter_batched(
                    || setup_scene(n).expect("scene"),
                    |mut physics| {
                        for _ in 0..10 {
                            physics.step(1.0 / 60.0);
                        }
                    },
                    criterion::BatchSize::LargeInput,
                );
            });
        }
        group.finish();
    }

    {
        let mut group = c.benchmark_group("pipeline/stages");
        let n = 500;
        let physics = setup_scene(n).expect("scene");

        let mut broadphase = SpatialHashGrid::new();
        group.bench_function("broadphase_500", |b| {
            b.iter(|| broadphase.find_pairs(physics.world()));
        });

        group.bench_function("integrate_500", |b| {
            b.iter_batched(
                || setup_scene(n).expect("scene"),
                |mut physics| {
                    let w = physics.world_mut();
                    rein2d::physics::rigid_body::apply_gravity(w, Vec2::new(0.0, -9.81));
                    rein2d::physics::rigid_body::integrate_velocities(w, 1.0 / 60.0);
                    rein2d::physics::rigid_body::integrate_positions(w, 1.0 / 60.0);
                },
                criterion::BatchSize::LargeInput,
            );
        });
        group.finish();
    }
}

// ---------------------------------------------------------------------------
// Mass physics (continuous spawn + step)
// ---------------------------------------------------------------------------

fn bench_mass_physics(c: &mut Criterion) {
    {
        let mut group = c.benchmark_group("mass_physics/spawn_rate");
        group.sample_size(10);
        for &spawn_per_frame in &[1, 3, 10] {
            group.bench_with_input(
                BenchmarkId::from_parameter(spawn_per_frame),
                &spawn_per_frame,
                |b, &spf| {
                    b.iter_batched(
                        || setup_mass_scene(0).expect("scene"),
                        |mut physics| run_mass_physics(&mut physics, 60, spf, 0),
                        criterion::BatchSize::LargeInput,
                    );
                },
            );
        }
        group.finish();
    }

    {
        let mut group = c.benchmark_group("mass_physics/initial_bodies");
        group.sample_size(10);
        for &initial in &[0, 100, 500] {
            group.bench_with_input(BenchmarkId::from_parameter(initial), &initial, |b, &init| {
                b.iter_batched(
                    || setup_mass_scene(init).expect("scene"),
                    |mut physics| run_mass_physics(&mut physics, 60, 3, init as u64),
                    criterion::BatchSize::LargeInput,
                );
            });
        }
        group.finish();
    }
}

criterion_group!(
    benches,
    bench_broadphase,
    bench_narrowphase,
    bench_solver,
    bench_pipeline,
    bench_mass_physics
);
criterion_main!(benches);
