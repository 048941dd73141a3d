//! Scene builders shared by the physics benchmarks.

use anyhow::Result;
use glam::Vec2;
use rein2d::{
    Circle, Collider, ContactInfo, ContactManifold, PhysicsConfig, PhysicsWorld, Polygon,
    RigidBody, Transform,
};

/// Small deterministic LCG so scenes are identical between runs.
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Uniform value in `[0, 1)`.
    pub fn next_f32(&mut self) -> f32 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((self.0 >> 40) as f32) / (1u64 << 24) as f32
    }

    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.next_f32()
    }
}

fn ball(position: Vec2, radius: f32) -> Result<(Transform, RigidBody, Collider)> {
    let collider = Collider::new(Circle::new(Vec2::ZERO, radius)?);
    Ok((
        Transform::from_position(position),
        RigidBody::from_collider(&collider),
        collider,
    ))
}

fn polygon_body(position: Vec2, radius: f32, sides: usize) -> Result<(Transform, RigidBody, Collider)> {
    let collider = Collider::new(Polygon::regular(Vec2::ZERO, radius, sides)?);
    Ok((
        Transform::from_position(position),
        RigidBody::from_collider(&collider),
        collider,
    ))
}

/// `n` circles packed densely enough that many overlap.
pub fn setup_circle_world(n: usize) -> Result<hecs::World> {
    let mut world = hecs::World::new();
    let mut rng = Lcg::new(1);
    let side = (n as f32).sqrt() * 1.5;
    for _ in 0..n {
        let p = Vec2::new(rng.range(0.0, side), rng.range(0.0, side));
        world.spawn(ball(p, 0.5)?);
    }
    Ok(world)
}

/// Circles and polygons of varying sizes.
pub fn setup_mixed_world(n: usize) -> Result<hecs::World> {
    let mut world = hecs::World::new();
    let mut rng = Lcg::new(2);
    let side = (n as f32).sqrt() * 1.5;
    for i in 0..n {
        let p = Vec2::new(rng.range(0.0, side), rng.range(0.0, side));
        let size = rng.range(0.3, 0.8);
        if i % 2 == 0 {
            world.spawn(ball(p, size)?);
        } else {
            world.spawn(polygon_body(p, size, 3 + i % 5)?);
        }
    }
    Ok(world)
}

/// Circles spread far apart: almost no overlapping pairs.
pub fn setup_sparse_world(n: usize) -> Result<hecs::World> {
    let mut world = hecs::World::new();
    let mut rng = Lcg::new(3);
    let side = (n as f32).sqrt() * 20.0;
    for _ in 0..n {
        let p = Vec2::new(rng.range(0.0, side), rng.range(0.0, side));
        world.spawn(ball(p, 0.5)?);
    }
    Ok(world)
}

/// `n` approaching body pairs with a ready-made manifold each.
pub fn setup_contacts(n: usize) -> Result<(hecs::World, Vec<ContactManifold>)> {
    let mut world = hecs::World::new();
    let mut manifolds = Vec::with_capacity(n);
    for i in 0..n {
        let x = i as f32 * 3.0;
        let (ta, rba, ca) = ball(Vec2::new(x, 0.0), 0.5)?;
        let (tb, rbb, cb) = ball(Vec2::new(x + 0.9, 0.0), 0.5)?;
        let a = world.spawn((ta, rba.with_velocity(Vec2::new(1.0, 0.0)), ca));
        let b = world.spawn((tb, rbb.with_velocity(Vec2::new(-1.0, 0.0)), cb));
        manifolds.push(ContactManifold::new(
            a,
            b,
            ContactInfo {
                normal: Vec2::X,
                penetration: 0.1,
                points: vec![Vec2::new(x + 0.45, 0.0)],
            },
            0.5,
            0.3,
            false,
        ));
    }
    Ok((world, manifolds))
}

/// A ground box with `n` mixed bodies stacked above it.
pub fn setup_scene(n: usize) -> Result<PhysicsWorld> {
    let mut physics = PhysicsWorld::new(PhysicsConfig::default());
    let width = (n as f32).sqrt() * 2.0 + 4.0;
    physics.spawn((
        Transform::from_position(Vec2::new(0.0, -0.5)),
        RigidBody::new_static(),
        Collider::new(Polygon::rectangle(Vec2::ZERO, Vec2::new(width * 2.0, 1.0))?),
    ));

    let columns = (n as f32).sqrt().ceil().max(1.0) as usize;
    for i in 0..n {
        let p = Vec2::new(
            (i % columns) as f32 * 1.2 - columns as f32 * 0.6,
            1.0 + (i / columns) as f32 * 1.2,
        );
        if i % 3 == 0 {
            physics.spawn(polygon_body(p, 0.5, 4)?);
        } else {
            physics.spawn(ball(p, 0.45)?);
        }
    }
    Ok(physics)
}

/// Ground only, plus `initial` bodies already in flight.
pub fn setup_mass_scene(initial: usize) -> Result<PhysicsWorld> {
    let mut physics = setup_scene(0)?;
    let mut rng = Lcg::new(4);
    for _ in 0..initial {
        let p = Vec2::new(rng.range(-5.0, 5.0), rng.range(2.0, 20.0));
        physics.spawn(ball(p, 0.3)?);
    }
    Ok(physics)
}

/// Spawn `spawn_per_frame` balls per frame for `frames` frames while stepping.
pub fn run_mass_physics(
    physics: &mut PhysicsWorld,
    frames: usize,
    spawn_per_frame: usize,
    seed: u64,
) -> Result<()> {
    let mut rng = Lcg::new(seed + 5);
    for _ in 0..frames {
        for _ in 0..spawn_per_frame {
            let p = Vec2::new(rng.range(-3.0, 3.0), rng.range(8.0, 10.0));
            physics.spawn(ball(p, 0.3)?);
        }
        physics.step(1.0 / 60.0);
    }
    Ok(())
}
