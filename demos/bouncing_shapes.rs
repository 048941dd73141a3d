//! Drops a handful of circles and polygons into a walled pit, and logs every
//! collision and trigger event.
//!
//! Run with: RUST_LOG=debug cargo run --example bouncing_shapes

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use rein2d::glam::Vec2;
use rein2d::{
    Circle, Collider, CollisionPhase, PhysicsConfig, PhysicsMaterial, PhysicsWorld, Polygon,
    RigidBody, Transform,
};
use tracing_subscriber::EnvFilter;

fn static_box(physics: &mut PhysicsWorld, center: Vec2, size: Vec2) -> Result<()> {
    physics.spawn((
        Transform::from_position(center),
        RigidBody::new_static(),
        Collider::new(Polygon::rectangle(Vec2::ZERO, size)?),
    ));
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let mut physics = PhysicsWorld::new(PhysicsConfig::default());

    // Pit: floor and two walls
    static_box(&mut physics, Vec2::new(0.0, -0.5), Vec2::new(20.0, 1.0))?;
    static_box(&mut physics, Vec2::new(-10.5, 5.0), Vec2::new(1.0, 12.0))?;
    static_box(&mut physics, Vec2::new(10.5, 5.0), Vec2::new(1.0, 12.0))?;

    let rubber = PhysicsMaterial::new(0.8, 0.7, 1.2)?;
    let ice = PhysicsMaterial::new(0.05, 0.1, 0.9)?;

    let mut bodies = Vec::new();
    for i in 0..8 {
        let x = -7.0 + 2.0 * i as f32;
        let y = 4.0 + (i % 3) as f32 * 1.5;
        let collider = if i % 2 == 0 {
            Collider::new(Circle::new(Vec2::ZERO, 0.5)?).with_material(rubber)
        } else {
            Collider::new(Polygon::regular(Vec2::ZERO, 0.6, 3 + i % 4)?).with_material(ice)
        };
        let body = RigidBody::from_collider(&collider).with_velocity(Vec2::new(1.5 - 0.4 * i as f32, 0.0));
        bodies.push(physics.spawn((
            Transform::from_position(Vec2::new(x, y)).with_rotation(0.3 * i as f32),
            body,
            collider,
        )));
    }

    // Pickup zone: the first body to reach it is removed
    let pickups = Arc::new(AtomicUsize::new(0));
    let zone = physics.spawn((
        Transform::from_position(Vec2::new(0.0, 1.0)),
        Collider::trigger(Polygon::rectangle(Vec2::ZERO, Vec2::new(2.0, 1.0))?),
    ));
    let counter = Arc::clone(&pickups);
    physics.add_collision_callback(zone, move |collision, commands| {
        if collision.phase == CollisionPhase::Enter && counter.fetch_add(1, Ordering::Relaxed) == 0 {
            tracing::info!(entity = ?collision.other, "picked up");
            commands.despawn(collision.other);
        }
    });

    // Five seconds of simulated time at a ragged frame rate
    let frame_times = [1.0 / 60.0, 1.0 / 45.0, 1.0 / 120.0, 1.0 / 30.0];
    let mut elapsed = 0.0;
    let mut frame = 0;
    while elapsed < 5.0 {
        let dt = frame_times[frame % frame_times.len()];
        physics.step(dt);
        elapsed += dt;
        frame += 1;

        for event in physics.drain_events() {
            if event.phase != CollisionPhase::Stay {
                tracing::debug!(
                    a = ?event.entity_a,
                    b = ?event.entity_b,
                    phase = ?event.phase,
                    trigger = event.is_trigger,
                    "collision event"
                );
            }
        }
    }

    for entity in bodies {
        match physics.world().get::<&Transform>(entity) {
            Ok(transform) => tracing::info!(
                ?entity,
                x = transform.position.x,
                y = transform.position.y,
                "resting"
            ),
            Err(_) => tracing::info!(?entity, "removed"),
        }
    }
    tracing::info!(
        ticks = physics.tick_count(),
        pickups = pickups.load(Ordering::Relaxed),
        "done"
    );

    Ok(())
}
