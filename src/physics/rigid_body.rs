//! Rigid body integration functions.

use glam::Vec2;

use crate::ecs::components::physics::{RigidBody, RigidBodyType};
use crate::ecs::components::transform::Transform;

/// Apply gravity force to all movable dynamic bodies.
pub fn apply_gravity(world: &mut hecs::World, gravity: Vec2) {
    for (_, rb) in world.query_mut::<&mut RigidBody>() {
        if !rb.is_static() {
            rb.force_accumulator += gravity * rb.mass * rb.gravity_scale;
        }
    }
}

/// Integrate velocities using semi-implicit Euler: v += (F/m) * dt.
pub fn integrate_velocities(world: &mut hecs::World, dt: f32) {
    for (_, rb) in world.query_mut::<&mut RigidBody>() {
        if rb.is_static() {
            continue;
        }

        rb.velocity += rb.force_accumulator * rb.inverse_mass() * dt;
        // inverse_inertia is zero for fixed-rotation bodies
        rb.angular_velocity += rb.torque_accumulator * rb.inverse_inertia() * dt;
        if rb.fixed_rotation {
            rb.angular_velocity = 0.0;
        }

        // Damping
        rb.velocity *= 1.0 / (1.0 + rb.drag.max(0.0) * dt);
        rb.angular_velocity *= 1.0 / (1.0 + rb.angular_drag.max(0.0) * dt);
    }
}

/// Integrate positions: p += v * dt, rotation += omega * dt.
///
/// Kinematic bodies move by whatever velocity the user gave them.
pub fn integrate_positions(world: &mut hecs::World, dt: f32) {
    for (_, (rb, transform)) in world.query_mut::<(&RigidBody, &mut Transform)>() {
        let moves = match rb.body_type {
            RigidBodyType::Static => false,
            RigidBodyType::Kinematic => true,
            RigidBodyType::Dynamic => !rb.is_static(),
        };
        if !moves {
            continue;
        }

        transform.position += rb.velocity * dt;
        if !rb.fixed_rotation {
            transform.rotation += rb.angular_velocity * dt;
        }
    }
}

/// Clear force and torque accumulators on all rigid bodies.
pub fn clear_forces(world: &mut hecs::World) {
    for (_, rb) in world.query_mut::<&mut RigidBody>() {
        rb.force_accumulator = Vec2::ZERO;
        rb.torque_accumulator = 0.0;
    }
}
