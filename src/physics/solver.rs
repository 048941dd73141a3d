//! Impulse-based contact resolver with Coulomb friction and positional
//! correction.

use glam::Vec2;

use crate::ecs::components::physics::RigidBody;
use crate::ecs::components::transform::Transform;
use crate::math::{cross_scalar, Vec2Ext, EPSILON};

use super::contact::ContactManifold;

/// Solve contact constraints, `iterations` passes over all manifolds in order.
///
/// Every point of a manifold gets `1 / point_count` of the impulse computed
/// from the velocities at the start of that manifold's pass.
pub fn solve_contacts(manifolds: &mut [ContactManifold], world: &mut hecs::World, iterations: u32) {
    for _ in 0..iterations {
        for manifold in manifolds.iter_mut() {
            solve_manifold(manifold, world);
        }
    }
}

fn solve_manifold(manifold: &mut ContactManifold, world: &mut hecs::World) {
    if manifold.is_trigger || manifold.contacts.is_empty() {
        return;
    }

    let (mut a, mut b) = match (
        BodyState::load(world, manifold.entity_a),
        BodyState::load(world, manifold.entity_b),
    ) {
        (Some(a), Some(b)) => (a, b),
        _ => return,
    };

    // Skip if both are static/kinematic
    if a.inv_mass == 0.0 && b.inv_mass == 0.0 {
        return;
    }

    let normal = manifold.normal;
    let share = 1.0 / manifold.contacts.len() as f32;

    // Normal impulses, all from the same velocity snapshot
    let snapshot = (a, b);
    let mut normal_impulses = Vec::with_capacity(manifold.contacts.len());
    for contact in &manifold.contacts {
        let (sa, sb) = &snapshot;
        let r_a = contact.position - sa.position;
        let r_b = contact.position - sb.position;

        let contact_velocity = relative_velocity(sa, sb, r_a, r_b).dot(normal);
        if contact_velocity >= 0.0 {
            normal_impulses.push(0.0);
            continue;
        }

        let inv_mass_sum = effective_inverse_mass(sa, sb, r_a, r_b, normal);
        if inv_mass_sum <= EPSILON {
            normal_impulses.push(0.0);
            continue;
        }

        let j = -(1.0 + manifold.restitution) * contact_velocity / inv_mass_sum * share;
        normal_impulses.push(j);
    }

    for (contact, &j) in manifold.contacts.iter_mut().zip(&normal_impulses) {
        if j == 0.0 {
            continue;
        }
        let r_a = contact.position - a.position;
        let r_b = contact.position - b.position;
        let impulse = normal * j;
        a.apply_impulse(-impulse, r_a);
        b.apply_impulse(impulse, r_b);
        contact.normal_impulse += j;
    }

    // Friction, clamped by the normal impulse of the same point
    let snapshot = (a, b);
    for (contact, &j) in manifold.contacts.iter_mut().zip(&normal_impulses) {
        if j == 0.0 {
            continue;
        }
        let (sa, sb) = &snapshot;
        let r_a = contact.position - sa.position;
        let r_b = contact.position - sb.position;

        let rel_vel = relative_velocity(sa, sb, r_a, r_b);
        let tangent = (rel_vel - normal * rel_vel.dot(normal)).unit();
        if tangent == Vec2::ZERO {
            continue;
        }

        let inv_mass_t = effective_inverse_mass(sa, sb, r_a, r_b, tangent);
        if inv_mass_t <= EPSILON {
            continue;
        }

        let max_friction = manifold.friction * j;
        let j_t = (-rel_vel.dot(tangent) / inv_mass_t * share).clamp(-max_friction, max_friction);

        let impulse = tangent * j_t;
        a.apply_impulse(-impulse, r_a);
        b.apply_impulse(impulse, r_b);
        contact.tangent_impulse += j_t;
    }

    a.store(world, manifold.entity_a);
    b.store(world, manifold.entity_b);
}

/// Push overlapping bodies apart along the contact normal.
///
/// Only penetration beyond `slop` is corrected, scaled by `percent`, and split
/// between the bodies by inverse mass. Static bodies never move.
pub fn correct_positions(
    manifolds: &[ContactManifold],
    world: &mut hecs::World,
    percent: f32,
    slop: f32,
) {
    for manifold in manifolds {
        if manifold.is_trigger {
            continue;
        }

        let (a, b) = match (
            BodyState::load(world, manifold.entity_a),
            BodyState::load(world, manifold.entity_b),
        ) {
            (Some(a), Some(b)) => (a, b),
            _ => continue,
        };

        let inv_mass_sum = a.inv_mass + b.inv_mass;
        if inv_mass_sum <= 0.0 {
            continue;
        }

        let depth = (manifold.penetration() - slop).max(0.0);
        if depth == 0.0 {
            continue;
        }

        let correction = manifold.normal * (depth / inv_mass_sum * percent);
        if a.inv_mass > 0.0 {
            if let Ok(mut transform) = world.get::<&mut Transform>(manifold.entity_a) {
                transform.position -= correction * a.inv_mass;
            }
        }
        if b.inv_mass > 0.0 {
            if let Ok(mut transform) = world.get::<&mut Transform>(manifold.entity_b) {
                transform.position += correction * b.inv_mass;
            }
        }
    }
}

/// Per-pair copy of the body data the solver reads and writes.
///
/// A collider without a `RigidBody` loads as an immovable body at rest.
#[derive(Debug, Clone, Copy)]
struct BodyState {
    inv_mass: f32,
    inv_inertia: f32,
    velocity: Vec2,
    angular_velocity: f32,
    position: Vec2,
    movable: bool,
}

impl BodyState {
    fn load(world: &hecs::World, entity: hecs::Entity) -> Option<Self> {
        let position = world.get::<&Transform>(entity).ok()?.position;
        let state = match world.get::<&RigidBody>(entity) {
            Ok(rb) => Self {
                inv_mass: rb.inverse_mass(),
                inv_inertia: rb.inverse_inertia(),
                velocity: rb.velocity,
                angular_velocity: rb.angular_velocity,
                position,
                movable: !rb.is_static(),
            },
            Err(_) => Self {
                inv_mass: 0.0,
                inv_inertia: 0.0,
                velocity: Vec2::ZERO,
                angular_velocity: 0.0,
                position,
                movable: false,
            },
        };
        Some(state)
    }

    #[inline]
    fn apply_impulse(&mut self, impulse: Vec2, r: Vec2) {
        self.velocity += impulse * self.inv_mass;
        self.angular_velocity += r.cross(impulse) * self.inv_inertia;
    }

    fn store(&self, world: &mut hecs::World, entity: hecs::Entity) {
        if !self.movable {
            return;
        }
        if let Ok(mut rb) = world.get::<&mut RigidBody>(entity) {
            rb.velocity = self.velocity;
            rb.angular_velocity = self.angular_velocity;
        }
    }
}

/// Velocity of B's contact point relative to A's.
#[inline]
fn relative_velocity(a: &BodyState, b: &BodyState, r_a: Vec2, r_b: Vec2) -> Vec2 {
    let vel_a = a.velocity + cross_scalar(a.angular_velocity, r_a);
    let vel_b = b.velocity + cross_scalar(b.angular_velocity, r_b);
    vel_b - vel_a
}

#[inline]
fn effective_inverse_mass(a: &BodyState, b: &BodyState, r_a: Vec2, r_b: Vec2, dir: Vec2) -> f32 {
    let ra_cross = r_a.cross(dir);
    let rb_cross = r_b.cross(dir);
    a.inv_mass + b.inv_mass + ra_cross * ra_cross * a.inv_inertia + rb_cross * rb_cross * b.inv_inertia
}
