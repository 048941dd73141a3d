//! Contact data structures for collision response.
//!
//! Contacts live for a single tick: they are rebuilt by the narrowphase and
//! consumed by the solver, never carried into the next step.

use glam::Vec2;

/// Narrowphase result for one shape pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactInfo {
    /// Unit contact normal (from shape A to shape B).
    pub normal: Vec2,
    /// Penetration depth, never negative.
    pub penetration: f32,
    /// One or two world-space contact points.
    pub points: Vec<Vec2>,
}

impl ContactInfo {
    /// The same contact seen from the other shape.
    pub fn flipped(mut self) -> Self {
        self.normal = -self.normal;
        self
    }
}

/// A single contact point with accumulated impulse data.
#[derive(Debug, Clone, Copy)]
pub struct ContactPoint {
    /// Contact position in world space.
    pub position: Vec2,
    /// Penetration depth.
    pub penetration: f32,
    /// Accumulated normal impulse.
    pub normal_impulse: f32,
    /// Accumulated friction impulse.
    pub tangent_impulse: f32,
}

/// Contact points between two entities, plus the combined material response.
#[derive(Debug, Clone)]
pub struct ContactManifold {
    pub entity_a: hecs::Entity,
    pub entity_b: hecs::Entity,
    /// Contact normal (from A to B).
    pub normal: Vec2,
    pub contacts: Vec<ContactPoint>,
    /// Combined restitution of both materials.
    pub restitution: f32,
    /// Combined friction of both materials.
    pub friction: f32,
    /// Either collider is a trigger: report overlap, never resolve.
    pub is_trigger: bool,
}

impl ContactManifold {
    /// Build a manifold from a narrowphase result.
    pub fn new(
        entity_a: hecs::Entity,
        entity_b: hecs::Entity,
        info: ContactInfo,
        restitution: f32,
        friction: f32,
        is_trigger: bool,
    ) -> Self {
        let contacts = info
            .points
            .iter()
            .map(|p| ContactPoint {
                position: *p,
                penetration: info.penetration,
                normal_impulse: 0.0,
                tangent_impulse: 0.0,
            })
            .collect();
        Self {
            entity_a,
            entity_b,
            normal: info.normal,
            contacts,
            restitution,
            friction,
            is_trigger,
        }
    }

    /// Deepest penetration over all points.
    pub fn penetration(&self) -> f32 {
        self.contacts
            .iter()
            .map(|c| c.penetration)
            .fold(0.0, f32::max)
    }
}
