//! Transform component for ECS entities.

use glam::{Affine2, Vec2};

use crate::math::Vec2Ext;

/// Position, rotation (radians, counter-clockwise) and scale of an entity.
///
/// Physics reads this on every query and writes it during integration and
/// position correction. Nothing derived from it is cached between ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec2,
    pub rotation: f32,
    pub scale: Vec2,
}

impl Transform {
    /// Create an identity transform.
    pub fn identity() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
        }
    }

    /// Create a transform from a position.
    pub fn from_position(position: Vec2) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    /// Convert to an affine matrix (translation * rotation * scale).
    pub fn to_affine(&self) -> Affine2 {
        Affine2::from_scale_angle_translation(self.scale, self.rotation, self.position)
    }

    /// Map a local-space point to world space.
    #[inline]
    pub fn transform_point(&self, point: Vec2) -> Vec2 {
        self.position + (point * self.scale).rotated(self.rotation)
    }

    /// Map a local-space direction to world space (no translation).
    #[inline]
    pub fn transform_vector(&self, vector: Vec2) -> Vec2 {
        (vector * self.scale).rotated(self.rotation)
    }

    /// True when the scale mirrors the shape, flipping vertex winding.
    #[inline]
    pub fn is_mirrored(&self) -> bool {
        self.scale.x * self.scale.y < 0.0
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}
