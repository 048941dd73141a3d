//! World-space collider queries and bounding volumes.

use glam::Vec2;

use crate::ecs::components::physics::Collider;
use crate::ecs::components::transform::Transform;

use super::shape::Shape;

/// Axis-aligned bounding box for broadphase collision detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Smallest box around `points`. Empty input yields a box at the origin.
    pub fn from_points(points: &[Vec2]) -> Self {
        if points.is_empty() {
            return Self {
                min: Vec2::ZERO,
                max: Vec2::ZERO,
            };
        }
        let mut min = Vec2::splat(f32::MAX);
        let mut max = Vec2::splat(f32::MIN);
        for p in points {
            min = min.min(*p);
            max = max.max(*p);
        }
        Self { min, max }
    }

    /// Test whether two AABBs overlap. Touching boxes overlap.
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    #[inline]
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    pub fn merged(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Full width and height.
    #[inline]
    pub fn extents(&self) -> Vec2 {
        self.max - self.min
    }
}

impl Collider {
    /// The collider's shape in world space under `transform`.
    ///
    /// Recomputed on every call; the transform may change between any two
    /// queries.
    pub fn transform_to_world(&self, transform: &Transform) -> Shape {
        if self.offset == Vec2::ZERO {
            return self.shape.transformed(transform);
        }
        let mut offset_transform = *transform;
        offset_transform.position = transform.transform_point(self.offset);
        self.shape.transformed(&offset_transform)
    }

    /// World-space AABB used by the broadphase.
    pub fn min_bounds(&self, transform: &Transform) -> Aabb {
        self.transform_to_world(transform).bounds()
    }

    /// Whether `world_point` lies inside the collider, boundary inclusive.
    pub fn contains(&self, transform: &Transform, world_point: Vec2) -> bool {
        self.transform_to_world(transform).contains(world_point)
    }
}
