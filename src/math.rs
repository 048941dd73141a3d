//! Scalar tolerances and 2D vector helpers on top of `glam::Vec2`.

use glam::Vec2;

/// Tolerance used for geometric comparisons.
pub const EPSILON: f32 = 1e-5;

/// Float comparison with an absolute floor and a relative term for large values.
#[inline]
pub fn approx_eq(a: f32, b: f32) -> bool {
    let scale = 1.0f32.max(a.abs()).max(b.abs());
    (a - b).abs() <= EPSILON * scale
}

/// `w × v` where `w` is a scalar angular quantity (z-axis) and `v` a lever arm.
#[inline]
pub fn cross_scalar(w: f32, v: Vec2) -> Vec2 {
    Vec2::new(-w * v.y, w * v.x)
}

/// Extra operations the engine needs on `Vec2`.
pub trait Vec2Ext {
    /// Z component of the 3D cross product.
    fn cross(self, other: Vec2) -> f32;
    /// Rotate counter-clockwise by `angle` radians.
    fn rotated(self, angle: f32) -> Vec2;
    /// Signed length of the projection onto `axis`. Zero if `axis` is zero.
    fn scalar_projection(self, axis: Vec2) -> f32;
    /// Unit vector in the same direction; the zero vector stays zero.
    fn unit(self) -> Vec2;
    /// Component-wise tolerant equality.
    fn approx_eq(self, other: Vec2) -> bool;
}

impl Vec2Ext for Vec2 {
    #[inline]
    fn cross(self, other: Vec2) -> f32 {
        self.perp_dot(other)
    }

    #[inline]
    fn rotated(self, angle: f32) -> Vec2 {
        Vec2::from_angle(angle).rotate(self)
    }

    #[inline]
    fn scalar_projection(self, axis: Vec2) -> f32 {
        let len = axis.length();
        if len <= EPSILON {
            0.0
        } else {
            self.dot(axis) / len
        }
    }

    #[inline]
    fn unit(self) -> Vec2 {
        self.normalize_or_zero()
    }

    #[inline]
    fn approx_eq(self, other: Vec2) -> bool {
        approx_eq(self.x, other.x) && approx_eq(self.y, other.y)
    }
}
