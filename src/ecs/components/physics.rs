//! Physics components for ECS entities.

use glam::Vec2;

use crate::error::MaterialError;
use crate::math::{Vec2Ext, EPSILON};
use crate::physics::shape::Shape;

/// Rigid body type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RigidBodyType {
    /// Affected by forces and collisions.
    Dynamic,
    /// Immovable.
    Static,
    /// Moved only by its own velocity, but pushes dynamic bodies.
    Kinematic,
}

/// Rigid body component.
///
/// A `mass` of zero (or a non-finite mass) makes any body behave as static:
/// impulses and forces never change its velocity.
#[derive(Debug, Clone)]
pub struct RigidBody {
    pub body_type: RigidBodyType,
    pub mass: f32,
    /// Moment of inertia about the body origin.
    pub inertia: f32,
    pub velocity: Vec2,
    /// Radians per second, counter-clockwise.
    pub angular_velocity: f32,
    pub force_accumulator: Vec2,
    pub torque_accumulator: f32,
    /// Linear damping: `v *= 1 / (1 + drag * dt)` each step.
    pub drag: f32,
    /// Angular damping, same form as `drag`.
    pub angular_drag: f32,
    /// Ignore inertia and never rotate.
    pub fixed_rotation: bool,
    /// Gravity scale (default: 1.0).
    pub gravity_scale: f32,
}

impl RigidBody {
    /// Create a new dynamic rigid body with the given mass.
    ///
    /// Inertia defaults to `mass` (unit disc approximation); use
    /// [`RigidBody::with_shape_inertia`] to derive it from a shape.
    pub fn new_dynamic(mass: f32) -> Self {
        Self {
            body_type: RigidBodyType::Dynamic,
            mass,
            inertia: mass,
            velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            force_accumulator: Vec2::ZERO,
            torque_accumulator: 0.0,
            drag: 0.0,
            angular_drag: 0.0,
            fixed_rotation: false,
            gravity_scale: 1.0,
        }
    }

    /// Create a new static rigid body.
    pub fn new_static() -> Self {
        Self {
            body_type: RigidBodyType::Static,
            mass: 0.0,
            inertia: 0.0,
            gravity_scale: 0.0,
            ..Self::new_dynamic(0.0)
        }
    }

    /// Create a new kinematic rigid body.
    pub fn new_kinematic() -> Self {
        Self {
            body_type: RigidBodyType::Kinematic,
            ..Self::new_static()
        }
    }

    /// Dynamic body whose mass and inertia come from the collider's shape
    /// area and material density. Inertia is taken about the body origin,
    /// so the collider offset counts.
    pub fn from_collider(collider: &Collider) -> Self {
        let mass = collider.shape.area() * collider.material.density;
        Self::new_dynamic(mass).with_offset_shape_inertia(&collider.shape, collider.offset)
    }

    /// Derive inertia from `shape`, moved to the body origin with the
    /// parallel-axis theorem.
    pub fn with_shape_inertia(self, shape: &Shape) -> Self {
        self.with_offset_shape_inertia(shape, Vec2::ZERO)
    }

    /// Same as [`with_shape_inertia`](Self::with_shape_inertia) for a shape
    /// displaced by `offset` in body space.
    pub fn with_offset_shape_inertia(mut self, shape: &Shape, offset: Vec2) -> Self {
        let about_centroid = shape.angular_mass(self.mass);
        let arm = shape.centroid() + offset;
        self.inertia = about_centroid + self.mass * arm.length_squared();
        self
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_drag(mut self, drag: f32, angular_drag: f32) -> Self {
        self.drag = drag;
        self.angular_drag = angular_drag;
        self
    }

    pub fn with_fixed_rotation(mut self, fixed_rotation: bool) -> Self {
        self.fixed_rotation = fixed_rotation;
        self
    }

    /// True when collisions and forces can never move this body.
    pub fn is_static(&self) -> bool {
        self.body_type != RigidBodyType::Dynamic || !(self.mass > 0.0 && self.mass.is_finite())
    }

    /// Zero for static bodies.
    #[inline]
    pub fn inverse_mass(&self) -> f32 {
        if self.is_static() {
            0.0
        } else {
            1.0 / self.mass
        }
    }

    /// Zero for static, fixed-rotation, or degenerate-inertia bodies.
    #[inline]
    pub fn inverse_inertia(&self) -> f32 {
        if self.is_static()
            || self.fixed_rotation
            || !(self.inertia > EPSILON && self.inertia.is_finite())
        {
            0.0
        } else {
            1.0 / self.inertia
        }
    }

    /// Accumulate a force, integrated over the next step.
    pub fn apply_force(&mut self, force: Vec2) {
        if !self.is_static() {
            self.force_accumulator += force;
        }
    }

    /// Accumulate a torque, integrated over the next step.
    pub fn apply_torque(&mut self, torque: f32) {
        if !self.is_static() {
            self.torque_accumulator += torque;
        }
    }

    /// Change velocity immediately: `dv = J / m`.
    pub fn apply_impulse(&mut self, impulse: Vec2) {
        self.velocity += impulse * self.inverse_mass();
    }

    /// Change angular velocity immediately: `dw = j / I`.
    pub fn apply_angular_impulse(&mut self, impulse: f32) {
        self.angular_velocity += impulse * self.inverse_inertia();
    }

    /// Impulse applied at lever arm `r` from the body origin.
    pub fn apply_impulse_at(&mut self, impulse: Vec2, r: Vec2) {
        self.apply_impulse(impulse);
        self.apply_angular_impulse(r.cross(impulse));
    }
}

/// Surface and bulk properties of a collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsMaterial {
    friction: f32,
    restitution: f32,
    density: f32,
}

impl PhysicsMaterial {
    pub fn new(friction: f32, restitution: f32, density: f32) -> Result<Self, MaterialError> {
        if !(friction.is_finite() && friction >= 0.0) {
            return Err(MaterialError::InvalidFriction(friction));
        }
        if !(0.0..=1.0).contains(&restitution) {
            return Err(MaterialError::InvalidRestitution(restitution));
        }
        if !(density.is_finite() && density > 0.0) {
            return Err(MaterialError::InvalidDensity(density));
        }
        Ok(Self {
            friction,
            restitution,
            density,
        })
    }

    #[inline]
    pub fn friction(&self) -> f32 {
        self.friction
    }

    #[inline]
    pub fn restitution(&self) -> f32 {
        self.restitution
    }

    #[inline]
    pub fn density(&self) -> f32 {
        self.density
    }

    /// Coefficients for a contact between two materials, as
    /// `(restitution, friction)`.
    ///
    /// Restitution is the larger of the two; friction is the geometric mean.
    pub fn combine(a: &PhysicsMaterial, b: &PhysicsMaterial) -> (f32, f32) {
        (
            a.restitution.max(b.restitution),
            (a.friction * b.friction).sqrt(),
        )
    }
}

impl Default for PhysicsMaterial {
    fn default() -> Self {
        Self {
            friction: 0.5,
            restitution: 0.2,
            density: 1.0,
        }
    }
}

/// Collision detection component.
#[derive(Debug, Clone)]
pub struct Collider {
    /// Shape in body-local space.
    pub shape: Shape,
    pub material: PhysicsMaterial,
    /// Offset from the entity's transform origin, in local space.
    pub offset: Vec2,
    /// If true, generates trigger events but no physics response.
    pub is_trigger: bool,
}

impl Collider {
    pub fn new(shape: impl Into<Shape>) -> Self {
        Self {
            shape: shape.into(),
            material: PhysicsMaterial::default(),
            offset: Vec2::ZERO,
            is_trigger: false,
        }
    }

    pub fn trigger(shape: impl Into<Shape>) -> Self {
        Self {
            is_trigger: true,
            ..Self::new(shape)
        }
    }

    pub fn with_material(mut self, material: PhysicsMaterial) -> Self {
        self.material = material;
        self
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }
}

/// Layer bitmasks deciding which collider pairs are tested at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionLayers {
    /// Layers this collider belongs to.
    pub memberships: u32,
    /// Layers this collider interacts with.
    pub filters: u32,
}

impl CollisionLayers {
    pub const ALL: u32 = u32::MAX;

    pub fn new(memberships: u32, filters: u32) -> Self {
        Self {
            memberships,
            filters,
        }
    }

    /// Membership test for a single layer index (0..32).
    pub fn has_layer(&self, layer: u32) -> bool {
        layer < 32 && self.memberships & (1 << layer) != 0
    }

    /// Both sides must accept the other's memberships.
    pub fn interacts_with(&self, other: &CollisionLayers) -> bool {
        self.filters & other.memberships != 0 && other.filters & self.memberships != 0
    }
}

impl Default for CollisionLayers {
    fn default() -> Self {
        Self::new(Self::ALL, Self::ALL)
    }
}
