//! Rein 2D physics and collision engine
//!
//! Rigid bodies, convex colliders and a fixed-timestep world stepper on top of
//! the hecs ECS.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! 1. **math** - Tolerances and `Vec2` helpers
//! 2. **ecs** - Components stored on hecs entities (transform, rigid body, collider)
//! 3. **physics** - Shapes, collision detection, contact resolution and the world
//! 4. **error** - Error types shared by all layers
//!
//! # Example
//!
//! ```
//! use rein2d::glam::Vec2;
//! use rein2d::{Circle, Collider, PhysicsConfig, PhysicsWorld, Polygon, RigidBody, Transform};
//!
//! let mut physics = PhysicsWorld::new(PhysicsConfig::default());
//! physics.spawn((
//!     Transform::from_position(Vec2::new(0.0, -0.5)),
//!     RigidBody::new_static(),
//!     Collider::new(Polygon::rectangle(Vec2::ZERO, Vec2::new(20.0, 1.0)).unwrap()),
//! ));
//! let ball = physics.spawn((
//!     Transform::from_position(Vec2::new(0.0, 3.0)),
//!     RigidBody::new_dynamic(1.0),
//!     Collider::new(Circle::new(Vec2::ZERO, 0.5).unwrap()),
//! ));
//!
//! physics.step(1.0 / 60.0);
//! let y = physics.world().get::<&Transform>(ball).unwrap().position.y;
//! assert!(y < 3.0);
//! ```

pub mod ecs;
pub mod error;
pub mod math;
pub mod physics;

pub use ecs::prelude::*;

pub use error::{MaterialError, PhysicsError, ShapeError};

pub use math::{approx_eq, cross_scalar, Vec2Ext, EPSILON};

pub use physics::collider::Aabb;
pub use physics::contact::{ContactInfo, ContactManifold, ContactPoint};
pub use physics::events::{Collision, CollisionEvent, CollisionPhase};
pub use physics::shape::{Circle, Edge, Polygon, RayHit, Shape};
pub use physics::{PhysicsConfig, PhysicsWorld, RaycastHit, StepPhase};

// Re-export glam and hecs for convenience
pub use glam;
pub use hecs;
