//! Error types for shape construction, materials, and world queries.

use thiserror::Error;

/// Geometry rejected at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ShapeError {
    /// Circle radius was negative, NaN, or infinite.
    #[error("circle radius must be finite and non-negative, got {0}")]
    InvalidRadius(f32),
    /// A polygon needs at least three vertices.
    #[error("polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),
    /// All vertices are collinear or coincident.
    #[error("polygon has zero area")]
    DegeneratePolygon,
    /// The vertex loop turns both ways.
    #[error("polygon is not convex")]
    NotConvex,
    /// A coordinate was NaN or infinite.
    #[error("shape contains a non-finite coordinate")]
    NonFinite,
}

/// Material coefficients out of range.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum MaterialError {
    #[error("friction must be finite and >= 0, got {0}")]
    InvalidFriction(f32),
    #[error("restitution must be within [0, 1], got {0}")]
    InvalidRestitution(f32),
    #[error("density must be finite and > 0, got {0}")]
    InvalidDensity(f32),
}

/// Errors surfaced by the physics world and the narrowphase.
#[derive(Debug, Error)]
pub enum PhysicsError {
    #[error(transparent)]
    Shape(#[from] ShapeError),
    #[error(transparent)]
    Material(#[from] MaterialError),
    /// A world-space shape ended up with NaN or infinite coordinates.
    #[error("non-finite geometry in narrowphase")]
    NonFiniteGeometry,
    /// The shape pair has no collision routine (edges are query-only shapes).
    #[error("no collision routine for {a} vs {b}")]
    UnsupportedPair { a: &'static str, b: &'static str },
    #[error(transparent)]
    NoSuchEntity(#[from] hecs::NoSuchEntity),
    #[error(transparent)]
    MissingComponent(#[from] hecs::ComponentError),
}
