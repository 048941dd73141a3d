//! Convex shape primitives and their geometric queries.
//!
//! Shapes are stored in body-local space. [`Shape::transformed`] produces the
//! world-space copy the narrowphase works on.

use std::f32::consts::{PI, TAU};

use glam::Vec2;

use crate::ecs::components::transform::Transform;
use crate::error::ShapeError;
use crate::math::{Vec2Ext, EPSILON};

use super::collider::Aabb;

/// A circle given by its center and radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    /// Create a circle. A zero radius is accepted but never collides.
    pub fn new(center: Vec2, radius: f32) -> Result<Self, ShapeError> {
        if !radius.is_finite() || radius < 0.0 {
            return Err(ShapeError::InvalidRadius(radius));
        }
        if !center.is_finite() {
            return Err(ShapeError::NonFinite);
        }
        Ok(Self { center, radius })
    }

    pub fn area(&self) -> f32 {
        PI * self.radius * self.radius
    }

    /// Moment of inertia of a solid disc about its center.
    pub fn angular_mass(&self, mass: f32) -> f32 {
        0.5 * mass * self.radius * self.radius
    }

    /// Squared-distance test, boundary inclusive.
    pub fn contains(&self, point: Vec2) -> bool {
        (point - self.center).length_squared() <= self.radius * self.radius + EPSILON
    }

    pub fn support_point(&self, direction: Vec2) -> Vec2 {
        self.center + direction.unit() * self.radius
    }

    pub fn bounds(&self) -> Aabb {
        let r = Vec2::splat(self.radius);
        Aabb {
            min: self.center - r,
            max: self.center + r,
        }
    }

    pub fn transformed(&self, transform: &Transform) -> Circle {
        let scale = transform.scale.abs().max_element();
        Circle {
            center: transform.transform_point(self.center),
            radius: self.radius * scale,
        }
    }
}

/// A convex polygon with counter-clockwise winding.
///
/// `normals()[i]` is the outward unit normal of the edge from `vertices()[i]`
/// to `vertices()[(i + 1) % n]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Vec2>,
    normals: Vec<Vec2>,
}

impl Polygon {
    /// Build a polygon from an ordered vertex loop.
    ///
    /// Clockwise input is reversed. Degenerate and non-convex loops are rejected.
    pub fn new(mut vertices: Vec<Vec2>) -> Result<Self, ShapeError> {
        if vertices.len() < 3 {
            return Err(ShapeError::TooFewVertices(vertices.len()));
        }
        if vertices.iter().any(|v| !v.is_finite()) {
            return Err(ShapeError::NonFinite);
        }

        let signed = signed_area(&vertices);
        if signed.abs() <= EPSILON {
            return Err(ShapeError::DegeneratePolygon);
        }
        if signed < 0.0 {
            vertices.reverse();
        }
        if !is_convex(&vertices) {
            return Err(ShapeError::NotConvex);
        }

        Ok(Self::from_ccw(vertices))
    }

    /// Axis-aligned rectangle centred on `center` with full extents `size`.
    pub fn rectangle(center: Vec2, size: Vec2) -> Result<Self, ShapeError> {
        let h = size * 0.5;
        Self::new(vec![
            center + Vec2::new(-h.x, -h.y),
            center + Vec2::new(h.x, -h.y),
            center + Vec2::new(h.x, h.y),
            center + Vec2::new(-h.x, h.y),
        ])
    }

    pub fn triangle(a: Vec2, b: Vec2, c: Vec2) -> Result<Self, ShapeError> {
        Self::new(vec![a, b, c])
    }

    /// Regular polygon with `sides` vertices on a circle of `radius`.
    pub fn regular(center: Vec2, radius: f32, sides: usize) -> Result<Self, ShapeError> {
        if sides < 3 {
            return Err(ShapeError::TooFewVertices(sides));
        }
        let step = TAU / sides as f32;
        let vertices = (0..sides)
            .map(|i| center + Vec2::from_angle(step * i as f32) * radius)
            .collect();
        Self::new(vertices)
    }

    /// Skips validation. Used for world-space copies, which may legitimately
    /// collapse to zero area under a zero scale.
    fn from_ccw(vertices: Vec<Vec2>) -> Self {
        let n = vertices.len();
        let normals = (0..n)
            .map(|i| {
                let edge = vertices[(i + 1) % n] - vertices[i];
                Vec2::new(edge.y, -edge.x).normalize_or_zero()
            })
            .collect();
        Self { vertices, normals }
    }

    #[inline]
    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    #[inline]
    pub fn normals(&self) -> &[Vec2] {
        &self.normals
    }

    /// Edge `i`, directed along the winding.
    #[inline]
    pub fn edge(&self, i: usize) -> Edge {
        let n = self.vertices.len();
        Edge::new(self.vertices[i % n], self.vertices[(i + 1) % n])
    }

    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        (0..self.vertices.len()).map(move |i| self.edge(i))
    }

    pub fn area(&self) -> f32 {
        signed_area(&self.vertices).abs()
    }

    /// Area-weighted centroid. Falls back to the vertex average for zero area.
    pub fn centroid(&self) -> Vec2 {
        let n = self.vertices.len();
        let mut weighted = Vec2::ZERO;
        let mut twice_area = 0.0;
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            let cross = a.cross(b);
            twice_area += cross;
            weighted += (a + b) * cross;
        }

        if twice_area.abs() <= EPSILON {
            return self.vertices.iter().copied().sum::<Vec2>() / n as f32;
        }
        weighted / (3.0 * twice_area)
    }

    /// Second moment of area about the centroid, scaled by `mass / area`.
    ///
    /// Returns infinity for a zero-area polygon so it never rotates.
    pub fn angular_mass(&self, mass: f32) -> f32 {
        let area = self.area();
        if area <= EPSILON {
            return f32::INFINITY;
        }

        let c = self.centroid();
        let n = self.vertices.len();
        let mut sum = 0.0;
        for i in 0..n {
            let a = self.vertices[i] - c;
            let b = self.vertices[(i + 1) % n] - c;
            sum += a.cross(b) * (a.dot(a) + a.dot(b) + b.dot(b));
        }

        (mass / area) * sum.abs() / 12.0
    }

    /// Same-side test against every edge, boundary inclusive. A polygon
    /// collapsed to zero area contains nothing.
    pub fn contains(&self, point: Vec2) -> bool {
        if self.area() <= EPSILON {
            return false;
        }
        self.vertices
            .iter()
            .zip(&self.normals)
            .all(|(v, n)| n.dot(point - *v) <= EPSILON)
    }

    /// Index of the vertex furthest along `direction`. Earlier vertices win ties.
    pub fn support_index(&self, direction: Vec2) -> usize {
        let mut best = 0;
        let mut best_dot = f32::MIN;
        for (i, v) in self.vertices.iter().enumerate() {
            let d = v.dot(direction);
            if d > best_dot {
                best_dot = d;
                best = i;
            }
        }
        best
    }

    pub fn support_point(&self, direction: Vec2) -> Vec2 {
        self.vertices[self.support_index(direction)]
    }

    /// Projection interval of all vertices onto `axis`.
    pub fn project(&self, axis: Vec2) -> (f32, f32) {
        self.vertices
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), v| {
                let d = v.dot(axis);
                (lo.min(d), hi.max(d))
            })
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(&self.vertices)
    }

    /// World-space copy. Mirroring scales flip the loop back to counter-clockwise.
    pub fn transformed(&self, transform: &Transform) -> Polygon {
        let mut vertices: Vec<Vec2> = self
            .vertices
            .iter()
            .map(|v| transform.transform_point(*v))
            .collect();
        if transform.is_mirrored() {
            vertices.reverse();
        }
        Self::from_ccw(vertices)
    }
}

/// A directed line segment.
///
/// Edges are query shapes (raycasts, manifold clipping) rather than body shapes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub start: Vec2,
    pub end: Vec2,
}

impl Edge {
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn direction(&self) -> Vec2 {
        self.end - self.start
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.direction().length()
    }

    #[inline]
    pub fn midpoint(&self) -> Vec2 {
        (self.start + self.end) * 0.5
    }

    pub fn reversed(&self) -> Edge {
        Edge::new(self.end, self.start)
    }

    #[inline]
    pub fn point_at(&self, t: f32) -> Vec2 {
        self.start + self.direction() * t
    }

    /// Parameter of the projection of `point` onto this edge's line.
    /// Zero for a degenerate edge.
    pub fn parameter_of(&self, point: Vec2) -> f32 {
        let d = self.direction();
        let len_sq = d.length_squared();
        if len_sq <= EPSILON * EPSILON {
            return 0.0;
        }
        (point - self.start).dot(d) / len_sq
    }

    /// Direction rotated +90 degrees: the normal on the left of the directed edge.
    pub fn unit_normal(&self) -> Vec2 {
        self.direction().perp().normalize_or_zero()
    }

    /// Unit normal flipped to point toward `reference`; zero when the
    /// reference lies on the edge's line.
    pub fn unit_normal_toward(&self, reference: Vec2) -> Vec2 {
        let normal = self.unit_normal();
        let side = normal.dot(reference - self.start);
        if side.abs() <= EPSILON {
            Vec2::ZERO
        } else if side < 0.0 {
            -normal
        } else {
            normal
        }
    }

    /// Collinearity plus parametric range check, both with tolerance.
    pub fn contains(&self, point: Vec2) -> bool {
        let d = self.direction();
        let len = d.length();
        if len <= EPSILON {
            return (point - self.start).length() <= EPSILON;
        }
        let distance_to_line = d.cross(point - self.start).abs() / len;
        if distance_to_line > EPSILON {
            return false;
        }
        let t = self.parameter_of(point);
        let tolerance = EPSILON / len;
        (-tolerance..=1.0 + tolerance).contains(&t)
    }

    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        self.point_at(self.parameter_of(point).clamp(0.0, 1.0))
    }

    /// Clip this edge to the span of `other` projected onto this edge's line.
    ///
    /// Each endpoint is clamped independently. Returns `self` unchanged when
    /// nothing needs clipping, when the spans do not overlap, or when this
    /// edge is degenerate.
    pub fn clip_to_segment(&self, other: &Edge) -> Edge {
        if self.direction().length_squared() <= EPSILON * EPSILON {
            return *self;
        }

        let t0 = self.parameter_of(other.start);
        let t1 = self.parameter_of(other.end);
        let lo = t0.min(t1);
        let hi = t0.max(t1);

        let clipped_lo = lo.max(0.0);
        let clipped_hi = hi.min(1.0);
        if clipped_lo > clipped_hi {
            return *self;
        }

        let mut clipped = *self;
        if lo > 0.0 {
            clipped.start = self.point_at(clipped_lo);
        }
        if hi < 1.0 {
            clipped.end = self.point_at(clipped_hi);
        }
        clipped
    }

    /// Segment-segment intersection as parameters `(t, u)` along `self` and
    /// `other`. Parallel segments never intersect.
    pub fn intersection_params(&self, other: &Edge) -> Option<(f32, f32)> {
        let r = self.direction();
        let s = other.direction();
        let denom = r.cross(s);
        if denom.abs() <= EPSILON * EPSILON {
            return None;
        }

        let qp = other.start - self.start;
        let t = qp.cross(s) / denom;
        let u = qp.cross(r) / denom;
        if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
            Some((t, u))
        } else {
            None
        }
    }

    pub fn intersection(&self, other: &Edge) -> Option<Vec2> {
        self.intersection_params(other)
            .map(|(t, _)| self.point_at(t))
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(&[self.start, self.end])
    }

    pub fn transformed(&self, transform: &Transform) -> Edge {
        Edge::new(
            transform.transform_point(self.start),
            transform.transform_point(self.end),
        )
    }
}

/// Result of casting an edge (ray segment) against a shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Fraction along the ray edge, in `[0, 1]`.
    pub toi: f32,
    pub point: Vec2,
    /// Surface normal at the hit, facing the ray origin.
    pub normal: Vec2,
}

/// Tagged union of the supported shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Circle(Circle),
    Polygon(Polygon),
    Edge(Edge),
}

impl From<Circle> for Shape {
    fn from(circle: Circle) -> Self {
        Shape::Circle(circle)
    }
}

impl From<Polygon> for Shape {
    fn from(polygon: Polygon) -> Self {
        Shape::Polygon(polygon)
    }
}

impl From<Edge> for Shape {
    fn from(edge: Edge) -> Self {
        Shape::Edge(edge)
    }
}

impl Shape {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Shape::Circle(_) => "circle",
            Shape::Polygon(_) => "polygon",
            Shape::Edge(_) => "edge",
        }
    }

    pub fn area(&self) -> f32 {
        match self {
            Shape::Circle(c) => c.area(),
            Shape::Polygon(p) => p.area(),
            Shape::Edge(_) => 0.0,
        }
    }

    pub fn centroid(&self) -> Vec2 {
        match self {
            Shape::Circle(c) => c.center,
            Shape::Polygon(p) => p.centroid(),
            Shape::Edge(e) => e.midpoint(),
        }
    }

    /// Moment of inertia about the centroid for a body of `mass`.
    pub fn angular_mass(&self, mass: f32) -> f32 {
        match self {
            Shape::Circle(c) => c.angular_mass(mass),
            Shape::Polygon(p) => p.angular_mass(mass),
            Shape::Edge(e) => mass * e.direction().length_squared() / 12.0,
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        match self {
            Shape::Circle(c) => c.contains(point),
            Shape::Polygon(p) => p.contains(point),
            Shape::Edge(e) => e.contains(point),
        }
    }

    pub fn support_point(&self, direction: Vec2) -> Vec2 {
        match self {
            Shape::Circle(c) => c.support_point(direction),
            Shape::Polygon(p) => p.support_point(direction),
            Shape::Edge(e) => {
                if e.end.dot(direction) > e.start.dot(direction) {
                    e.end
                } else {
                    e.start
                }
            }
        }
    }

    /// Outward edge normals. Circles have none; their axis depends on the
    /// opposing shape and is computed by the narrowphase.
    pub fn normals(&self) -> Vec<Vec2> {
        match self {
            Shape::Circle(_) => Vec::new(),
            Shape::Polygon(p) => p.normals().to_vec(),
            Shape::Edge(e) => {
                let n = e.unit_normal();
                vec![n, -n]
            }
        }
    }

    pub fn bounds(&self) -> Aabb {
        match self {
            Shape::Circle(c) => c.bounds(),
            Shape::Polygon(p) => p.bounds(),
            Shape::Edge(e) => e.bounds(),
        }
    }

    pub fn transformed(&self, transform: &Transform) -> Shape {
        match self {
            Shape::Circle(c) => Shape::Circle(c.transformed(transform)),
            Shape::Polygon(p) => Shape::Polygon(p.transformed(transform)),
            Shape::Edge(e) => Shape::Edge(e.transformed(transform)),
        }
    }

    /// Zero-radius circles and zero-area polygons never collide.
    pub fn is_degenerate(&self) -> bool {
        match self {
            Shape::Circle(c) => c.radius <= EPSILON,
            Shape::Polygon(p) => p.area() <= EPSILON,
            Shape::Edge(e) => e.length() <= EPSILON,
        }
    }

    pub fn is_finite(&self) -> bool {
        match self {
            Shape::Circle(c) => c.center.is_finite() && c.radius.is_finite(),
            Shape::Polygon(p) => p.vertices().iter().all(|v| v.is_finite()),
            Shape::Edge(e) => e.start.is_finite() && e.end.is_finite(),
        }
    }

    /// Cast `ray` (from `ray.start` toward `ray.end`) against this shape.
    ///
    /// A ray starting inside a solid shape hits at `toi == 0`.
    pub fn ray_intersection(&self, ray: &Edge) -> Option<RayHit> {
        let dir = ray.direction();
        if dir.length_squared() <= EPSILON * EPSILON {
            return None;
        }

        match self {
            Shape::Circle(c) => {
                if c.contains(ray.start) {
                    return Some(RayHit {
                        toi: 0.0,
                        point: ray.start,
                        normal: -dir.unit(),
                    });
                }
                // |start + t*dir - center|^2 = r^2
                let m = ray.start - c.center;
                let a = dir.dot(dir);
                let b = m.dot(dir);
                let cc = m.dot(m) - c.radius * c.radius;
                let disc = b * b - a * cc;
                if disc < 0.0 {
                    return None;
                }
                let t = (-b - disc.sqrt()) / a;
                if !(0.0..=1.0).contains(&t) {
                    return None;
                }
                let point = ray.point_at(t);
                Some(RayHit {
                    toi: t,
                    point,
                    normal: (point - c.center).unit(),
                })
            }
            Shape::Polygon(p) => {
                if p.contains(ray.start) {
                    return Some(RayHit {
                        toi: 0.0,
                        point: ray.start,
                        normal: -dir.unit(),
                    });
                }
                let mut best: Option<RayHit> = None;
                for (i, edge) in p.edges().enumerate() {
                    if let Some((t, _)) = ray.intersection_params(&edge) {
                        if best.map_or(true, |b| t < b.toi) {
                            best = Some(RayHit {
                                toi: t,
                                point: ray.point_at(t),
                                normal: p.normals()[i],
                            });
                        }
                    }
                }
                best
            }
            Shape::Edge(e) => {
                let (t, _) = ray.intersection_params(e)?;
                let mut normal = e.unit_normal_toward(ray.start);
                if normal == Vec2::ZERO {
                    normal = -dir.unit();
                }
                Some(RayHit {
                    toi: t,
                    point: ray.point_at(t),
                    normal,
                })
            }
        }
    }
}

/// Twice-halved shoelace sum. Positive for counter-clockwise loops.
fn signed_area(vertices: &[Vec2]) -> f32 {
    let n = vertices.len();
    let mut sum = 0.0;
    for i in 0..n {
        sum += vertices[i].cross(vertices[(i + 1) % n]);
    }
    sum * 0.5
}

/// Counter-clockwise loop with no right turns that winds exactly once.
/// Collinear runs are allowed; star loops turn more than a full circle.
fn is_convex(vertices: &[Vec2]) -> bool {
    let n = vertices.len();
    let mut turning = 0.0;
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        let c = vertices[(i + 2) % n];
        let incoming = b - a;
        let outgoing = c - b;
        let cross = incoming.cross(outgoing);
        if cross < -EPSILON {
            return false;
        }
        turning += cross.atan2(incoming.dot(outgoing));
    }
    (turning - TAU).abs() <= 1e-3
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn square(size: f32) -> Polygon {
        Polygon::rectangle(Vec2::ZERO, Vec2::splat(size)).unwrap()
    }

    #[test]
    fn test_circle_rejects_bad_radius() {
        assert_eq!(
            Circle::new(Vec2::ZERO, -1.0),
            Err(ShapeError::InvalidRadius(-1.0))
        );
        assert!(Circle::new(Vec2::ZERO, f32::NAN).is_err());
        assert!(Circle::new(Vec2::ZERO, 0.0).is_ok());
    }

    #[test]
    fn test_circle_boundary_inclusive() {
        let c = Circle::new(Vec2::new(2.0, 2.0), 2.0).unwrap();
        assert!(c.contains(Vec2::new(2.0, 0.0)));
        assert!(c.contains(Vec2::new(4.0, 2.0)));
        assert!(c.contains(Vec2::new(2.0, 2.0)));
        assert!(!c.contains(Vec2::new(0.0, 0.0)));
    }

    #[test]
    fn test_circle_area_and_support() {
        let c = Circle::new(Vec2::new(1.0, 1.0), 2.0).unwrap();
        assert!((c.area() - 4.0 * PI).abs() < 1e-4);
        let s = c.support_point(Vec2::new(0.0, 5.0));
        assert!(s.approx_eq(Vec2::new(1.0, 3.0)));
    }

    #[test]
    fn test_polygon_fixes_clockwise_winding() {
        let cw = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 0.0),
        ];
        let p = Polygon::new(cw).unwrap();
        assert!(signed_area(p.vertices()) > 0.0);
        assert!((p.area() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_polygon_rejects_bad_input() {
        assert_eq!(
            Polygon::new(vec![Vec2::ZERO, Vec2::X]),
            Err(ShapeError::TooFewVertices(2))
        );
        assert_eq!(
            Polygon::new(vec![Vec2::ZERO, Vec2::X, Vec2::new(2.0, 0.0)]),
            Err(ShapeError::DegeneratePolygon)
        );
        let dart = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 1.0),
            Vec2::new(4.0, 0.0),
            Vec2::new(2.0, 4.0),
        ];
        assert_eq!(Polygon::new(dart), Err(ShapeError::NotConvex));

        // every turn is a left turn, but the loop winds twice
        let pentagon = Polygon::regular(Vec2::ZERO, 1.0, 5).unwrap();
        let star = [0, 2, 4, 1, 3]
            .iter()
            .map(|&i| pentagon.vertices()[i])
            .collect();
        assert_eq!(Polygon::new(star), Err(ShapeError::NotConvex));
    }

    #[test]
    fn test_polygon_normals_point_outward() {
        let p = square(2.0);
        let c = p.centroid();
        for (i, n) in p.normals().iter().enumerate() {
            assert!((n.length() - 1.0).abs() < 1e-6);
            let mid = p.edge(i).midpoint();
            assert!(n.dot(mid - c) > 0.0, "normal {} points inward", i);
        }
        // bottom edge of a ccw box faces -y
        assert!(p.normals()[0].approx_eq(Vec2::new(0.0, -1.0)));
    }

    #[test]
    fn test_polygon_area_centroid() {
        let p = Polygon::rectangle(Vec2::new(3.0, -1.0), Vec2::new(4.0, 2.0)).unwrap();
        assert!((p.area() - 8.0).abs() < 1e-5);
        assert!(p.centroid().approx_eq(Vec2::new(3.0, -1.0)));

        let t = Polygon::triangle(Vec2::ZERO, Vec2::new(3.0, 0.0), Vec2::new(0.0, 3.0)).unwrap();
        assert!((t.area() - 4.5).abs() < 1e-5);
        assert!(t.centroid().approx_eq(Vec2::new(1.0, 1.0)));
    }

    #[test]
    fn test_polygon_angular_mass_matches_box_formula() {
        // m * (w^2 + h^2) / 12
        let p = Polygon::rectangle(Vec2::new(5.0, 5.0), Vec2::new(2.0, 4.0)).unwrap();
        let expected = 3.0 * (4.0 + 16.0) / 12.0;
        assert!((p.angular_mass(3.0) - expected).abs() < 1e-4);
    }

    #[test]
    fn test_polygon_contains_inside_outside_boundary() {
        let p = square(4.0);
        assert!(p.contains(Vec2::ZERO));
        assert!(p.contains(Vec2::new(1.9, -1.9)));
        assert!(p.contains(Vec2::new(2.0, 0.0)));
        assert!(p.contains(Vec2::new(2.0, 2.0)));
        assert!(!p.contains(Vec2::new(2.1, 0.0)));
        assert!(!p.contains(Vec2::new(-3.0, 3.0)));
    }

    #[test]
    fn test_polygon_support_point() {
        let p = square(2.0);
        assert!(p
            .support_point(Vec2::new(1.0, 1.0))
            .approx_eq(Vec2::new(1.0, 1.0)));
        assert!(p
            .support_point(Vec2::new(-1.0, -0.5))
            .approx_eq(Vec2::new(-1.0, -1.0)));
    }

    #[test]
    fn test_polygon_transformed_rotates_and_keeps_winding() {
        let p = square(2.0);
        let t = Transform::from_position(Vec2::new(10.0, 0.0))
            .with_rotation(FRAC_PI_2)
            .with_scale(Vec2::new(-2.0, 1.0));
        let w = p.transformed(&t);
        assert!(signed_area(w.vertices()) > 0.0);
        assert!((w.area() - 8.0).abs() < 1e-4);
        assert!(w.centroid().approx_eq(Vec2::new(10.0, 0.0)));
        assert!(w.contains(Vec2::new(10.0, 1.9)));
        assert!(!w.contains(Vec2::new(11.5, 0.0)));
    }

    #[test]
    fn test_regular_polygon() {
        let hex = Polygon::regular(Vec2::ZERO, 1.0, 6).unwrap();
        assert_eq!(hex.vertices().len(), 6);
        assert!(hex.contains(Vec2::new(0.5, 0.0)));
        assert!(Polygon::regular(Vec2::ZERO, 1.0, 2).is_err());
    }

    #[test]
    fn test_edge_clip_both_ends() {
        let e = Edge::new(Vec2::new(1.0, 1.0), Vec2::new(5.0, 1.0));
        let other = Edge::new(Vec2::new(2.0, 0.0), Vec2::new(4.0, 0.0));
        let clipped = e.clip_to_segment(&other);
        assert!(clipped.start.approx_eq(Vec2::new(2.0, 1.0)));
        assert!(clipped.end.approx_eq(Vec2::new(4.0, 1.0)));
    }

    #[test]
    fn test_edge_clip_unchanged_when_covered() {
        let e = Edge::new(Vec2::new(1.0, 1.0), Vec2::new(5.0, 1.0));
        let other = Edge::new(Vec2::new(0.0, 0.0), Vec2::new(6.0, 0.0));
        assert_eq!(e.clip_to_segment(&other), e);
    }

    #[test]
    fn test_edge_clip_one_end_and_reversed_other() {
        let e = Edge::new(Vec2::new(0.0, 0.0), Vec2::new(4.0, 0.0));
        let other = Edge::new(Vec2::new(6.0, 3.0), Vec2::new(1.0, 3.0));
        let clipped = e.clip_to_segment(&other);
        assert!(clipped.start.approx_eq(Vec2::new(1.0, 0.0)));
        assert!(clipped.end.approx_eq(Vec2::new(4.0, 0.0)));
    }

    #[test]
    fn test_edge_clip_disjoint_returns_original() {
        let e = Edge::new(Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0));
        let other = Edge::new(Vec2::new(3.0, 0.0), Vec2::new(4.0, 0.0));
        assert_eq!(e.clip_to_segment(&other), e);
    }

    #[test]
    fn test_edge_unit_normal_orientation() {
        let e = Edge::new(Vec2::new(0.0, 0.0), Vec2::new(4.0, 0.0));
        assert!(e.unit_normal().approx_eq(Vec2::new(0.0, 1.0)));
        assert!(e.reversed().unit_normal().approx_eq(Vec2::new(0.0, -1.0)));
    }

    #[test]
    fn test_edge_unit_normal_toward() {
        let e = Edge::new(Vec2::new(0.0, 0.0), Vec2::new(4.0, 0.0));
        assert!(e
            .unit_normal_toward(Vec2::new(1.0, -3.0))
            .approx_eq(Vec2::new(0.0, -1.0)));
        assert!(e
            .unit_normal_toward(Vec2::new(1.0, 3.0))
            .approx_eq(Vec2::new(0.0, 1.0)));
        assert_eq!(e.unit_normal_toward(Vec2::new(9.0, 0.0)), Vec2::ZERO);
    }

    #[test]
    fn test_edge_contains() {
        let e = Edge::new(Vec2::new(0.0, 0.0), Vec2::new(4.0, 4.0));
        assert!(e.contains(Vec2::new(2.0, 2.0)));
        assert!(e.contains(Vec2::new(0.0, 0.0)));
        assert!(e.contains(Vec2::new(4.0, 4.0)));
        assert!(!e.contains(Vec2::new(5.0, 5.0)));
        assert!(!e.contains(Vec2::new(2.0, 2.5)));
    }

    #[test]
    fn test_edge_intersection() {
        let a = Edge::new(Vec2::new(0.0, 0.0), Vec2::new(2.0, 3.0));
        let b = Edge::new(Vec2::new(0.0, 3.0), Vec2::new(2.0, 0.0));
        assert!(a.intersection(&b).unwrap().approx_eq(Vec2::new(1.0, 1.5)));

        let c = Edge::new(Vec2::new(-1.0, -1.5), Vec2::new(1.0, 0.0));
        assert!(b.intersection(&c).is_none());
    }

    #[test]
    fn test_ray_against_shapes() {
        let ray = Edge::new(Vec2::new(-10.0, 0.0), Vec2::new(10.0, 0.0));

        let circle = Shape::from(Circle::new(Vec2::ZERO, 2.0).unwrap());
        let hit = circle.ray_intersection(&ray).unwrap();
        assert!(hit.point.approx_eq(Vec2::new(-2.0, 0.0)));
        assert!(hit.normal.approx_eq(Vec2::new(-1.0, 0.0)));
        assert!((hit.toi - 0.4).abs() < 1e-5);

        let boxed = Shape::from(square(2.0));
        let hit = boxed.ray_intersection(&ray).unwrap();
        assert!(hit.point.approx_eq(Vec2::new(-1.0, 0.0)));
        assert!(hit.normal.approx_eq(Vec2::new(-1.0, 0.0)));

        let miss = Edge::new(Vec2::new(-10.0, 5.0), Vec2::new(10.0, 5.0));
        assert!(circle.ray_intersection(&miss).is_none());
        assert!(boxed.ray_intersection(&miss).is_none());
    }

    #[test]
    fn test_shape_degenerate() {
        assert!(Shape::from(Circle::new(Vec2::ZERO, 0.0).unwrap()).is_degenerate());
        let collapsed = square(1.0).transformed(&Transform::identity().with_scale(Vec2::ZERO));
        assert!(Shape::from(collapsed).is_degenerate());
        assert!(!Shape::from(square(1.0)).is_degenerate());
    }

    #[test]
    fn test_collapsed_polygon_contains_nothing() {
        let point = square(1.0).transformed(&Transform::identity().with_scale(Vec2::ZERO));
        assert!(!point.contains(Vec2::ZERO));
        assert!(!point.contains(Vec2::new(1000.0, -1000.0)));

        let flat = square(1.0).transformed(
            &Transform::from_position(Vec2::new(0.0, 50.0)).with_scale(Vec2::new(1.0, 0.0)),
        );
        assert!(!flat.contains(Vec2::new(0.0, 50.0)));
        assert!(!flat.contains(Vec2::new(900.0, 50.0)));
    }
}
