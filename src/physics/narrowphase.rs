//! Narrowphase collision detection: circle tests, SAT, and clipped manifolds.
//!
//! All routines work on world-space shapes and report the normal pointing
//! from the first shape toward the second.

use glam::Vec2;

use crate::error::PhysicsError;
use crate::math::{Vec2Ext, EPSILON};

use super::contact::ContactInfo;
use super::shape::{Circle, Edge, Polygon, Shape};

/// Contact points further than this in front of the reference face are dropped.
pub const MANIFOLD_TOLERANCE: f32 = 0.01;

/// Detect collision between two world-space shapes.
///
/// Degenerate shapes never collide. Edges are query shapes and have no
/// collision routine; asking for one is an error, as is non-finite input.
pub fn detect_collision(
    shape_a: &Shape,
    shape_b: &Shape,
) -> Result<Option<ContactInfo>, PhysicsError> {
    if !shape_a.is_finite() || !shape_b.is_finite() {
        return Err(PhysicsError::NonFiniteGeometry);
    }

    match (shape_a, shape_b) {
        (Shape::Edge(_), _) | (_, Shape::Edge(_)) => Err(PhysicsError::UnsupportedPair {
            a: shape_a.kind_name(),
            b: shape_b.kind_name(),
        }),
        _ if shape_a.is_degenerate() || shape_b.is_degenerate() => Ok(None),
        (Shape::Circle(a), Shape::Circle(b)) => Ok(circle_circle(a, b)),
        (Shape::Circle(c), Shape::Polygon(p)) => Ok(circle_polygon(c, p)),
        (Shape::Polygon(p), Shape::Circle(c)) => Ok(circle_polygon(c, p).map(ContactInfo::flipped)),
        (Shape::Polygon(a), Shape::Polygon(b)) => Ok(polygon_polygon(a, b)),
    }
}

/// Circle-circle test. Touching circles report a zero-depth contact.
pub fn circle_circle(a: &Circle, b: &Circle) -> Option<ContactInfo> {
    let diff = b.center - a.center;
    let dist_sq = diff.length_squared();
    let radii = a.radius + b.radius;

    if dist_sq > radii * radii {
        return None;
    }

    let dist = dist_sq.sqrt();
    let normal = if dist > EPSILON { diff / dist } else { Vec2::Y };
    let penetration = radii - dist;

    // Midpoint of the overlapping segment along the normal
    let surface_a = a.center + normal * a.radius;
    let surface_b = b.center - normal * b.radius;

    Some(ContactInfo {
        normal,
        penetration,
        points: vec![(surface_a + surface_b) * 0.5],
    })
}

/// Circle-polygon test with the normal pointing from the circle to the polygon.
pub fn circle_polygon(circle: &Circle, polygon: &Polygon) -> Option<ContactInfo> {
    let center = circle.center;
    let radius = circle.radius;

    if polygon.contains(center) {
        // Center inside: push out through the nearest face
        let (face, separation) = polygon
            .normals()
            .iter()
            .zip(polygon.vertices())
            .map(|(n, v)| n.dot(center - *v))
            .enumerate()
            .fold((0, f32::MIN), |best, (i, s)| {
                if s > best.1 {
                    (i, s)
                } else {
                    best
                }
            });
        let face_normal = polygon.normals()[face];
        return Some(ContactInfo {
            normal: -face_normal,
            penetration: radius - separation,
            points: vec![center - face_normal * separation],
        });
    }

    let mut closest = polygon.vertices()[0];
    let mut best_dist_sq = f32::MAX;
    for edge in polygon.edges() {
        let p = edge.closest_point(center);
        let d = (center - p).length_squared();
        if d < best_dist_sq {
            best_dist_sq = d;
            closest = p;
        }
    }

    if best_dist_sq > radius * radius {
        return None;
    }

    let dist = best_dist_sq.sqrt();
    let normal = if dist > EPSILON {
        (closest - center) / dist
    } else {
        let toward = (polygon.centroid() - center).unit();
        if toward == Vec2::ZERO {
            Vec2::Y
        } else {
            toward
        }
    };

    Some(ContactInfo {
        normal,
        penetration: radius - dist,
        points: vec![closest],
    })
}

/// Minimum-overlap axis found by SAT.
#[derive(Debug, Clone, Copy)]
struct SatAxis {
    overlap: f32,
    /// Oriented from A to B.
    normal: Vec2,
    reference_is_a: bool,
}

/// Test every edge normal of both polygons, A's first.
///
/// Returns `None` on the first separating axis. Ties keep the earlier axis,
/// so A's faces win over B's and the normal does not flip between frames.
fn find_min_overlap_axis(a: &Polygon, b: &Polygon) -> Option<SatAxis> {
    let mut best: Option<SatAxis> = None;

    for (reference_is_a, owner) in [(true, a), (false, b)] {
        for axis in owner.normals() {
            if *axis == Vec2::ZERO {
                continue;
            }
            let (min_a, max_a) = a.project(*axis);
            let (min_b, max_b) = b.project(*axis);

            // B ahead of A along the axis, or behind it
            let forward = max_a - min_b;
            let backward = max_b - min_a;
            let overlap = forward.min(backward);
            if overlap < 0.0 {
                return None;
            }

            if best.map_or(true, |b| overlap < b.overlap) {
                best = Some(SatAxis {
                    overlap,
                    normal: if forward <= backward { *axis } else { -*axis },
                    reference_is_a,
                });
            }
        }
    }

    best
}

/// Polygon-polygon SAT with a clipped contact manifold of up to two points.
pub fn polygon_polygon(a: &Polygon, b: &Polygon) -> Option<ContactInfo> {
    let axis = find_min_overlap_axis(a, b)?;

    let (reference, incident, reference_dir) = if axis.reference_is_a {
        (a, b, axis.normal)
    } else {
        (b, a, -axis.normal)
    };

    let ref_index = most_aligned_face(reference, reference_dir);
    let inc_index = most_aligned_face(incident, -reference_dir);

    let points = clip_manifold(reference, ref_index, incident, inc_index);

    Some(ContactInfo {
        normal: axis.normal,
        penetration: axis.overlap,
        points,
    })
}

/// Face whose outward normal has the largest dot product with `direction`.
fn most_aligned_face(polygon: &Polygon, direction: Vec2) -> usize {
    let mut best = 0;
    let mut best_dot = f32::MIN;
    for (i, n) in polygon.normals().iter().enumerate() {
        let d = n.dot(direction);
        if d > best_dot {
            best_dot = d;
            best = i;
        }
    }
    best
}

/// Clip the incident face against the reference face and keep the points
/// lying behind the reference face.
fn clip_manifold(
    reference: &Polygon,
    ref_index: usize,
    incident: &Polygon,
    inc_index: usize,
) -> Vec<Vec2> {
    let ref_edge = reference.edge(ref_index);
    let ref_normal = reference.normals()[ref_index];
    let inc_edge = incident.edge(inc_index);

    let behind_reference =
        |p: &Vec2| ref_normal.dot(*p - ref_edge.start) <= MANIFOLD_TOLERANCE;

    let clipped = inc_edge.clip_to_segment(&ref_edge);
    let mut points = endpoints(&clipped)
        .into_iter()
        .filter(behind_reference)
        .collect::<Vec<_>>();

    if points.is_empty() {
        // The reference face may be the shorter one; use its span instead
        let clipped_ref = ref_edge.clip_to_segment(&inc_edge);
        points = endpoints(&clipped_ref)
            .into_iter()
            .filter(|p| incident.contains(*p))
            .collect();
    }

    if points.is_empty() {
        points.push(incident.support_point(-ref_normal));
    }

    points
}

/// Both endpoints, or one if the edge collapsed to a point.
fn endpoints(edge: &Edge) -> Vec<Vec2> {
    if edge.start.approx_eq(edge.end) {
        vec![edge.start]
    } else {
        vec![edge.start, edge.end]
    }
}
