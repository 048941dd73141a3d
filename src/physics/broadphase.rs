//! Broadphase collision detection using a 2D spatial hash grid.

use std::collections::{HashMap, HashSet};

use glam::Vec2;

use crate::ecs::components::physics::{Collider, CollisionLayers, RigidBody, RigidBodyType};
use crate::ecs::components::transform::Transform;

use super::collider::Aabb;

type CellKey = (i32, i32);

#[derive(Debug, Clone, Copy)]
struct CellEntry {
    entity: hecs::Entity,
    aabb: Aabb,
    /// Neither collisions nor its own velocity can move it.
    is_static: bool,
    is_trigger: bool,
    layers: CollisionLayers,
}

/// A candidate pair whose bounding boxes overlap. `entity_a < entity_b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BroadPhasePair {
    pub entity_a: hecs::Entity,
    pub entity_b: hecs::Entity,
    /// Either side is a trigger collider.
    pub is_trigger: bool,
}

/// Spatial hash grid broadphase for O(n) average-case pair detection.
pub struct SpatialHashGrid {
    cell_size: f32,
    cells: HashMap<CellKey, Vec<CellEntry>>,
}

impl Default for SpatialHashGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl SpatialHashGrid {
    pub fn new() -> Self {
        Self {
            cell_size: 2.0,
            cells: HashMap::new(),
        }
    }

    /// Cell size chosen by the last [`find_pairs`](Self::find_pairs) call.
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    #[inline]
    fn cell_coords(&self, point: Vec2) -> CellKey {
        let inv = 1.0 / self.cell_size;
        ((point.x * inv).floor() as i32, (point.y * inv).floor() as i32)
    }

    /// Find all pairs of colliders whose world AABBs overlap.
    ///
    /// Static-static pairs and pairs filtered out by [`CollisionLayers`] are
    /// skipped. A collider without a [`RigidBody`] counts as static. The
    /// result is sorted so the solver sees pairs in a stable order.
    pub fn find_pairs(&mut self, world: &hecs::World) -> Vec<BroadPhasePair> {
        self.cells.clear();

        let mut entries: Vec<CellEntry> = Vec::new();
        let mut max_extent: f32 = 0.0;

        for (entity, (collider, transform, rb, layers)) in world
            .query::<(
                &Collider,
                &Transform,
                Option<&RigidBody>,
                Option<&CollisionLayers>,
            )>()
            .iter()
        {
            let aabb = collider.min_bounds(transform);
            if !(aabb.min.is_finite() && aabb.max.is_finite()) {
                // Left for the narrowphase to report
                tracing::trace!(?entity, "collider has non-finite bounds");
            }

            let extent = aabb.extents().max_element();
            if extent.is_finite() && extent > max_extent {
                max_extent = extent;
            }

            entries.push(CellEntry {
                entity,
                aabb,
                is_static: rb.map_or(true, |rb| {
                    rb.body_type != RigidBodyType::Kinematic && rb.is_static()
                }),
                is_trigger: collider.is_trigger,
                layers: layers.copied().unwrap_or_default(),
            });
        }

        // Set cell size to 2x the max AABB extent (minimum 1.0)
        self.cell_size = (max_extent * 2.0).max(1.0);

        for entry in &entries {
            let (min_cell, max_cell) = if entry.aabb.min.is_finite() && entry.aabb.max.is_finite() {
                (self.cell_coords(entry.aabb.min), self.cell_coords(entry.aabb.max))
            } else {
                // Non-finite boxes land in a single cell so the pair still surfaces
                ((0, 0), (0, 0))
            };

            for cx in min_cell.0..=max_cell.0 {
                for cy in min_cell.1..=max_cell.1 {
                    self.cells.entry((cx, cy)).or_default().push(*entry);
                }
            }
        }

        let mut pairs = Vec::with_capacity(entries.len() * 2);
        let mut seen = HashSet::new();

        for cell in self.cells.values() {
            for i in 0..cell.len() {
                for j in (i + 1)..cell.len() {
                    let a = &cell[i];
                    let b = &cell[j];

                    if a.is_static && b.is_static {
                        continue;
                    }
                    if !a.layers.interacts_with(&b.layers) {
                        continue;
                    }

                    // Canonical ordering to avoid duplicates
                    let (first, second) = if a.entity < b.entity { (a, b) } else { (b, a) };
                    if seen.contains(&(first.entity, second.entity)) {
                        continue;
                    }

                    let finite = first.aabb.min.is_finite()
                        && first.aabb.max.is_finite()
                        && second.aabb.min.is_finite()
                        && second.aabb.max.is_finite();
                    if !finite || first.aabb.overlaps(&second.aabb) {
                        seen.insert((first.entity, second.entity));
                        pairs.push(BroadPhasePair {
                            entity_a: first.entity,
                            entity_b: second.entity,
                            is_trigger: first.is_trigger || second.is_trigger,
                        });
                    }
                }
            }
        }

        pairs.sort();
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::shape::{Circle, Polygon};

    fn ball(world: &mut hecs::World, position: Vec2, radius: f32) -> hecs::Entity {
        world.spawn((
            Transform::from_position(position),
            RigidBody::new_dynamic(1.0),
            Collider::new(Circle::new(Vec2::ZERO, radius).unwrap()),
        ))
    }

    #[test]
    fn test_broadphase_overlapping() {
        let mut world = hecs::World::new();
        let a = ball(&mut world, Vec2::ZERO, 1.0);
        let b = ball(&mut world, Vec2::new(1.0, 0.0), 1.0);

        let mut broadphase = SpatialHashGrid::new();
        let pairs = broadphase.find_pairs(&world);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].entity_a, a.min(b));
        assert_eq!(pairs[0].entity_b, a.max(b));
        assert!(!pairs[0].is_trigger);
    }

    #[test]
    fn test_broadphase_no_overlap() {
        let mut world = hecs::World::new();
        ball(&mut world, Vec2::ZERO, 0.5);
        ball(&mut world, Vec2::new(10.0, 0.0), 0.5);

        let mut broadphase = SpatialHashGrid::new();
        assert!(broadphase.find_pairs(&world).is_empty());
    }

    #[test]
    fn test_broadphase_static_static_skipped() {
        let mut world = hecs::World::new();
        let square = || Collider::new(Polygon::rectangle(Vec2::ZERO, Vec2::splat(2.0)).unwrap());

        world.spawn((Transform::identity(), RigidBody::new_static(), square()));
        // no rigid body: also static
        world.spawn((Transform::identity(), square()));

        let mut broadphase = SpatialHashGrid::new();
        assert!(broadphase.find_pairs(&world).is_empty());
    }

    #[test]
    fn test_broadphase_reports_triggers() {
        let mut world = hecs::World::new();
        ball(&mut world, Vec2::ZERO, 1.0);
        world.spawn((
            Transform::from_position(Vec2::new(0.5, 0.0)),
            Collider::trigger(Circle::new(Vec2::ZERO, 1.0).unwrap()),
        ));

        let mut broadphase = SpatialHashGrid::new();
        let pairs = broadphase.find_pairs(&world);
        assert_eq!(pairs.len(), 1);
        assert!(pairs[0].is_trigger);
    }

    #[test]
    fn test_broadphase_kinematic_meets_static() {
        let mut world = hecs::World::new();
        let mover = world.spawn((
            Transform::identity(),
            RigidBody::new_kinematic().with_velocity(Vec2::new(6.0, 0.0)),
            Collider::new(Circle::new(Vec2::ZERO, 0.5).unwrap()),
        ));
        let zone = world.spawn((
            Transform::from_position(Vec2::new(0.5, 0.0)),
            Collider::trigger(Circle::new(Vec2::ZERO, 0.5).unwrap()),
        ));

        let mut broadphase = SpatialHashGrid::new();
        let pairs = broadphase.find_pairs(&world);
        assert_eq!(pairs.len(), 1);
        assert_eq!((pairs[0].entity_a, pairs[0].entity_b), (mover.min(zone), mover.max(zone)));
        assert!(pairs[0].is_trigger);

        world.spawn((
            Transform::from_position(Vec2::new(-0.5, 0.0)),
            RigidBody::new_static(),
            Collider::new(Circle::new(Vec2::ZERO, 0.5).unwrap()),
        ));
        // the wall pairs with the mover but not with the bodyless zone
        assert_eq!(broadphase.find_pairs(&world).len(), 2);
    }

    #[test]
    fn test_broadphase_layer_filtering() {
        let mut world = hecs::World::new();
        let a = ball(&mut world, Vec2::ZERO, 1.0);
        let b = ball(&mut world, Vec2::new(0.5, 0.0), 1.0);
        world.insert_one(a, CollisionLayers::new(0b01, 0b01)).unwrap();
        world.insert_one(b, CollisionLayers::new(0b10, 0b10)).unwrap();

        let mut broadphase = SpatialHashGrid::new();
        assert!(broadphase.find_pairs(&world).is_empty());

        world.insert_one(b, CollisionLayers::new(0b11, 0b11)).unwrap();
        assert_eq!(broadphase.find_pairs(&world).len(), 1);
    }

    #[test]
    fn test_broadphase_sorted_and_deduplicated() {
        let mut world = hecs::World::new();
        // A wide body spanning many cells overlapping several small ones
        world.spawn((
            Transform::identity(),
            RigidBody::new_static(),
            Collider::new(Polygon::rectangle(Vec2::ZERO, Vec2::new(40.0, 1.0)).unwrap()),
        ));
        for i in 0..8 {
            ball(&mut world, Vec2::new(-15.0 + 4.0 * i as f32, 0.8), 0.5);
        }

        let mut broadphase = SpatialHashGrid::new();
        let pairs = broadphase.find_pairs(&world);
        assert_eq!(pairs.len(), 8);
        let mut sorted = pairs.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(pairs, sorted);
        assert!((broadphase.cell_size() - 80.0).abs() < 1e-3);
    }
}
