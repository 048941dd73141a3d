//! Collision and trigger events derived from contact changes between ticks.

use std::collections::BTreeMap;

use super::contact::ContactManifold;

/// Lifecycle of a touching pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionPhase {
    /// First tick the pair touches.
    Enter,
    /// The pair touched last tick and still does.
    Stay,
    /// The pair touched last tick and no longer does, or one side was despawned.
    Exit,
}

/// A change in contact state between two entities. `entity_a < entity_b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionEvent {
    pub entity_a: hecs::Entity,
    pub entity_b: hecs::Entity,
    pub phase: CollisionPhase,
    /// Either collider is a trigger.
    pub is_trigger: bool,
}

impl CollisionEvent {
    pub fn involves(&self, entity: hecs::Entity) -> bool {
        self.entity_a == entity || self.entity_b == entity
    }

    /// The event as seen from `entity`, if it takes part.
    pub fn for_entity(&self, entity: hecs::Entity) -> Option<Collision> {
        let other = if entity == self.entity_a {
            self.entity_b
        } else if entity == self.entity_b {
            self.entity_a
        } else {
            return None;
        };
        Some(Collision {
            this: entity,
            other,
            phase: self.phase,
            is_trigger: self.is_trigger,
        })
    }

    /// One view per participant, A's first.
    pub fn views(&self) -> [Collision; 2] {
        [
            Collision {
                this: self.entity_a,
                other: self.entity_b,
                phase: self.phase,
                is_trigger: self.is_trigger,
            },
            Collision {
                this: self.entity_b,
                other: self.entity_a,
                phase: self.phase,
                is_trigger: self.is_trigger,
            },
        ]
    }
}

/// Per-entity view handed to collision callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collision {
    /// The entity the callback is registered on.
    pub this: hecs::Entity,
    pub other: hecs::Entity,
    pub phase: CollisionPhase,
    pub is_trigger: bool,
}

/// Remembers which pairs touched last tick.
#[derive(Debug, Default)]
pub struct ContactTracker {
    touching: BTreeMap<(hecs::Entity, hecs::Entity), bool>,
}

impl ContactTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Diff this tick's manifolds against the previous tick.
    ///
    /// Enter and Stay events come in pair order, followed by Exit events in
    /// pair order.
    pub fn update(&mut self, manifolds: &[ContactManifold]) -> Vec<CollisionEvent> {
        let mut current = BTreeMap::new();
        for m in manifolds {
            let key = if m.entity_a < m.entity_b {
                (m.entity_a, m.entity_b)
            } else {
                (m.entity_b, m.entity_a)
            };
            current.insert(key, m.is_trigger);
        }

        let mut events = Vec::with_capacity(current.len());
        for (&(entity_a, entity_b), &is_trigger) in &current {
            let phase = if self.touching.contains_key(&(entity_a, entity_b)) {
                CollisionPhase::Stay
            } else {
                CollisionPhase::Enter
            };
            events.push(CollisionEvent {
                entity_a,
                entity_b,
                phase,
                is_trigger,
            });
        }

        for (&(entity_a, entity_b), &is_trigger) in &self.touching {
            if !current.contains_key(&(entity_a, entity_b)) {
                events.push(CollisionEvent {
                    entity_a,
                    entity_b,
                    phase: CollisionPhase::Exit,
                    is_trigger,
                });
            }
        }

        self.touching = current;
        events
    }

    pub fn is_touching(&self, a: hecs::Entity, b: hecs::Entity) -> bool {
        let key = if a < b { (a, b) } else { (b, a) };
        self.touching.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.touching.len()
    }

    pub fn is_empty(&self) -> bool {
        self.touching.is_empty()
    }

    pub fn clear(&mut self) {
        self.touching.clear();
    }
}
