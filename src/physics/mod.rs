//! 2D rigid body simulation and collision detection.
//!
//! # Architecture
//!
//! The physics pipeline runs in a fixed timestep loop:
//!
//! 1. Apply forces (gravity) and integrate velocities
//! 2. Broadphase collision detection (spatial hash over AABBs)
//! 3. Narrowphase collision detection (circle tests, SAT, clipped manifolds)
//! 4. Resolve contacts (impulses, then positional correction)
//! 5. Integrate positions and clear force accumulators
//! 6. Diff contacts into collision events and run callbacks
//!
//! Structural changes requested by callbacks go through a
//! [`hecs::CommandBuffer`] applied once the tick is over.

pub mod broadphase;
pub mod collider;
pub mod contact;
pub mod events;
pub mod narrowphase;
pub mod rigid_body;
pub mod shape;
pub mod solver;

use std::collections::{HashMap, HashSet};

use glam::Vec2;

use crate::ecs::components::physics::{Collider, PhysicsMaterial, RigidBody};
use crate::ecs::components::transform::Transform;
use crate::error::PhysicsError;
use crate::math::Vec2Ext;

use self::broadphase::{BroadPhasePair, SpatialHashGrid};
use self::contact::ContactManifold;
use self::events::{Collision, CollisionEvent, ContactTracker};
use self::narrowphase::detect_collision;
use self::shape::Edge;

/// Configuration for the physics simulation.
#[derive(Debug, Clone)]
pub struct PhysicsConfig {
    /// Gravity vector. Default: (0, -9.81).
    pub gravity: Vec2,
    /// Fixed timestep for physics updates in seconds. Default: 1/60.
    pub fixed_timestep: f64,
    /// Maximum number of sub-steps per frame. Default: 4.
    pub max_substeps: u32,
    /// Number of contact solver iterations. Default: 8.
    pub solver_iterations: u32,
    /// Fraction of excess penetration removed per tick. Default: 0.2.
    pub position_correction: f32,
    /// Penetration left alone by positional correction. Default: 0.01.
    pub penetration_slop: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, -9.81),
            fixed_timestep: 1.0 / 60.0,
            max_substeps: 4,
            solver_iterations: 8,
            position_correction: 0.2,
            penetration_slop: 0.01,
        }
    }
}

/// Where the world is inside a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepPhase {
    Idle,
    SteppingForces,
    BroadPhase,
    NarrowPhase,
    Resolving,
    IntegratingPositions,
    DispatchingCallbacks,
}

/// Callback run for every collision event an entity takes part in.
pub type CollisionCallback = Box<dyn FnMut(&Collision, &mut hecs::CommandBuffer) + Send + Sync>;

/// Closest collider hit by [`PhysicsWorld::raycast`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    pub entity: hecs::Entity,
    /// Distance from the ray origin.
    pub distance: f32,
    pub point: Vec2,
    pub normal: Vec2,
}

/// The main physics world: owns the entities and steps them.
pub struct PhysicsWorld {
    config: PhysicsConfig,
    world: hecs::World,
    accumulator: f64,
    broadphase: SpatialHashGrid,
    contacts: Vec<ContactManifold>,
    tracker: ContactTracker,
    events: Vec<CollisionEvent>,
    callbacks: HashMap<hecs::Entity, Vec<CollisionCallback>>,
    warned_bodyless: HashSet<hecs::Entity>,
    phase: StepPhase,
    ticks: u64,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}

impl PhysicsWorld {
    /// Create a new physics world with the given configuration.
    pub fn new(config: PhysicsConfig) -> Self {
        Self {
            config,
            world: hecs::World::new(),
            accumulator: 0.0,
            broadphase: SpatialHashGrid::new(),
            contacts: Vec::new(),
            tracker: ContactTracker::new(),
            events: Vec::new(),
            callbacks: HashMap::new(),
            warned_bodyless: HashSet::new(),
            phase: StepPhase::Idle,
            ticks: 0,
        }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn world(&self) -> &hecs::World {
        &self.world
    }

    /// Direct access to the entities. Edits take effect on the next tick.
    pub fn world_mut(&mut self) -> &mut hecs::World {
        &mut self.world
    }

    pub fn spawn(&mut self, components: impl hecs::DynamicBundle) -> hecs::Entity {
        self.world.spawn(components)
    }

    /// Remove an entity between ticks. Pairs it was part of get an Exit
    /// event on the next tick.
    pub fn despawn(&mut self, entity: hecs::Entity) -> Result<(), PhysicsError> {
        self.world.despawn(entity)?;
        self.callbacks.remove(&entity);
        self.warned_bodyless.remove(&entity);
        Ok(())
    }

    pub fn gravity(&self) -> Vec2 {
        self.config.gravity
    }

    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.config.gravity = gravity;
    }

    pub fn phase(&self) -> StepPhase {
        self.phase
    }

    /// Fixed ticks run since creation.
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    /// Manifolds found during the last tick, triggers included.
    pub fn contacts(&self) -> &[ContactManifold] {
        &self.contacts
    }

    /// All events produced since the previous drain, in tick order.
    pub fn drain_events(&mut self) -> Vec<CollisionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Register a callback for collision and trigger events involving `entity`.
    ///
    /// The callback may queue structural edits on the command buffer; they
    /// are applied after the tick.
    pub fn add_collision_callback<F>(&mut self, entity: hecs::Entity, callback: F)
    where
        F: FnMut(&Collision, &mut hecs::CommandBuffer) + Send + Sync + 'static,
    {
        self.callbacks
            .entry(entity)
            .or_default()
            .push(Box::new(callback));
    }

    pub fn remove_collision_callbacks(&mut self, entity: hecs::Entity) {
        self.callbacks.remove(&entity);
    }

    /// Step the simulation forward by `delta_time` seconds.
    ///
    /// Uses a fixed timestep accumulator; returns the number of ticks run.
    pub fn step(&mut self, delta_time: f64) -> u32 {
        if !delta_time.is_finite() || delta_time < 0.0 {
            tracing::warn!(delta_time, "ignoring invalid frame time");
            return 0;
        }
        self.accumulator += delta_time;

        let mut substeps = 0u32;
        while self.accumulator >= self.config.fixed_timestep && substeps < self.config.max_substeps
        {
            self.tick();
            self.accumulator -= self.config.fixed_timestep;
            substeps += 1;
        }

        // Clamp accumulator to avoid spiral of death
        if self.accumulator > self.config.fixed_timestep * self.config.max_substeps as f64 {
            tracing::warn!(
                dropped = self.accumulator,
                "physics falling behind, dropping accumulated time"
            );
            self.accumulator = 0.0;
        }

        substeps
    }

    /// Run exactly one fixed step.
    pub fn tick(&mut self) {
        let dt = self.config.fixed_timestep as f32;

        self.phase = StepPhase::SteppingForces;
        rigid_body::apply_gravity(&mut self.world, self.config.gravity);
        rigid_body::integrate_velocities(&mut self.world, dt);

        self.phase = StepPhase::BroadPhase;
        self.warn_bodyless_colliders();
        let pairs = self.broadphase.find_pairs(&self.world);

        self.phase = StepPhase::NarrowPhase;
        self.contacts.clear();
        for pair in &pairs {
            match collide_pair(&self.world, pair) {
                Ok(Some(manifold)) => self.contacts.push(manifold),
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(
                        entity_a = ?pair.entity_a,
                        entity_b = ?pair.entity_b,
                        error = %err,
                        "skipping collision pair"
                    );
                }
            }
        }

        self.phase = StepPhase::Resolving;
        solver::solve_contacts(
            &mut self.contacts,
            &mut self.world,
            self.config.solver_iterations,
        );
        solver::correct_positions(
            &self.contacts,
            &mut self.world,
            self.config.position_correction,
            self.config.penetration_slop,
        );

        self.phase = StepPhase::IntegratingPositions;
        rigid_body::integrate_positions(&mut self.world, dt);
        rigid_body::clear_forces(&mut self.world);

        self.phase = StepPhase::DispatchingCallbacks;
        let events = self.tracker.update(&self.contacts);
        let mut commands = hecs::CommandBuffer::new();
        for event in &events {
            for view in event.views() {
                if let Some(callbacks) = self.callbacks.get_mut(&view.this) {
                    for callback in callbacks.iter_mut() {
                        callback(&view, &mut commands);
                    }
                }
            }
        }
        self.events.extend(events);

        // Deferred edits from callbacks
        commands.run_on(&mut self.world);
        let world = &self.world;
        self.callbacks.retain(|entity, _| world.contains(*entity));
        self.warned_bodyless.retain(|entity| world.contains(*entity));

        self.ticks += 1;
        tracing::trace!(
            tick = self.ticks,
            pairs = pairs.len(),
            contacts = self.contacts.len(),
            "physics tick"
        );
        self.phase = StepPhase::Idle;
    }

    fn warn_bodyless_colliders(&mut self) {
        for (entity, (_, rb)) in self
            .world
            .query::<(&Collider, Option<&RigidBody>)>()
            .iter()
        {
            if rb.is_none() && self.warned_bodyless.insert(entity) {
                tracing::warn!(?entity, "collider has no rigid body, treating it as static");
            }
        }
    }

    /// Entities whose collider contains `point`, in entity order.
    pub fn query_point(&self, point: Vec2) -> Vec<hecs::Entity> {
        let mut hits: Vec<hecs::Entity> = self
            .world
            .query::<(&Collider, &Transform)>()
            .iter()
            .filter(|(_, (collider, transform))| collider.contains(transform, point))
            .map(|(entity, _)| entity)
            .collect();
        hits.sort();
        hits
    }

    /// Closest collider along a ray. Rays starting inside a shape hit it at
    /// distance zero.
    pub fn raycast(&self, origin: Vec2, direction: Vec2, max_distance: f32) -> Option<RaycastHit> {
        let dir = direction.unit();
        if dir == Vec2::ZERO || !(max_distance > 0.0) {
            return None;
        }
        let ray = Edge::new(origin, origin + dir * max_distance);

        let mut best: Option<RaycastHit> = None;
        for (entity, (collider, transform)) in self.world.query::<(&Collider, &Transform)>().iter() {
            let shape = collider.transform_to_world(transform);
            let Some(hit) = shape.ray_intersection(&ray) else {
                continue;
            };
            let distance = hit.toi * max_distance;
            let closer = best.map_or(true, |b| {
                distance < b.distance || (distance == b.distance && entity < b.entity)
            });
            if closer {
                best = Some(RaycastHit {
                    entity,
                    distance,
                    point: hit.point,
                    normal: hit.normal,
                });
            }
        }
        best
    }

    /// Accumulate a force on `entity`'s body for the next tick.
    pub fn apply_force(&mut self, entity: hecs::Entity, force: Vec2) -> Result<(), PhysicsError> {
        self.world.get::<&mut RigidBody>(entity)?.apply_force(force);
        Ok(())
    }

    pub fn apply_torque(&mut self, entity: hecs::Entity, torque: f32) -> Result<(), PhysicsError> {
        self.world.get::<&mut RigidBody>(entity)?.apply_torque(torque);
        Ok(())
    }

    /// Change `entity`'s velocity immediately.
    pub fn apply_impulse(&mut self, entity: hecs::Entity, impulse: Vec2) -> Result<(), PhysicsError> {
        self.world.get::<&mut RigidBody>(entity)?.apply_impulse(impulse);
        Ok(())
    }

    pub fn apply_angular_impulse(
        &mut self,
        entity: hecs::Entity,
        impulse: f32,
    ) -> Result<(), PhysicsError> {
        self.world
            .get::<&mut RigidBody>(entity)?
            .apply_angular_impulse(impulse);
        Ok(())
    }
}

/// Narrowphase for one broadphase pair, with materials combined.
fn collide_pair(
    world: &hecs::World,
    pair: &BroadPhasePair,
) -> Result<Option<ContactManifold>, PhysicsError> {
    let collider_a = world.get::<&Collider>(pair.entity_a)?;
    let collider_b = world.get::<&Collider>(pair.entity_b)?;
    let transform_a = world.get::<&Transform>(pair.entity_a)?;
    let transform_b = world.get::<&Transform>(pair.entity_b)?;

    let shape_a = collider_a.transform_to_world(&transform_a);
    let shape_b = collider_b.transform_to_world(&transform_b);

    let Some(info) = detect_collision(&shape_a, &shape_b)? else {
        return Ok(None);
    };

    let (restitution, friction) = PhysicsMaterial::combine(&collider_a.material, &collider_b.material);
    Ok(Some(ContactManifold::new(
        pair.entity_a,
        pair.entity_b,
        info,
        restitution,
        friction,
        pair.is_trigger,
    )))
}
