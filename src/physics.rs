//! Keeping physics bodies in lockstep with the entities they back.
//!
//! The dynamics engine itself is a black box behind [`PhysicsBackend`]:
//! this module only decides *when* bodies exist and ferries data across
//! the boundary — component data in at creation, poses back out after
//! every step.

use tracing::warn;

use crate::components::{CollisionShape, RigidBody, Transform};
use crate::entity::Entity;
use crate::math::{Quat, Vec3};
use crate::storage::{EntityMap, EntitySet};
use crate::system::System;
use crate::world::World;

/// An opaque handle to a body owned by the physics backend.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle(pub u64);

/// Everything the backend needs to build a body.
#[derive(Debug, Clone, Copy)]
pub struct BodyDesc {
    pub position: Vec3,
    pub rotation: Quat,
    pub shape: CollisionShape,
    /// Zero mass requests a static body.
    pub mass: f32,
    pub friction: f32,
    pub restitution: f32,
}

/// The narrow interface a dynamics engine is consumed through.
pub trait PhysicsBackend: Send + Sync {
    /// Creates a body and returns the handle to address it by.
    fn create_body(&mut self, desc: &BodyDesc) -> BodyHandle;

    /// Destroys a body. The handle is dead afterwards.
    fn destroy_body(&mut self, body: BodyHandle);

    /// Applies a force to a body for the next step.
    fn apply_force(&mut self, body: BodyHandle, force: Vec3);

    /// Advances the simulation.
    fn step(&mut self, delta_time: f32);

    /// Reads back a body's position and orientation.
    fn body_pose(&self, body: BodyHandle) -> (Vec3, Quat);
}

/// Owns the entity ↔ body mapping and drives the backend once per frame.
///
/// Registered over entities with [`Transform`], [`RigidBody`], and
/// [`CollisionShape`]. A body cannot be built inside the membership hook
/// (the component data lives in the world, which is mid-mutation while
/// hooks run), so newly added entities are queued and their bodies built
/// at the start of the next [`update`](PhysicsSystem::update). Teardown
/// needs no component data, so departures destroy the body immediately.
pub struct PhysicsSystem {
    entities: EntitySet,
    backend: Box<dyn PhysicsBackend>,
    bodies: EntityMap<BodyHandle>,
    /// Members whose bodies haven't been built yet.
    pending: Vec<Entity>,
}

impl PhysicsSystem {
    pub fn new(backend: Box<dyn PhysicsBackend>) -> Self {
        let entities = EntitySet::new();
        let bodies = EntityMap::new();
        let pending = Vec::new();

        Self { entities, backend, bodies, pending }
    }

    /// Returns the body backing an entity, if one has been built.
    pub fn body_of(&self, entity: Entity) -> Option<BodyHandle> {
        self.bodies.get(entity).copied()
    }

    /// Builds missing bodies, applies accumulated forces, steps the
    /// backend, and writes resulting poses back into the transforms.
    pub fn update(&mut self, world: &mut World, delta_time: f32) {
        self.flush_pending(world);

        for (entity, &body) in &self.bodies {
            let Ok(rigid_body) = world.get_mut::<RigidBody>(entity) else {
                continue;
            };

            if rigid_body.force != Vec3::ZERO {
                self.backend.apply_force(body, rigid_body.force);
                rigid_body.force = Vec3::ZERO;
            }
        }

        self.backend.step(delta_time);

        for (entity, &body) in &self.bodies {
            let (position, rotation) = self.backend.body_pose(body);

            if let Ok(transform) = world.get_mut::<Transform>(entity) {
                transform.position = position;
                transform.rotation = rotation;
            }
        }
    }

    fn flush_pending(&mut self, world: &World) {
        for entity in self.pending.drain(..) {
            // left again before its body was ever built
            if !self.entities.contains(entity) {
                continue;
            }

            if self.bodies.contains(entity) {
                continue;
            }

            let (Ok(transform), Ok(rigid_body), Ok(shape)) = (
                world.get::<Transform>(entity),
                world.get::<RigidBody>(entity),
                world.get::<CollisionShape>(entity),
            ) else {
                warn!(
                    entity = entity.id(),
                    "member entity is missing physics components",
                );
                continue;
            };

            let desc = BodyDesc {
                position: transform.position,
                rotation: transform.rotation,
                shape: *shape,
                mass: rigid_body.mass,
                friction: rigid_body.friction,
                restitution: rigid_body.restitution,
            };

            let body = self.backend.create_body(&desc);

            self.bodies.insert(entity, body);
        }
    }
}

impl System for PhysicsSystem {
    fn entities(&self) -> &EntitySet {
        &self.entities
    }

    fn entities_mut(&mut self) -> &mut EntitySet {
        &mut self.entities
    }

    fn on_entity_added(&mut self, entity: Entity) {
        self.pending.push(entity);
    }

    fn on_entity_removed(&mut self, entity: Entity) {
        if let Some(body) = self.bodies.remove(entity) {
            self.backend.destroy_body(body);
        }
    }
}
