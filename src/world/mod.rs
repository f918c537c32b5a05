//! The world facade tying entities, components, and systems together.

use tracing::trace;

use crate::component::{
    Component, ComponentError, ComponentId, Components,
};
use crate::entity::{
    Entities, EntitiesIter, Entity, EntityNotFound, OutOfEntities,
    MAX_ENTITIES,
};
use crate::signature::Signature;
use crate::system::{System, SystemHandle, Systems};


/// Owns the entity pool, component stores, and system registry of one
/// independent ECS world, and keeps them consistent.
///
/// All structural mutation goes through this facade: attaching or
/// detaching a component updates the entity's signature and re-dispatches
/// system membership in one call, so the three managers can never drift
/// apart. Operations taking an [`Entity`] validate it here and return
/// [`EntityNotFound`] for dead or foreign ids, keeping bad ids away from
/// the dense stores.
///
/// Worlds are self-contained; component ids assigned by one world are
/// meaningless in another.
///
/// A world expects to be mutated from a single thread, once per frame, in
/// the order input → gameplay → physics → render. Nothing here blocks or
/// defers; every operation runs to completion before returning. Sharing a
/// world across threads requires external synchronization.
pub struct World {
    entities: Entities,
    components: Components,
    systems: Systems,
}

impl World {
    /// Creates an empty world bounded by [`MAX_ENTITIES`] live entities.
    pub fn new() -> Self {
        Self::with_capacity(MAX_ENTITIES)
    }

    /// Creates an empty world bounded by `capacity` live entities.
    pub fn with_capacity(capacity: u32) -> Self {
        let entities = Entities::new(capacity);
        let components = Components::new();
        let systems = Systems::new();

        Self { entities, components, systems }
    }

    /// Returns the count of live entities in this world.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if this world contains no entities.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Returns the maximum count of simultaneously live entities.
    pub fn capacity(&self) -> u32 {
        self.entities.capacity()
    }

    /// Returns `true` if this world contains the entity.
    pub fn contains(&self, entity: Entity) -> bool {
        self.entities.contains(entity)
    }

    /// Returns an iterator over the live entities in this world.
    pub fn iter(&self) -> EntitiesIter<'_> {
        self.entities.iter()
    }

    /// Creates a new entity with no components.
    ///
    /// Ids of destroyed entities are reused, most recently destroyed
    /// first. Exhaustion of the pool is recoverable: callers under a
    /// spawn-heavy load may catch [`OutOfEntities`] and shed load instead
    /// of crashing.
    pub fn spawn(&mut self) -> Result<Entity, OutOfEntities> {
        let entity = self.entities.create()?;

        trace!(entity = entity.id(), "spawned");

        Ok(entity)
    }

    /// Destroys an entity and everything attached to it.
    ///
    /// The entity is freed first, then its components are detached from
    /// every store, then every system drops it from its membership set
    /// (firing `on_entity_removed` for members). Nothing dangling survives
    /// the call, so the id may be safely reused afterwards.
    pub fn despawn(&mut self, entity: Entity) -> Result<(), EntityNotFound> {
        if !self.entities.destroy(entity) {
            return Err(EntityNotFound(entity));
        }

        self.components.free(entity);
        self.systems.free(entity);

        trace!(entity = entity.id(), "despawned");

        Ok(())
    }

    /// Registers `T` as a component kind and returns its id.
    ///
    /// # Panics
    ///
    /// Panics if `T` is already registered or the kind cap is reached.
    pub fn register_component<T: Component>(&mut self) -> ComponentId {
        self.components.register::<T>()
    }

    /// Returns the id of component kind `T`.
    ///
    /// # Panics
    ///
    /// Panics if `T` was never registered.
    pub fn component_id<T: Component>(&self) -> ComponentId {
        self.components.id_of::<T>()
    }

    /// Attaches a component to an entity.
    ///
    /// The value is stored first; only once that succeeded is the
    /// entity's signature bit set and membership re-dispatched, so a
    /// failed store can never leave a signature claiming data that isn't
    /// there.
    ///
    /// # Panics
    ///
    /// Panics if `T` is unregistered or the entity already has a `T`.
    pub fn insert<T: Component>(
        &mut self,
        entity: Entity,
        value: T,
    ) -> Result<(), EntityNotFound> {
        if !self.entities.contains(entity) {
            return Err(EntityNotFound(entity));
        }

        self.components.insert(entity, value);

        let id = self.components.id_of::<T>();
        let signature = self
            .entities
            .signature(entity)
            .unwrap_or_else(|| unreachable!())
            .with(id);

        self.entities.assign_signature(entity, signature);
        self.systems.signature_changed(entity, signature);

        Ok(())
    }

    /// Detaches a component from an entity, returning it.
    ///
    /// Mirrors [`insert`](World::insert): the value is removed from its
    /// store first, then the signature bit is cleared and membership
    /// re-dispatched.
    ///
    /// # Panics
    ///
    /// Panics if `T` is unregistered or the entity has no `T`.
    pub fn remove<T: Component>(
        &mut self,
        entity: Entity,
    ) -> Result<T, EntityNotFound> {
        if !self.entities.contains(entity) {
            return Err(EntityNotFound(entity));
        }

        let value = self.components.remove::<T>(entity);

        let id = self.components.id_of::<T>();
        let mut signature = self
            .entities
            .signature(entity)
            .unwrap_or_else(|| unreachable!());

        signature.clear(id);

        self.entities.assign_signature(entity, signature);
        self.systems.signature_changed(entity, signature);

        Ok(value)
    }

    /// Returns a reference to the `T` of an entity.
    ///
    /// Missing components are an error, not a panic: systems routinely
    /// probe entities for optional attachments.
    ///
    /// # Panics
    ///
    /// Panics if `T` was never registered.
    pub fn get<T: Component>(
        &self,
        entity: Entity,
    ) -> Result<&T, ComponentError> {
        if !self.entities.contains(entity) {
            return Err(EntityNotFound(entity).into());
        }

        self.components.get(entity)
    }

    /// Returns a mutable reference to the `T` of an entity.
    ///
    /// # Panics
    ///
    /// Panics if `T` was never registered.
    pub fn get_mut<T: Component>(
        &mut self,
        entity: Entity,
    ) -> Result<&mut T, ComponentError> {
        if !self.entities.contains(entity) {
            return Err(EntityNotFound(entity).into());
        }

        self.components.get_mut(entity)
    }

    /// Returns `true` if the entity has a `T` attached.
    ///
    /// Tests the signature bit only; component storage is untouched.
    ///
    /// # Panics
    ///
    /// Panics if `T` was never registered.
    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        let id = self.components.id_of::<T>();

        self.entities
            .signature(entity)
            .is_some_and(|signature| signature.test(id))
    }

    /// Returns the signature of an entity, or `None` if it isn't live.
    pub fn signature(&self, entity: Entity) -> Option<Signature> {
        self.entities.signature(entity)
    }

    /// Registers a system with the signature it requires of its members.
    ///
    /// The registry owns the instance; the returned handle (and any
    /// clone of it) is how callers reach it afterwards.
    ///
    /// # Panics
    ///
    /// Panics if a system of type `S` is already registered.
    pub fn register_system<S: System>(
        &mut self,
        system: S,
        signature: Signature,
    ) -> SystemHandle<S> {
        self.systems.register(system, signature)
    }

    /// Returns a handle to the registered system of type `S`.
    ///
    /// # Panics
    ///
    /// Panics if no system of type `S` is registered.
    pub fn system<S: System>(&self) -> SystemHandle<S> {
        self.systems.get::<S>()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
