//! Entities, the individual objects in the world, and their allocator.

use thiserror::Error;

use crate::signature::Signature;

/// Default capacity of an entity pool.
///
/// A [`World`](crate::world::World) created with
/// [`World::new`](crate::world::World::new) holds at most this many live
/// entities at once. Use
/// [`World::with_capacity`](crate::world::World::with_capacity) to pick a
/// different bound.
pub const MAX_ENTITIES: u32 = 5000;

/// An identifier for an entity in the world.
///
/// Entities carry no state of their own; they only index into component
/// stores and system membership sets. Ids are recycled: destroying an
/// entity returns its id to a free pool, and the most recently freed id is
/// handed out again first.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Entity(pub(crate) u32);

/// An error for when an entity pool has no free ids left.
#[derive(Debug, Clone, Copy, Error)]
#[error("entity pool exhausted: all {0} ids are live")]
pub struct OutOfEntities(pub u32);

/// An error for when a requested entity was not found in the world.
#[derive(Debug, Clone, Copy, Error)]
#[error("entity not found: {0:?}")]
pub struct EntityNotFound(pub Entity);

impl Entity {
    /// Returns the raw id of this entity.
    pub const fn id(self) -> u32 {
        self.0
    }

    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Allocates the entities of a [`World`](crate::world::World) and stores
/// their signatures.
///
/// Methods taking an [`Entity`] are bounds-checked and report stale or
/// out-of-range ids through their return value; the facade translates
/// those into [`EntityNotFound`] before any other manager is touched.
#[derive(Debug)]
pub struct Entities {
    slots: Vec<Slot>,
    /// Freed ids, reused last-in first-out.
    free: Vec<Entity>,
    capacity: u32,
    live: usize,
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    signature: Signature,
    alive: bool,
}

/// An iterator over the live entities of a pool.
#[derive(Clone)]
pub struct EntitiesIter<'a> {
    inner: std::iter::Enumerate<std::slice::Iter<'a, Slot>>,
}

impl Entities {
    /// Creates an empty pool bounded by `capacity` live entities.
    pub fn new(capacity: u32) -> Self {
        let slots = Vec::new();
        let free = Vec::new();
        let live = 0;

        Self { slots, free, capacity, live }
    }

    /// Returns the count of live entities.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Returns `true` if no entities are live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the maximum count of simultaneously live entities.
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Returns `true` if the entity is currently live.
    pub fn contains(&self, entity: Entity) -> bool {
        self.slots.get(entity.index()).is_some_and(|slot| slot.alive)
    }

    /// Returns an iterator over the live entities.
    pub fn iter(&self) -> EntitiesIter<'_> {
        EntitiesIter { inner: self.slots.iter().enumerate() }
    }

    /// Allocates a new entity with an empty signature.
    ///
    /// Freed ids are reused before fresh ones; fresh ids ascend from 0.
    /// Exhaustion is load-dependent rather than a caller bug, so it is
    /// surfaced as a recoverable error instead of a panic.
    pub fn create(&mut self) -> Result<Entity, OutOfEntities> {
        let entity = if let Some(entity) = self.free.pop() {
            entity
        } else if self.slots.len() < self.capacity as usize {
            self.slots.push(Slot::dead());

            Entity(self.slots.len() as u32 - 1)
        } else {
            return Err(OutOfEntities(self.capacity));
        };

        let slot = &mut self.slots[entity.index()];

        slot.alive = true;
        slot.signature = Signature::EMPTY;
        self.live += 1;

        Ok(entity)
    }

    /// Frees an entity, allowing its id to be reused.
    ///
    /// Returns `false` (and leaves the pool untouched) if the entity is
    /// already dead or out of range; a double destroy never pushes a
    /// duplicate id into the free pool.
    pub fn destroy(&mut self, entity: Entity) -> bool {
        let Some(slot) = self.slots.get_mut(entity.index()) else {
            return false;
        };

        if !slot.alive {
            return false;
        }

        slot.alive = false;
        slot.signature = Signature::EMPTY;
        self.free.push(entity);
        self.live -= 1;

        true
    }

    /// Returns the signature of an entity, or `None` if it isn't live.
    pub fn signature(&self, entity: Entity) -> Option<Signature> {
        self.slots
            .get(entity.index())
            .filter(|slot| slot.alive)
            .map(|slot| slot.signature)
    }

    /// Overwrites the signature of an entity.
    ///
    /// Returns `None` if the entity isn't live.
    pub fn assign_signature(
        &mut self,
        entity: Entity,
        signature: Signature,
    ) -> Option<()> {
        self.slots
            .get_mut(entity.index())
            .filter(|slot| slot.alive)
            .map(|slot| slot.signature = signature)
    }
}

impl Slot {
    const fn dead() -> Self {
        Self { signature: Signature::EMPTY, alive: false }
    }
}

impl<'a> IntoIterator for &'a Entities {
    type IntoIter = EntitiesIter<'a>;
    type Item = Entity;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Iterator for EntitiesIter<'_> {
    type Item = Entity;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.find_map(|(index, slot)| {
            slot.alive.then(|| Entity(index as u32))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ComponentId;

    #[test]
    fn create_and_destroy() {
        let mut entities = Entities::new(MAX_ENTITIES);

        let e0 = entities.create().unwrap();
        let e1 = entities.create().unwrap();

        assert_ne!(e0, e1);
        assert_eq!(entities.len(), 2);

        assert!(entities.destroy(e0));
        assert!(!entities.contains(e0));
        assert_eq!(entities.len(), 1);

        // the freed id comes back first
        let e2 = entities.create().unwrap();

        assert_eq!(e2, e0);
        assert_eq!(entities.len(), 2);
    }

    #[test]
    fn recycling_is_lifo() {
        let mut entities = Entities::new(8);

        let ids: Vec<_> =
            (0..4).map(|_| entities.create().unwrap()).collect();

        entities.destroy(ids[1]);
        entities.destroy(ids[3]);

        assert_eq!(entities.create().unwrap(), ids[3]);
        assert_eq!(entities.create().unwrap(), ids[1]);
    }

    #[test]
    fn exhaustion_is_recoverable() {
        let mut entities = Entities::new(2);

        let e0 = entities.create().unwrap();
        let _e1 = entities.create().unwrap();

        assert!(entities.create().is_err());

        entities.destroy(e0);

        assert_eq!(entities.create().unwrap(), e0);
    }

    #[test]
    fn double_destroy_does_not_corrupt_the_pool() {
        let mut entities = Entities::new(4);

        let e0 = entities.create().unwrap();
        let _e1 = entities.create().unwrap();

        assert!(entities.destroy(e0));
        assert!(!entities.destroy(e0));
        assert!(!entities.destroy(Entity(123)));

        // only one copy of `e0` was pooled
        assert_eq!(entities.create().unwrap(), e0);
        assert_ne!(entities.create().unwrap(), e0);
    }

    #[test]
    fn signature_round_trip() {
        let mut entities = Entities::new(4);
        let entity = entities.create().unwrap();

        assert_eq!(entities.signature(entity), Some(Signature::EMPTY));

        let signature =
            Signature::EMPTY.with(ComponentId(5)).with(ComponentId(10));

        entities.assign_signature(entity, signature).unwrap();

        assert_eq!(entities.signature(entity), Some(signature));
    }

    #[test]
    fn recycled_ids_start_with_an_empty_signature() {
        let mut entities = Entities::new(4);
        let entity = entities.create().unwrap();

        entities
            .assign_signature(entity, Signature::EMPTY.with(ComponentId(0)))
            .unwrap();
        entities.destroy(entity);

        let recycled = entities.create().unwrap();

        assert_eq!(recycled, entity);
        assert_eq!(entities.signature(recycled), Some(Signature::EMPTY));
    }

    #[test]
    fn dead_entities_have_no_signature() {
        let mut entities = Entities::new(4);
        let entity = entities.create().unwrap();

        entities.destroy(entity);

        assert_eq!(entities.signature(entity), None);
        assert_eq!(entities.assign_signature(entity, Signature::EMPTY), None);
    }

    #[test]
    fn iter_skips_dead_entities() {
        let mut entities = Entities::new(4);

        let e0 = entities.create().unwrap();
        let e1 = entities.create().unwrap();
        let e2 = entities.create().unwrap();

        entities.destroy(e1);

        let live: Vec<_> = entities.iter().collect();

        assert_eq!(live, [e0, e2]);
    }
}
