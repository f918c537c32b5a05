use std::any::{type_name, Any};

use super::Component;
use crate::entity::Entity;
use crate::storage::EntityMap;

/// Densely packed values of a single component kind.
///
/// Values sit in a contiguous array with no holes. Two maps tie them back
/// to their entities: `indices` (entity → slot) and `entities` (slot →
/// entity). Removal swaps the last value into the vacated slot, so slot
/// order changes over time — iterate for cache locality, never for order.
pub(crate) struct DenseStore<T> {
    values: Vec<T>,
    /// Slot → entity, parallel to `values`.
    entities: Vec<Entity>,
    /// Entity → slot.
    indices: EntityMap<usize>,
}

/// Object-safe surface of a [`DenseStore`], for operations that must reach
/// every registered kind without knowing its type.
pub(crate) trait AnyStore: Send + Sync {
    /// Detaches the entity's value if it has one, silently doing nothing
    /// otherwise.
    fn free(&mut self, entity: Entity);

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> DenseStore<T> {
    pub fn new() -> Self {
        let values = Vec::new();
        let entities = Vec::new();
        let indices = EntityMap::new();

        Self { values, entities, indices }
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.indices.contains(entity)
    }

    /// Attaches a value to an entity.
    ///
    /// # Panics
    ///
    /// Panics if the entity already has a value of this kind. Duplicate
    /// attachment is a caller bug, not a runtime condition.
    pub fn insert(&mut self, entity: Entity, value: T) {
        assert!(
            !self.contains(entity),
            "component `{}` attached to entity {} more than once",
            type_name::<T>(),
            entity.id(),
        );

        self.indices.insert(entity, self.values.len());
        self.entities.push(entity);
        self.values.push(value);
    }

    /// Detaches the value of an entity, returning it.
    ///
    /// The last value is swapped into the vacated slot to keep the array
    /// dense.
    ///
    /// # Panics
    ///
    /// Panics if the entity has no value of this kind.
    pub fn remove(&mut self, entity: Entity) -> T {
        let Some(index) = self.indices.remove(entity) else {
            panic!(
                "removing component `{}` from entity {} that has none",
                type_name::<T>(),
                entity.id(),
            );
        };

        let value = self.values.swap_remove(index);

        self.entities.swap_remove(index);

        // retarget the entity whose value was swapped into `index`
        if let Some(&moved) = self.entities.get(index) {
            self.indices.insert(moved, index);
        }

        value
    }

    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.indices.get(entity).map(|&index| &self.values[index])
    }

    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.indices
            .get(entity)
            .map(|&index| &mut self.values[index])
    }

    #[cfg(test)]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }
}

impl<T: Component> AnyStore for DenseStore<T> {
    fn free(&mut self, entity: Entity) {
        if self.contains(entity) {
            self.remove(entity);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
