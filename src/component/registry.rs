use std::any::{type_name, TypeId};
use std::hash::BuildHasherDefault;

use indexmap::IndexMap;
use tracing::debug;

use super::{AnyStore, Component, ComponentError, ComponentId, DenseStore};
use crate::entity::Entity;
use crate::signature::MAX_COMPONENTS;
use crate::storage::TypeIdHasher;

/// Storage for every registered component kind of a world.
///
/// Kinds must be registered before use; registration assigns the next
/// sequential [`ComponentId`] and allocates a dense store. Misusing the
/// registry (registering twice, attaching twice, detaching what was never
/// attached, naming an unregistered kind) panics: those are caller bugs
/// the world cannot recover from. The one speculative operation is
/// [`get`](Components::get)/[`get_mut`](Components::get_mut), which
/// reports an absent component as a [`ComponentError`].
pub struct Components {
    registry: IndexMap<TypeId, ComponentId, BuildHasherDefault<TypeIdHasher>>,
    /// One store per registered kind, indexed by [`ComponentId`].
    stores: Vec<Box<dyn AnyStore>>,
}

impl Components {
    /// Creates a registry with no kinds.
    pub fn new() -> Self {
        let registry = IndexMap::default();
        let stores = Vec::new();

        Self { registry, stores }
    }

    /// Returns the count of registered kinds.
    pub fn len(&self) -> usize {
        self.stores.len()
    }

    /// Returns `true` if no kinds are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registers `T` as a component kind and returns its id.
    ///
    /// # Panics
    ///
    /// Panics if `T` is already registered or if registering it would
    /// exceed [`MAX_COMPONENTS`].
    pub fn register<T: Component>(&mut self) -> ComponentId {
        assert!(
            !self.registry.contains_key(&TypeId::of::<T>()),
            "component `{}` registered more than once",
            type_name::<T>(),
        );
        assert!(
            self.len() < MAX_COMPONENTS,
            "cannot register `{}`: component kind cap ({MAX_COMPONENTS}) \
             reached",
            type_name::<T>(),
        );

        let id = ComponentId(self.stores.len());

        self.registry.insert(TypeId::of::<T>(), id);
        self.stores.push(Box::new(DenseStore::<T>::new()));

        debug!(component = type_name::<T>(), id = id.0, "registered");

        id
    }

    /// Returns the id of `T`.
    ///
    /// # Panics
    ///
    /// Panics if `T` was never registered.
    pub fn id_of<T: Component>(&self) -> ComponentId {
        let Some(&id) = self.registry.get(&TypeId::of::<T>()) else {
            panic!("component `{}` not registered before use", type_name::<T>());
        };

        id
    }

    /// Attaches a value to an entity.
    ///
    /// # Panics
    ///
    /// Panics if `T` is unregistered or the entity already has a `T`.
    pub fn insert<T: Component>(&mut self, entity: Entity, value: T) {
        self.store_mut::<T>().insert(entity, value);
    }

    /// Detaches the `T` of an entity, returning it.
    ///
    /// # Panics
    ///
    /// Panics if `T` is unregistered or the entity has no `T`.
    pub fn remove<T: Component>(&mut self, entity: Entity) -> T {
        self.store_mut::<T>().remove(entity)
    }

    /// Returns a reference to the `T` of an entity.
    ///
    /// # Panics
    ///
    /// Panics if `T` was never registered.
    pub fn get<T: Component>(
        &self,
        entity: Entity,
    ) -> Result<&T, ComponentError> {
        self.store::<T>().get(entity).ok_or(ComponentError::Missing {
            entity,
            type_name: type_name::<T>(),
        })
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
        self.store_mut::<T>().get_mut(entity).ok_or(
            ComponentError::Missing { entity, type_name: type_name::<T>() },
        )
    }

    /// Detaches every component of an entity, of every registered kind.
    ///
    /// Stores the entity never had a value in are left untouched; no store
    /// is affected by another's removal.
    pub fn free(&mut self, entity: Entity) {
        for store in &mut self.stores {
            store.free(entity);
        }
    }

    fn store<T: Component>(&self) -> &DenseStore<T> {
        let id = self.id_of::<T>();

        // the id was assigned in `register::<T>`, so the store at that
        // index holds `T` values
        self.stores[id.0]
            .as_any()
            .downcast_ref()
            .unwrap_or_else(|| unreachable!())
    }

    fn store_mut<T: Component>(&mut self) -> &mut DenseStore<T> {
        let id = self.id_of::<T>();

        self.stores[id.0]
            .as_any_mut()
            .downcast_mut()
            .unwrap_or_else(|| unreachable!())
    }
}

impl Default for Components {
    fn default() -> Self {
        Self::new()
    }
}
