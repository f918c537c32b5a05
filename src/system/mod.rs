//! Systems, the per-frame logic units, and membership dispatch.

use std::any::Any;
use std::sync::Arc;

use atomic_refcell::{AtomicRef, AtomicRefCell, AtomicRefMut};

pub use self::registry::*;
use crate::entity::Entity;
use crate::storage::EntitySet;

mod registry;

/// A unit of work operating each frame on the entities matching its
/// required signature.
///
/// A system embeds an [`EntitySet`] that the [`Systems`] registry keeps in
/// sync: whenever an entity's signature starts (or stops) covering the
/// system's required signature, the registry inserts (or removes) it and
/// fires the matching hook — exactly once per transition. Redundant
/// signature changes fire nothing.
///
/// The hooks only signal whole-component attach/detach; nobody is told
/// about mutations of component fields. Iteration order over the
/// membership set is not insertion order and is not stable across
/// removals.
pub trait System: Any + Send + Sync {
    /// The entities currently matching this system.
    fn entities(&self) -> &EntitySet;

    /// The membership set, for the registry to maintain.
    fn entities_mut(&mut self) -> &mut EntitySet;

    /// Called after the entity was inserted into the membership set.
    fn on_entity_added(&mut self, entity: Entity) {
        let _ = entity;
    }

    /// Called after the entity was removed from the membership set.
    ///
    /// Also fires when a member entity is destroyed outright, so backends
    /// can release per-entity state on teardown.
    fn on_entity_removed(&mut self, entity: Entity) {
        let _ = entity;
    }
}

/// A shared handle to a registered system.
///
/// Handles are how the application shell and other systems reach a system
/// between frames; the [`Systems`] registry remains the owner. Borrows are
/// checked at runtime: don't hold one across a world mutation that could
/// re-enter the same system's hooks.
pub struct SystemHandle<S: System> {
    inner: Arc<AtomicRefCell<S>>,
}

impl<S: System> SystemHandle<S> {
    pub(crate) fn new(inner: Arc<AtomicRefCell<S>>) -> Self {
        Self { inner }
    }

    /// Immutably borrows the system.
    ///
    /// # Panics
    ///
    /// Panics if the system is already borrowed mutably.
    pub fn borrow(&self) -> AtomicRef<'_, S> {
        self.inner.borrow()
    }

    /// Mutably borrows the system.
    ///
    /// # Panics
    ///
    /// Panics if the system is already borrowed.
    pub fn borrow_mut(&self) -> AtomicRefMut<'_, S> {
        self.inner.borrow_mut()
    }
}

impl<S: System> Clone for SystemHandle<S> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}
