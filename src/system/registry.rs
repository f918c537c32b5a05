use std::any::{type_name, TypeId};
use std::hash::BuildHasherDefault;
use std::sync::Arc;

use atomic_refcell::AtomicRefCell;
use indexmap::IndexMap;
use tracing::{debug, trace};

use super::{System, SystemHandle};
use crate::entity::Entity;
use crate::signature::Signature;
use crate::storage::TypeIdHasher;

/// The registered systems of a world and their required signatures.
///
/// One instance exists per system type. Systems are notified of
/// membership transitions in registration order, which makes notification
/// order deterministic for a given registration sequence.
pub struct Systems {
    registry: IndexMap<TypeId, SystemEntry, BuildHasherDefault<TypeIdHasher>>,
}

struct SystemEntry {
    signature: Signature,
    system: Arc<AtomicRefCell<dyn System>>,
}

impl Systems {
    /// Creates a registry with no systems.
    pub fn new() -> Self {
        let registry = IndexMap::default();

        Self { registry }
    }

    /// Returns the count of registered systems.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Returns `true` if no systems are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registers a system with the signature it requires of its members.
    ///
    /// # Panics
    ///
    /// Panics if a system of type `S` is already registered.
    pub fn register<S: System>(
        &mut self,
        system: S,
        signature: Signature,
    ) -> SystemHandle<S> {
        assert!(
            !self.registry.contains_key(&TypeId::of::<S>()),
            "system `{}` registered more than once",
            type_name::<S>(),
        );

        let system = Arc::new(AtomicRefCell::new(system));
        let handle = SystemHandle::new(Arc::clone(&system));

        self.registry
            .insert(TypeId::of::<S>(), SystemEntry { signature, system });

        debug!(system = type_name::<S>(), "registered");

        handle
    }

    /// Returns a handle to the registered system of type `S`.
    ///
    /// # Panics
    ///
    /// Panics if no system of type `S` is registered.
    pub fn get<S: System>(&self) -> SystemHandle<S> {
        let Some(entry) = self.registry.get(&TypeId::of::<S>()) else {
            panic!("system `{}` not registered before use", type_name::<S>());
        };

        let system = Arc::clone(&entry.system);

        // SAFETY: the entry under `TypeId::of::<S>()` was created in
        // `register::<S>`, so the concrete type behind the cell is `S`
        let inner = unsafe {
            Arc::from_raw(Arc::into_raw(system) as *const AtomicRefCell<S>)
        };

        SystemHandle::new(inner)
    }

    /// Recomputes every system's membership of an entity against its new
    /// signature.
    ///
    /// A system whose required signature is covered gains the entity (and
    /// its `on_entity_added` hook fires); one no longer covered loses it
    /// (`on_entity_removed` fires). A system whose membership state is
    /// unchanged is not notified.
    pub fn signature_changed(&self, entity: Entity, signature: Signature) {
        for (_, entry) in &self.registry {
            let mut system = entry.system.borrow_mut();

            if signature.is_superset_of(entry.signature) {
                if system.entities_mut().insert(entity) {
                    trace!(entity = entity.id(), "entered system");
                    system.on_entity_added(entity);
                }
            } else if system.entities_mut().remove(entity) {
                trace!(entity = entity.id(), "left system");
                system.on_entity_removed(entity);
            }
        }
    }

    /// Removes a destroyed entity from every system's membership set.
    ///
    /// `on_entity_removed` fires for each system the entity was a member
    /// of, exactly as if its signature had stopped matching.
    pub fn free(&self, entity: Entity) {
        for (_, entry) in &self.registry {
            let mut system = entry.system.borrow_mut();

            if system.entities_mut().remove(entity) {
                system.on_entity_removed(entity);
            }
        }
    }
}

impl Default for Systems {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ComponentId;
    use crate::storage::EntitySet;

    /// Counts hook invocations.
    #[derive(Default)]
    struct Recorder {
        entities: EntitySet,
        added: Vec<Entity>,
        removed: Vec<Entity>,
    }

    impl System for Recorder {
        fn entities(&self) -> &EntitySet {
            &self.entities
        }

        fn entities_mut(&mut self) -> &mut EntitySet {
            &mut self.entities
        }

        fn on_entity_added(&mut self, entity: Entity) {
            self.added.push(entity);
        }

        fn on_entity_removed(&mut self, entity: Entity) {
            self.removed.push(entity);
        }
    }

    const A: ComponentId = ComponentId(0);
    const B: ComponentId = ComponentId(1);

    #[test]
    fn membership_transitions_fire_exactly_once() {
        let mut systems = Systems::new();
        let handle =
            systems.register(Recorder::default(), Signature::EMPTY.with(A));

        let entity = Entity(0);

        // gains A: enters
        systems.signature_changed(entity, Signature::EMPTY.with(A));
        // gains B on top: still a member, no second notification
        systems.signature_changed(entity, Signature::EMPTY.with(A).with(B));
        // loses A: leaves, despite still having B
        systems.signature_changed(entity, Signature::EMPTY.with(B));
        // redundant: already out
        systems.signature_changed(entity, Signature::EMPTY);

        let recorder = handle.borrow();

        assert_eq!(recorder.added, [entity]);
        assert_eq!(recorder.removed, [entity]);
        assert!(!recorder.entities.contains(entity));
    }

    #[test]
    fn free_notifies_every_member_system() {
        struct Other {
            entities: EntitySet,
            removed: Vec<Entity>,
        }

        impl System for Other {
            fn entities(&self) -> &EntitySet {
                &self.entities
            }

            fn entities_mut(&mut self) -> &mut EntitySet {
                &mut self.entities
            }

            fn on_entity_removed(&mut self, entity: Entity) {
                self.removed.push(entity);
            }
        }

        let mut systems = Systems::new();

        let first =
            systems.register(Recorder::default(), Signature::EMPTY.with(A));
        let second = systems.register(
            Other { entities: EntitySet::new(), removed: Vec::new() },
            Signature::EMPTY.with(B),
        );

        let entity = Entity(3);

        systems.signature_changed(entity, Signature::EMPTY.with(A).with(B));
        systems.free(entity);

        assert_eq!(first.borrow().removed, [entity]);
        assert_eq!(second.borrow().removed, [entity]);
        assert!(first.borrow().entities.is_empty());
        assert!(second.borrow().entities.is_empty());
    }

    #[test]
    fn handles_point_at_the_registered_instance() {
        let mut systems = Systems::new();

        systems.register(Recorder::default(), Signature::EMPTY);

        let entity = Entity(7);

        systems.signature_changed(entity, Signature::EMPTY);

        // an empty requirement matches every entity
        assert!(systems.get::<Recorder>().borrow().entities.contains(entity));
    }

    #[test]
    #[should_panic(expected = "registered more than once")]
    fn double_registration_panics() {
        let mut systems = Systems::new();

        systems.register(Recorder::default(), Signature::EMPTY);
        systems.register(Recorder::default(), Signature::EMPTY);
    }

    #[test]
    #[should_panic(expected = "not registered before use")]
    fn missing_system_panics() {
        Systems::new().get::<Recorder>();
    }
}
