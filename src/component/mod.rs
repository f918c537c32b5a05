//! Components, the data attached to entities, and their storage.

use thiserror::Error;

pub(crate) use self::dense::*;
pub use self::registry::*;
use crate::entity::{Entity, EntityNotFound};

mod dense;
mod registry;

/// A single value attached to an entity.
///
/// Components are plain data; behavior lives in systems. Any `Send + Sync`
/// type can be a component once its kind is
/// [registered](Components::register).
pub trait Component: Send + Sync + 'static {}

impl<C: Send + Sync + 'static> Component for C {}

/// A unique identifier for a component kind.
///
/// Ids are dense and sequential in registration order (0, 1, 2, …), which
/// makes them usable as [`Signature`](crate::signature::Signature) bit
/// positions. Ids are scoped to the [`Components`] registry that assigned
/// them, so independent worlds never collide.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComponentId(pub(crate) usize);

impl ComponentId {
    /// Returns the signature bit position of this kind.
    pub const fn index(self) -> usize {
        self.0
    }
}

/// An error for when a requested component was not attached to an entity.
///
/// Unlike attaching or detaching (where the caller asserts the entity's
/// state and a mismatch is a bug), lookups are expected to be speculative:
/// systems probe for optional attachments and skip entities that lack
/// them.
#[derive(Debug, Clone, Copy, Error)]
pub enum ComponentError {
    #[error("entity {entity:?} has no `{type_name}` component")]
    Missing { entity: Entity, type_name: &'static str },
    #[error(transparent)]
    EntityNotFound(#[from] EntityNotFound),
}
