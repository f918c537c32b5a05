//! A small 3D game-engine core built around a signature-based ECS.
//!
//! Entities are plain recycled ids, components live in densely packed
//! per-kind stores, and systems are told whenever an entity starts or
//! stops matching their required component [`Signature`]. The [`World`]
//! facade owns the three managers and keeps them consistent.
//!
//! [`Signature`]: crate::signature::Signature
//! [`World`]: crate::world::World

#![forbid(unsafe_op_in_unsafe_fn)]

pub mod component;
pub mod components;
pub mod entity;
pub mod input;
pub mod math;
pub mod physics;
pub mod player;
pub mod render;
pub mod signature;
pub mod storage;
pub mod system;
pub mod world;

/// Re-export of the commonly used items in this crate.
pub mod prelude {
    pub use crate::component::*;
    pub use crate::components::*;
    pub use crate::entity::*;
    pub use crate::input::*;
    pub use crate::math::*;
    pub use crate::physics::*;
    pub use crate::player::*;
    pub use crate::render::*;
    pub use crate::signature::*;
    pub use crate::storage::{EntityMap, EntitySet};
    pub use crate::system::*;
    pub use crate::world::*;
}
