//! Submitting visible entities to a draw backend.
//!
//! Everything GPU-shaped (context, shaders, buffers, the meshes and
//! materials behind the asset ids) belongs to the application shell; this
//! system only walks its members and hands their transforms over.

use crate::components::{AssetId, MeshRef, Transform};
use crate::storage::EntitySet;
use crate::system::System;
use crate::world::World;

/// The narrow interface a renderer is consumed through.
pub trait DrawBackend: Send + Sync {
    /// Issues one draw call.
    fn draw(&mut self, mesh: AssetId, material: AssetId, transform: &Transform);
}

/// Draws every entity that has both a [`Transform`] and a [`MeshRef`].
///
/// Submission order follows the membership set's iteration order, which
/// is not stable; backends that need sorted draws (transparency, state
/// batching) sort on their side.
pub struct RenderSystem {
    entities: EntitySet,
    backend: Box<dyn DrawBackend>,
}

impl RenderSystem {
    pub fn new(backend: Box<dyn DrawBackend>) -> Self {
        let entities = EntitySet::new();

        Self { entities, backend }
    }

    /// Submits one draw call per member entity.
    pub fn draw(&mut self, world: &World) {
        for entity in &self.entities {
            let (Ok(transform), Ok(mesh)) = (
                world.get::<Transform>(entity),
                world.get::<MeshRef>(entity),
            ) else {
                continue;
            };

            self.backend.draw(mesh.mesh, mesh.material, transform);
        }
    }
}

impl System for RenderSystem {
    fn entities(&self) -> &EntitySet {
        &self.entities
    }

    fn entities_mut(&mut self) -> &mut EntitySet {
        &mut self.entities
    }
}
