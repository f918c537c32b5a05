//! The component kinds the built-in systems operate on.
//!
//! These are plain data records; every behavior over them lives in a
//! system. Applications register the kinds they use and are free to add
//! their own alongside.

use std::collections::HashMap;

use crate::input::{Action, ScanCode};
use crate::math::{Quat, Vec3};

/// An opaque handle to a loaded asset (mesh, material, …), issued by the
/// application's asset loader.
pub type AssetId = u32;

/// Where an entity is and how it is oriented.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    /// Facing direction, maintained by the look controls.
    pub front: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

/// Which mesh and material to draw an entity with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshRef {
    pub mesh: AssetId,
    pub material: AssetId,
}

/// A first-person look orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Degrees around the vertical axis.
    pub yaw: f32,
    /// Degrees above the horizon, clamped to ±89°.
    pub pitch: f32,
    pub sensitivity: f32,
    /// Whether this is the camera the renderer should follow.
    pub primary: bool,
}

/// Dynamics properties of an entity backed by a physics body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidBody {
    /// Zero mass makes the body static.
    pub mass: f32,
    pub friction: f32,
    pub restitution: f32,
    /// Force accumulated this frame, consumed by the physics step.
    pub force: Vec3,
    /// How hard the controls push this body.
    pub force_strength: f32,
}

/// The collision geometry to build an entity's physics body from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionShape {
    pub kind: ShapeKind,
    /// Box: half-extents. Sphere: `x` is the radius. Capsule: `x` is the
    /// radius, `y` the height.
    pub dimensions: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Box,
    Sphere,
    Capsule,
}

/// Marks an entity as driven by player input and holds its bindings.
#[derive(Debug, Clone, Default)]
pub struct PlayerControlled {
    /// Which key drives which action.
    pub bindings: HashMap<ScanCode, Action>,
    /// Which actions are active this frame, written by the input system.
    pub state: ActionState,
}

/// The set of currently active [`Action`]s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionState([bool; Action::COUNT]);

impl Transform {
    /// A transform at the origin, unrotated, at unit scale, facing -Z.
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
        front: Vec3::new(0.0, 0.0, -1.0),
        right: Vec3::X,
        up: Vec3::Y,
    };

    pub fn at(position: Vec3) -> Self {
        Self { position, ..Self::IDENTITY }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Default for Camera {
    fn default() -> Self {
        // yaw of -90° points the derived front vector down -Z
        Self { yaw: -90.0, pitch: 0.0, sensitivity: 0.1, primary: true }
    }
}

impl RigidBody {
    pub fn new(mass: f32) -> Self {
        Self {
            mass,
            friction: 0.5,
            restitution: 0.0,
            force: Vec3::ZERO,
            force_strength: 10.0,
        }
    }
}

impl PlayerControlled {
    /// Binds a key to an action, replacing any previous binding of that
    /// key.
    pub fn bind(&mut self, key: ScanCode, action: Action) {
        self.bindings.insert(key, action);
    }

    /// Returns `true` if the action is active this frame.
    pub fn is_active(&self, action: Action) -> bool {
        self.state.get(action)
    }
}

impl ActionState {
    pub fn get(&self, action: Action) -> bool {
        self.0[action as usize]
    }

    pub fn set(&mut self, action: Action, active: bool) {
        self.0[action as usize] = active;
    }

    pub fn clear(&mut self) {
        self.0 = [false; Action::COUNT];
    }
}
