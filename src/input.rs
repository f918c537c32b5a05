//! Turning raw key and mouse events into per-entity action state.
//!
//! The application shell owns the window and polls the platform; this
//! system only consumes the events it is fed. Key state is tracked
//! globally (a key is down or it isn't), but actions are resolved per
//! member entity through its [`PlayerControlled`] bindings.

use std::collections::HashSet;

use crate::components::PlayerControlled;
use crate::storage::EntitySet;
use crate::system::System;
use crate::world::World;

/// A platform key identifier, as reported by the windowing layer.
pub type ScanCode = u32;

/// Something the player can do, bindable to any key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum Action {
    MoveForward,
    MoveBack,
    MoveLeft,
    MoveRight,
}

impl Action {
    /// The count of distinct actions.
    pub const COUNT: usize = 4;
}

/// Maintains the action state of player-controlled entities.
///
/// Registered over entities with a [`PlayerControlled`] component. Feed it
/// events as they arrive, then call [`update`](InputSystem::update) once
/// per frame before the control system runs.
#[derive(Default)]
pub struct InputSystem {
    entities: EntitySet,
    held: HashSet<ScanCode>,
    cursor: Option<(f32, f32)>,
    mouse_delta: (f32, f32),
}

impl InputSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a key going down or up.
    pub fn key_event(&mut self, key: ScanCode, pressed: bool) {
        if pressed {
            self.held.insert(key);
        } else {
            self.held.remove(&key);
        }
    }

    /// Returns `true` if the key is currently held.
    pub fn is_held(&self, key: ScanCode) -> bool {
        self.held.contains(&key)
    }

    /// Records the cursor moving to a new position.
    ///
    /// The first event only establishes the reference position, so a
    /// window gaining focus doesn't register as a camera jerk. Vertical
    /// movement is flipped: screen coordinates grow downward, pitch grows
    /// upward.
    pub fn cursor_moved(&mut self, x: f32, y: f32) {
        if let Some((last_x, last_y)) = self.cursor {
            self.mouse_delta.0 += x - last_x;
            self.mouse_delta.1 += last_y - y;
        }

        self.cursor = Some((x, y));
    }

    /// Returns the mouse movement accumulated since the last take, and
    /// resets it.
    pub fn take_mouse_delta(&mut self) -> (f32, f32) {
        std::mem::take(&mut self.mouse_delta)
    }

    /// Resolves held keys into action state for every member entity.
    pub fn update(&mut self, world: &mut World) {
        for entity in &self.entities {
            let Ok(control) = world.get_mut::<PlayerControlled>(entity)
            else {
                continue;
            };

            control.state.clear();

            for (&key, &action) in &control.bindings {
                if self.held.contains(&key) {
                    control.state.set(action, true);
                }
            }
        }
    }
}

impl System for InputSystem {
    fn entities(&self) -> &EntitySet {
        &self.entities
    }

    fn entities_mut(&mut self) -> &mut EntitySet {
        &mut self.entities
    }
}
