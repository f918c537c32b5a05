//! Translating action state into movement and camera orientation.

use crate::components::{Camera, PlayerControlled, RigidBody, Transform};
use crate::entity::Entity;
use crate::input::{Action, InputSystem};
use crate::math::Vec3;
use crate::storage::EntitySet;
use crate::system::{System, SystemHandle};
use crate::world::World;

/// Free-flight movement speed, world units per second.
const FLIGHT_SPEED: f32 = 5.0;

/// Steers player-controlled entities.
///
/// Registered over entities with [`PlayerControlled`] and [`Transform`].
/// The other attachments are optional and probed per entity each frame: a
/// [`Camera`] makes the entity turn with the mouse, a [`RigidBody`] makes
/// the movement actions push the body through the physics step instead of
/// teleporting the transform.
pub struct PlayerControlSystem {
    entities: EntitySet,
    input: SystemHandle<InputSystem>,
}

impl PlayerControlSystem {
    /// Creates the system, wired to the input system it reads from.
    pub fn new(input: SystemHandle<InputSystem>) -> Self {
        let entities = EntitySet::new();

        Self { entities, input }
    }

    /// Steers every member entity by its current action state.
    pub fn update(&mut self, world: &mut World, delta_time: f32) {
        let (look_x, look_y) = self.input.borrow_mut().take_mouse_delta();

        for entity in &self.entities {
            if world.has::<Camera>(entity) {
                look(world, entity, look_x, look_y);
            }

            if world.has::<RigidBody>(entity) {
                push_body(world, entity);
            } else {
                fly(world, entity, delta_time);
            }
        }
    }
}

impl System for PlayerControlSystem {
    fn entities(&self) -> &EntitySet {
        &self.entities
    }

    fn entities_mut(&mut self) -> &mut EntitySet {
        &mut self.entities
    }
}

/// Applies mouse movement to the camera angles and rebuilds the
/// transform's basis vectors from them.
fn look(world: &mut World, entity: Entity, look_x: f32, look_y: f32) {
    let Ok(camera) = world.get_mut::<Camera>(entity) else {
        return;
    };

    camera.yaw = (camera.yaw + look_x * camera.sensitivity) % 360.0;
    camera.pitch =
        (camera.pitch + look_y * camera.sensitivity).clamp(-89.0, 89.0);

    let (yaw, pitch) =
        (camera.yaw.to_radians(), camera.pitch.to_radians());
    let front = Vec3::new(
        yaw.cos() * pitch.cos(),
        pitch.sin(),
        yaw.sin() * pitch.cos(),
    )
    .normalized();

    let Ok(transform) = world.get_mut::<Transform>(entity) else {
        return;
    };

    transform.front = front;
    transform.right = front.cross(Vec3::Y).normalized();
    transform.up = transform.right.cross(front).normalized();
}

/// Reads the movement direction the action state asks for, projected onto
/// the entity's basis vectors. `flatten` drops the vertical part, for
/// ground-based movement.
fn movement_direction(
    world: &World,
    entity: Entity,
    flatten: bool,
) -> Option<Vec3> {
    let control = world.get::<PlayerControlled>(entity).ok()?;
    let transform = world.get::<Transform>(entity).ok()?;

    let (mut front, right) = (transform.front, transform.right);

    if flatten {
        front = Vec3::new(front.x, 0.0, front.z);
    }

    let mut direction = Vec3::ZERO;

    if control.is_active(Action::MoveForward) {
        direction += front;
    }

    if control.is_active(Action::MoveBack) {
        direction -= front;
    }

    if control.is_active(Action::MoveLeft) {
        direction -= right;
    }

    if control.is_active(Action::MoveRight) {
        direction += right;
    }

    (direction != Vec3::ZERO).then_some(direction)
}

fn fly(world: &mut World, entity: Entity, delta_time: f32) {
    let Some(direction) = movement_direction(world, entity, false) else {
        return;
    };

    if let Ok(transform) = world.get_mut::<Transform>(entity) {
        transform.position += direction * (FLIGHT_SPEED * delta_time);
    }
}

fn push_body(world: &mut World, entity: Entity) {
    let Some(direction) = movement_direction(world, entity, true) else {
        return;
    };

    if let Ok(body) = world.get_mut::<RigidBody>(entity) {
        body.force += direction * body.force_strength;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::ScanCode;
    use crate::signature::Signature;

    const KEY_W: ScanCode = 17;

    fn world_with_control() -> (
        World,
        SystemHandle<InputSystem>,
        SystemHandle<PlayerControlSystem>,
    ) {
        let mut world = World::new();

        world.register_component::<PlayerControlled>();
        world.register_component::<Transform>();
        world.register_component::<Camera>();
        world.register_component::<RigidBody>();

        let input = world.register_system(
            InputSystem::new(),
            Signature::EMPTY
                .with(world.component_id::<PlayerControlled>()),
        );
        let control = world.register_system(
            PlayerControlSystem::new(input.clone()),
            Signature::EMPTY
                .with(world.component_id::<PlayerControlled>())
                .with(world.component_id::<Transform>()),
        );

        (world, input, control)
    }

    fn spawn_player(world: &mut World) -> Entity {
        let player = world.spawn().unwrap();
        let mut controlled = PlayerControlled::default();

        controlled.bind(KEY_W, Action::MoveForward);

        world.insert(player, controlled).unwrap();
        world.insert(player, Transform::IDENTITY).unwrap();

        player
    }

    #[test]
    fn flight_moves_along_the_front_vector() {
        let (mut world, input, control) = world_with_control();
        let player = spawn_player(&mut world);

        input.borrow_mut().key_event(KEY_W, true);
        input.borrow_mut().update(&mut world);
        control.borrow_mut().update(&mut world, 0.5);

        let transform = world.get::<Transform>(player).unwrap();

        // default front is -Z, speed 5.0 over half a second
        assert_eq!(transform.position, Vec3::new(0.0, 0.0, -2.5));
    }

    #[test]
    fn a_rigid_body_is_pushed_instead_of_teleported() {
        let (mut world, input, control) = world_with_control();
        let player = spawn_player(&mut world);

        world.insert(player, RigidBody::new(1.0)).unwrap();

        input.borrow_mut().key_event(KEY_W, true);
        input.borrow_mut().update(&mut world);
        control.borrow_mut().update(&mut world, 0.5);

        let transform = world.get::<Transform>(player).unwrap();
        let body = world.get::<RigidBody>(player).unwrap();

        assert_eq!(transform.position, Vec3::ZERO);
        assert_eq!(body.force, Vec3::new(0.0, 0.0, -10.0));
    }

    #[test]
    fn mouse_movement_turns_the_camera() {
        let (mut world, input, control) = world_with_control();
        let player = spawn_player(&mut world);

        world.insert(player, Camera::default()).unwrap();

        {
            let mut input = input.borrow_mut();

            input.cursor_moved(0.0, 0.0);
            input.cursor_moved(100.0, 0.0);
        }

        control.borrow_mut().update(&mut world, 0.016);

        let camera = world.get::<Camera>(player).unwrap();

        // 100 px at 0.1 sensitivity on top of the -90° default
        assert_eq!(camera.yaw, -80.0);

        let transform = world.get::<Transform>(player).unwrap();

        assert!((transform.front.length() - 1.0).abs() < 1e-5);
        assert!(transform.front.x > 0.0);
    }

    #[test]
    fn pitch_is_clamped() {
        let (mut world, input, control) = world_with_control();
        let player = spawn_player(&mut world);

        world.insert(player, Camera::default()).unwrap();

        {
            let mut input = input.borrow_mut();

            input.cursor_moved(0.0, 0.0);
            input.cursor_moved(0.0, -10_000.0);
        }

        control.borrow_mut().update(&mut world, 0.016);

        assert_eq!(world.get::<Camera>(player).unwrap().pitch, 89.0);
    }
}
