use raven_core::input::{InputState, Key};

use crate::level::Level;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Jump,
    Attack,
    Interact,
    ToggleHint,
    Reset,
}

pub fn action_for_key(key: Key) -> Option<Action> {
    match key {
        Key::Left | Key::A => Some(Action::MoveLeft),
        Key::Right | Key::D => Some(Action::MoveRight),
        Key::Up | Key::W => Some(Action::Jump),
        Key::Space => Some(Action::Attack),
        Key::E => Some(Action::Interact),
        Key::Tab => Some(Action::ToggleHint),
        Key::R | Key::Escape => Some(Action::Reset),
    }
}

/// Feed this frame's key edges into the level. Releases go first so that
/// letting go of one direction while pressing the other in the same frame
/// ends up moving toward the new one. When a direction is released while
/// the opposite key is still held, the held one takes over.
pub fn dispatch(input: &InputState, level: &mut Level) {
    let mut released: Vec<Key> = input.just_released().collect();
    released.sort_by_key(|key| *key as u8);
    for key in released {
        if let Some(action) = action_for_key(key) {
            level.on_release_input(action);
        }
    }

    let mut pressed: Vec<Key> = input.just_pressed().collect();
    pressed.sort_by_key(|key| *key as u8);
    for key in pressed {
        if let Some(action) = action_for_key(key) {
            level.on_activate_input(action);
        }
    }

    if level.player().horizontal_input == 0 {
        if let Some(action) = held_direction(input) {
            level.on_activate_input(action);
        }
    }
}

fn held_direction(input: &InputState) -> Option<Action> {
    let left = [Key::Left, Key::A].into_iter().any(|k| input.is_held(k));
    let right = [Key::Right, Key::D].into_iter().any(|k| input.is_held(k));
    match (left, right) {
        (true, false) => Some(Action::MoveLeft),
        (false, true) => Some(Action::MoveRight),
        _ => None,
    }
}
