//! Keyboard state with both edge-triggered and level-triggered queries.
//!
//! - **Level-triggered (held):** `is_held(key)` is true every frame the key is
//!   down. Used for continuous movement.
//!
//! - **Edge-triggered (just_pressed / just_released):** true only during the
//!   frame the transition happened. Cleared by `end_frame()`, which the main
//!   loop calls after at least one fixed step has consumed them, so a press is
//!   never lost on a frame with zero simulation steps.

use serde::Deserialize;
use std::collections::HashSet;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Key {
    Left,
    Right,
    Up,
    W,
    A,
    D,
    Space,
    E,
    R,
    Tab,
    Escape,
}

#[derive(Debug, Default)]
pub struct InputState {
    held: HashSet<Key>,
    just_pressed: HashSet<Key>,
    just_released: HashSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        if self.held.insert(key) {
            self.just_pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        if self.held.remove(&key) {
            self.just_released.insert(key);
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    pub fn is_just_released(&self, key: Key) -> bool {
        self.just_released.contains(&key)
    }

    pub fn just_pressed(&self) -> impl Iterator<Item = Key> + '_ {
        self.just_pressed.iter().copied()
    }

    pub fn just_released(&self) -> impl Iterator<Item = Key> + '_ {
        self.just_released.iter().copied()
    }

    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_down_sets_held_and_just_pressed() {
        let mut input = InputState::new();
        input.key_down(Key::A);
        assert!(input.is_held(Key::A));
        assert!(input.is_just_pressed(Key::A));
    }

    #[test]
    fn test_key_up_clears_held_sets_just_released() {
        let mut input = InputState::new();
        input.key_down(Key::A);
        input.key_up(Key::A);
        assert!(!input.is_held(Key::A));
        assert!(input.is_just_released(Key::A));
    }

    #[test]
    fn test_key_down_repeat_does_not_double_just_pressed() {
        let mut input = InputState::new();
        input.key_down(Key::Space);
        input.end_frame();
        // Auto-repeat while held must not look like a fresh press.
        input.key_down(Key::Space);
        assert!(input.is_held(Key::Space));
        assert!(!input.is_just_pressed(Key::Space));
    }

    #[test]
    fn test_key_up_without_down_is_no_op() {
        let mut input = InputState::new();
        input.key_up(Key::D);
        assert!(!input.is_just_released(Key::D));
        assert!(!input.is_held(Key::D));
    }

    #[test]
    fn test_end_frame_clears_transient_state() {
        let mut input = InputState::new();
        input.key_down(Key::A);
        input.key_down(Key::Space);
        input.end_frame();
        assert!(!input.is_just_pressed(Key::A));
        assert!(!input.is_just_pressed(Key::Space));
        assert!(input.is_held(Key::A));
        assert!(input.is_held(Key::Space));
    }

    #[test]
    fn test_end_frame_clears_just_released() {
        let mut input = InputState::new();
        input.key_down(Key::Right);
        input.key_up(Key::Right);
        assert!(input.is_just_released(Key::Right));
        input.end_frame();
        assert!(!input.is_just_released(Key::Right));
    }

    #[test]
    fn test_iterators_report_edges() {
        let mut input = InputState::new();
        input.key_down(Key::E);
        input.key_down(Key::Tab);
        input.key_up(Key::Tab);
        let mut pressed: Vec<Key> = input.just_pressed().collect();
        pressed.sort_by_key(|k| *k as u8);
        assert_eq!(pressed, vec![Key::E, Key::Tab]);
        assert_eq!(input.just_released().collect::<Vec<_>>(), vec![Key::Tab]);
    }

    #[test]
    fn test_keys_deserialize_lowercase() {
        let keys: Vec<Key> = serde_json::from_str(r#"["left","space","tab","w"]"#)
            .expect("keys should parse");
        assert_eq!(keys, vec![Key::Left, Key::Space, Key::Tab, Key::W]);
    }
}
