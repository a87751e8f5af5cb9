//! Edge-triggered keyboard state.
//!
//! `is_just_pressed(key)` is true only during the frame the key went down, i.e.
//! the key was not held at the end of the previous frame and is held now. OS key
//! repeat re-sends `Pressed` while a key stays down; those repeats never produce
//! a second edge because the key is already in `held`. Edges are cleared by
//! `end_frame()` once the scene update has consumed them.

use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Day/night toggle.
    Space,
    /// Overlay opacity toggle.
    N,
    Escape,
}

#[derive(Debug, Default)]
pub struct InputState {
    held: HashSet<Key>,
    just_pressed: HashSet<Key>,
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
        self.held.remove(&key);
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
    }
}
