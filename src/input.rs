use std::collections::HashSet;
use winit::keyboard::KeyCode;

/// Immutable per-frame view of the controls. The simulation only ever sees
/// this; key bindings live entirely in `InputState`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub sprint: bool,
    pub fly: bool,
    pub dash: bool,
    pub attack: bool,
}

pub struct InputState {
    pressed_keys: HashSet<KeyCode>,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            pressed_keys: HashSet::new(),
        }
    }

    pub fn handle_key_press(&mut self, key: KeyCode) {
        self.pressed_keys.insert(key);
    }

    pub fn handle_key_release(&mut self, key: KeyCode) {
        self.pressed_keys.remove(&key);
    }

    /// Drop all pressed keys, e.g. when the window loses focus.
    pub fn clear(&mut self) {
        self.pressed_keys.clear();
    }

    pub fn is_pressed(&self, key: KeyCode) -> bool {
        self.pressed_keys.contains(&key)
    }

    pub fn snapshot(&self) -> InputSnapshot {
        InputSnapshot {
            forward: self.is_pressed(KeyCode::KeyW) || self.is_pressed(KeyCode::ArrowUp),
            backward: self.is_pressed(KeyCode::KeyS) || self.is_pressed(KeyCode::ArrowDown),
            left: self.is_pressed(KeyCode::KeyA) || self.is_pressed(KeyCode::ArrowLeft),
            right: self.is_pressed(KeyCode::KeyD) || self.is_pressed(KeyCode::ArrowRight),
            jump: self.is_pressed(KeyCode::Space),
            sprint: self.is_pressed(KeyCode::ShiftLeft) || self.is_pressed(KeyCode::ShiftRight),
            fly: self.is_pressed(KeyCode::KeyF),
            dash: self.is_pressed(KeyCode::KeyQ),
            attack: self.is_pressed(KeyCode::KeyE),
        }
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}
