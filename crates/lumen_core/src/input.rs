use std::collections::HashSet;

/// Key codes and modifier flags are the winit ones, re-exported so callers
/// don't need their own winit dependency.
pub use winit::keyboard::{KeyCode, ModifiersState as Modifiers};

/// What happened to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Press,
    Release,
    /// Key held down long enough for the OS to auto-repeat it.
    Repeat,
}

impl Action {
    /// `Press` and `Repeat` both mean the key is down.
    pub fn is_down(self) -> bool {
        !matches!(self, Action::Release)
    }
}

/// A single keyboard notification as delivered to `on_key`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub key: KeyCode,
    /// Platform scancode, 0 when the platform can't provide one.
    pub scancode: u32,
    pub action: Action,
    pub modifiers: Modifiers,
}

impl KeyInput {
    pub fn new(key: KeyCode, action: Action) -> Self {
        Self {
            key,
            scancode: 0,
            action,
            modifiers: Modifiers::empty(),
        }
    }

    /// True for the initial press of `key` (auto-repeats excluded).
    pub fn pressed(&self, key: KeyCode) -> bool {
        self.key == key && self.action == Action::Press
    }
}

/// Keyboard and cursor state accumulated from the events the shell has
/// dispatched so far.
#[derive(Debug, Default)]
pub struct InputState {
    keys_down: HashSet<KeyCode>,
    modifiers: Modifiers,
    cursor_pos: (f64, f64),
}

impl InputState {
    pub fn new() -> Self {
        Default::default()
    }

    /// Record a key event.
    pub fn update_key(&mut self, input: &KeyInput) {
        if input.action.is_down() {
            self.keys_down.insert(input.key);
        } else {
            self.keys_down.remove(&input.key);
        }
        self.modifiers = input.modifiers;
    }

    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Modifiers active on the most recent key event.
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Record a cursor move, in window coordinates.
    pub fn set_cursor_position(&mut self, x: f64, y: f64) {
        self.cursor_pos = (x, y);
    }

    pub fn cursor_position(&self) -> (f64, f64) {
        self.cursor_pos
    }
}
