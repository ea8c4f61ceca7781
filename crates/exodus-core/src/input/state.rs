//! Frame input.
//!
//! The shell owns raw key capture; the core only ever sees a per-frame
//! snapshot. `InputState` is built once at the top of a tick and threaded
//! down by value — nothing in the simulation reaches for global key state.

/// The named keys the simulation cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Space,
}

/// Boundary contract with the shell's input capture: current key state,
/// polled once per frame. The core never receives key events.
pub trait KeySource {
    fn is_key_down(&self, key: Key) -> bool;
}

/// The four ship controls for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
}

impl InputState {
    pub const NONE: InputState = InputState {
        forward: false,
        back: false,
        left: false,
        right: false,
    };

    /// Snapshot the control state from a key source, applying the WASD /
    /// arrow / space bindings.
    pub fn sample(keys: &impl KeySource) -> Self {
        InputState {
            forward: keys.is_key_down(Key::W) || keys.is_key_down(Key::ArrowUp),
            back: keys.is_key_down(Key::S)
                || keys.is_key_down(Key::ArrowDown)
                || keys.is_key_down(Key::Space),
            left: keys.is_key_down(Key::A) || keys.is_key_down(Key::ArrowLeft),
            right: keys.is_key_down(Key::D) || keys.is_key_down(Key::ArrowRight),
        }
    }
}

/// A plain held-key set. Handy for shells that track keys themselves and
/// for driving the simulation from tests.
#[derive(Debug, Clone, Default)]
pub struct HeldKeys {
    held: Vec<Key>,
}

impl HeldKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: Key) {
        if !self.held.contains(&key) {
            self.held.push(key);
        }
    }

    pub fn release(&mut self, key: Key) {
        self.held.retain(|k| *k != key);
    }
}

impl KeySource for HeldKeys {
    fn is_key_down(&self, key: Key) -> bool {
        self.held.contains(&key)
    }
}
