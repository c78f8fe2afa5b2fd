//! # Collaborator Interfaces
//!
//! The engine neither polls hardware nor draws pixels; it consumes a
//! [`Controller`] for edge-triggered button input and leaves rendering to
//! whoever implements [`PixelDisplay`]. Persisted values (last winner, win
//! tallies) go through an opaque [`KeyValueStore`].
//!
//! [`Keypad`] is the reference `Controller`: embedders feed it raw
//! press/release transitions and the engine consumes fresh edges from it.

use std::collections::HashMap;

/// The buttons the engine reads. `A` confirms, `B` backs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
    A,
    B,
}

const BUTTON_COUNT: usize = 6;

impl Button {
    fn index(self) -> usize {
        match self {
            Button::Up => 0,
            Button::Down => 1,
            Button::Left => 2,
            Button::Right => 3,
            Button::A => 4,
            Button::B => 5,
        }
    }
}

/// Edge-triggered button input.
///
/// `fresh_press` reports a press exactly once: reading the edge consumes
/// it. The engine only ever acts on fresh presses, so holding a button does
/// not repeat an action.
pub trait Controller {
    /// Current level of the button.
    fn is_pressed(&self, button: Button) -> bool;
    /// True once per press transition; consumes the edge.
    fn fresh_press(&mut self, button: Button) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
struct ButtonState {
    value: bool,
    fresh: bool,
}

/// A concrete [`Controller`] holding per-button edge state.
///
/// The embedder calls [`Keypad::press`]/[`Keypad::release`] from its input
/// source; the engine consumes the edges during `update`.
#[derive(Debug, Clone, Default)]
pub struct Keypad {
    states: [ButtonState; BUTTON_COUNT],
}

impl Keypad {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a press transition. Re-pressing an already-held button is a
    /// no-op; the edge stays unread.
    pub fn press(&mut self, button: Button) {
        let state = &mut self.states[button.index()];
        if !state.value {
            state.value = true;
            state.fresh = true;
        }
    }

    /// Records a release transition.
    pub fn release(&mut self, button: Button) {
        let state = &mut self.states[button.index()];
        if state.value {
            state.value = false;
            state.fresh = true;
        }
    }
}

impl Controller for Keypad {
    fn is_pressed(&self, button: Button) -> bool {
        self.states[button.index()].value
    }

    fn fresh_press(&mut self, button: Button) -> bool {
        let state = &mut self.states[button.index()];
        if state.value && state.fresh {
            state.fresh = false;
            true
        } else {
            false
        }
    }
}

/// A rectangular pixel surface the application layer renders boards onto.
///
/// The engine never chooses colors; it exposes cell states and winning
/// cells, and the caller maps them to RGB values.
pub trait PixelDisplay {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    /// Stages a color change for one pixel.
    fn set_pixel(&mut self, x: usize, y: usize, color: (u8, u8, u8));
    /// Makes all staged changes visible.
    fn flush(&mut self);
}

/// Opaque named-value persistence, e.g. for win tallies. The storage
/// format is the embedder's concern.
pub trait KeyValueStore {
    fn load_value(&self, key: &str) -> Option<String>;
    fn save_value(&mut self, key: &str, value: &str);
}

/// In-memory [`KeyValueStore`] for tests and short-lived sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn load_value(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn save_value(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}
