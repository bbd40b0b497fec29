//! Logical keyboard state.
//!
//! The host translates its own key events into [`Key`] values and forwards
//! them to `compute::key_down` / `compute::key_up`.  Held keys drive movement;
//! the pressed set holds edge-triggered presses and is cleared after every tick.

use std::collections::HashSet;

use crate::challenge::Direction;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    /// Fire.
    Space,
    /// Bomb.
    Shift,
    /// Pause toggle.
    Escape,
    /// Any key without a gameplay binding; still dismisses menus.
    Other,
}

impl Key {
    /// Arrow keys double as reaction-challenge directions.
    pub fn challenge_direction(self) -> Option<Direction> {
        match self {
            Key::ArrowUp => Some(Direction::Up),
            Key::ArrowDown => Some(Direction::Down),
            Key::ArrowLeft => Some(Direction::Left),
            Key::ArrowRight => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Directions the ship is being steered this tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Movement {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

#[derive(Clone, Debug, Default)]
pub struct InputState {
    held: HashSet<Key>,
    pressed: HashSet<Key>,
}

impl InputState {
    pub fn press(&mut self, key: Key) {
        self.held.insert(key);
        self.pressed.insert(key);
    }

    pub fn release(&mut self, key: Key) {
        self.held.remove(&key);
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn was_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    pub fn movement(&self) -> Movement {
        Movement {
            up: self.is_held(Key::W) || self.is_held(Key::ArrowUp),
            down: self.is_held(Key::S) || self.is_held(Key::ArrowDown),
            left: self.is_held(Key::A) || self.is_held(Key::ArrowLeft),
            right: self.is_held(Key::D) || self.is_held(Key::ArrowRight),
        }
    }

    /// Forget this tick's edge-triggered presses.
    pub fn end_tick(&mut self) {
        self.pressed.clear();
    }

    pub fn clear(&mut self) {
        self.held.clear();
        self.pressed.clear();
    }
}
