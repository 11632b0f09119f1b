use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Directional state sampled once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    pub up: bool,
    pub down: bool,
}

impl InputState {
    pub const IDLE: Self = Self {
        up: false,
        down: false,
    };

    /// Net vertical direction: -1 up, 1 down, 0 for none or both.
    #[inline]
    pub fn vertical_axis(self) -> f64 {
        match (self.up, self.down) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

#[inline]
pub fn encode_input_byte(input: InputState) -> u8 {
    (if input.up { 0x01 } else { 0 }) | (if input.down { 0x02 } else { 0 })
}

/// Unused high bits are ignored rather than rejected.
#[inline]
pub fn decode_input_byte(byte: u8) -> InputState {
    InputState {
        up: (byte & 0x01) != 0,
        down: (byte & 0x02) != 0,
    }
}

/// Read-only view of the current directional input.
pub trait InputProvider {
    fn input_state(&self) -> InputState;
}

impl InputProvider for InputState {
    fn input_state(&self) -> InputState {
        *self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    Up,
    Down,
}

fn direction_for_key(key: &str) -> Option<Direction> {
    match key {
        "ArrowUp" | "w" | "W" => Some(Direction::Up),
        "ArrowDown" | "s" | "S" => Some(Direction::Down),
        _ => None,
    }
}

/// Tracks held keys from press/release events.
#[derive(Clone, Debug, Default)]
pub struct KeyboardInput {
    held: HashSet<String>,
}

impl KeyboardInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: &str) {
        self.held.insert(key.to_string());
    }

    pub fn key_up(&mut self, key: &str) {
        self.held.remove(key);
    }

    pub fn release_all(&mut self) {
        self.held.clear();
    }
}

impl InputProvider for KeyboardInput {
    fn input_state(&self) -> InputState {
        let mut state = InputState::IDLE;
        for key in &self.held {
            match direction_for_key(key) {
                Some(Direction::Up) => state.up = true,
                Some(Direction::Down) => state.down = true,
                None => {}
            }
        }
        state
    }
}
