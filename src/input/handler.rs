use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::Direction;

/// IME "process" key code reported while a composition is in flight
pub const COMPOSITION_KEY_CODE: u32 = 229;

/// A raw key-down event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInput {
    /// Key name, e.g. `"w"`, `"ArrowUp"`
    pub key: String,
    /// Part of an IME composition
    pub is_composing: bool,
    pub key_code: u32,
}

impl KeyInput {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            is_composing: false,
            key_code: 0,
        }
    }

    pub fn composing(key: impl Into<String>) -> Self {
        Self {
            is_composing: true,
            ..Self::new(key)
        }
    }

    fn is_composition(&self) -> bool {
        self.is_composing || self.key_code == COMPOSITION_KEY_CODE
    }
}

/// Turns key events into the direction the next tick will use
///
/// Only the latest accepted key between two ticks survives. A key asking for
/// the exact opposite of the last committed direction is dropped.
#[derive(Debug, Clone, Default)]
pub struct InputMapper {
    committed: Direction,
    pending: Direction,
}

impl InputMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a key name to a direction, case-insensitively
    pub fn map_key(key: &str) -> Option<Direction> {
        match key.to_ascii_lowercase().as_str() {
            "w" | "arrowup" => Some(Direction::Up),
            "s" | "arrowdown" => Some(Direction::Down),
            "a" | "arrowleft" => Some(Direction::Left),
            "d" | "arrowright" => Some(Direction::Right),
            _ => None,
        }
    }

    /// Record a key press. Returns whether it changed the pending direction.
    pub fn on_key_event(&mut self, event: &KeyInput) -> bool {
        if event.is_composition() {
            return false;
        }

        match Self::map_key(&event.key) {
            Some(direction) if !self.committed.is_opposite(direction) => {
                self.pending = direction;
                true
            }
            _ => false,
        }
    }

    /// Direction the next tick will consume
    pub fn current_direction(&self) -> Direction {
        self.pending
    }

    /// Direction the last tick consumed
    pub fn committed_direction(&self) -> Direction {
        self.committed
    }

    /// Consume the pending direction for this tick.
    pub fn commit(&mut self) -> Direction {
        self.committed = self.pending;
        self.committed
    }
}

/// What a terminal key press means to the front end
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Steer(KeyInput),
    Restart,
    Quit,
    None,
}

/// Translates crossterm key events into [`KeyAction`]s
pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            KeyCode::Up => KeyAction::Steer(KeyInput::new("ArrowUp")),
            KeyCode::Down => KeyAction::Steer(KeyInput::new("ArrowDown")),
            KeyCode::Left => KeyAction::Steer(KeyInput::new("ArrowLeft")),
            KeyCode::Right => KeyAction::Steer(KeyInput::new("ArrowRight")),

            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,
            KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Restart,

            // Everything else goes to the mapper, which ignores what it does not know
            KeyCode::Char(c) => KeyAction::Steer(KeyInput::new(c.to_string())),

            _ => KeyAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
