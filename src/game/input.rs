//! Input Events
//!
//! Button events as reported by the hardware, and the tagged event type
//! carried by the event queue.

use serde::{Serialize, Deserialize};

use crate::game::movement::Direction;

/// Physical keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputKey {
    /// D-pad up
    Up,
    /// D-pad down
    Down,
    /// D-pad left
    Left,
    /// D-pad right
    Right,
    /// Centre button
    Ok,
    /// Back button
    Back,
}

impl InputKey {
    /// Direction for the four d-pad keys.
    pub fn direction(self) -> Option<Direction> {
        match self {
            InputKey::Up => Some(Direction::Up),
            InputKey::Down => Some(Direction::Down),
            InputKey::Left => Some(Direction::Left),
            InputKey::Right => Some(Direction::Right),
            InputKey::Ok | InputKey::Back => None,
        }
    }
}

/// How the key was pressed.
///
/// The button driver reports every edge; only `Short` and `Long` carry
/// meaning for the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputType {
    /// Key went down
    Press,
    /// Key went up
    Release,
    /// Short press completed
    Short,
    /// Long press threshold reached
    Long,
    /// Auto-repeat while held
    Repeat,
}

/// A button event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputEvent {
    /// Which key
    pub key: InputKey,
    /// Press type
    pub kind: InputType,
}

impl InputEvent {
    /// Create an event.
    pub const fn new(key: InputKey, kind: InputType) -> Self {
        Self { key, kind }
    }

    /// Short press of `key`.
    pub const fn short(key: InputKey) -> Self {
        Self::new(key, InputType::Short)
    }

    /// Long press of `key`.
    pub const fn long(key: InputKey) -> Self {
        Self::new(key, InputType::Long)
    }

    /// Is this the long Back press that quits from anywhere?
    #[inline]
    pub fn is_quit(&self) -> bool {
        self.kind == InputType::Long && self.key == InputKey::Back
    }
}

/// An entry in the event queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BomberEvent {
    /// Periodic timer fired
    Tick,
    /// Button event
    Input(InputEvent),
}

impl From<InputEvent> for BomberEvent {
    fn from(input: InputEvent) -> Self {
        BomberEvent::Input(input)
    }
}
