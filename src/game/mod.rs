//! Game Logic Module
//!
//! Everything that mutates game state. Deterministic: time is the tick
//! counter, and nothing in here touches the queue, the radio or the clock.
//!
//! ## Module Structure
//!
//! - `input`: Button events and the queued event type
//! - `mode`: Application mode state machine and input routing
//! - `state`: Players, bomb rings and the shared game state
//! - `movement`: Grid-step movement and collision
//! - `bomb`: Bomb lifecycle timer engine and blasts
//! - `dispatch`: Applies one queued event to the state
//! - `events`: Game events drained after each dispatch

pub mod input;
pub mod mode;
pub mod state;
pub mod movement;
pub mod bomb;
pub mod dispatch;
pub mod events;

// Re-export key types
pub use input::{BomberEvent, InputEvent, InputKey, InputType};
pub use mode::{AppMode, InputRoute, route_input};
pub use state::{Bomb, BombState, GameState, Player, PlayerId, BOMB_SLOTS};
pub use movement::{Direction, move_player, resolve_move};
pub use bomb::{BlastPolicy, BombTimings, clear_blast, tick_bombs};
pub use dispatch::{GameRules, handle_event};
pub use events::{GameEvent, GameEventData};
