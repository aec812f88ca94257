//! # Bomber Core
//!
//! Real-time simulation core for a two-player grid bombing game, built for
//! small devices linked by a short-range radio.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       BOMBER CORE                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Plain data, no I/O                        │
//! │  ├── grid.rs     - 16x8 terrain grid, bounds-checked         │
//! │  ├── level.rs    - Level text format and spawn points        │
//! │  └── hash.rs     - State hashing for cross-device checks     │
//! │                                                              │
//! │  game/           - Game logic (deterministic)                │
//! │  ├── input.rs    - Button events and queued events           │
//! │  ├── mode.rs     - Application mode state machine            │
//! │  ├── state.rs    - Players, bomb rings, game state           │
//! │  ├── movement.rs - Grid movement and collision               │
//! │  ├── bomb.rs     - Bomb timer engine and blasts              │
//! │  └── dispatch.rs - Applies one event to the state            │
//! │                                                              │
//! │  network/        - Peer sync (best effort)                   │
//! │  ├── protocol.rs - 8-byte sync packets                       │
//! │  ├── radio.rs    - Radio trait, loopback and UDP             │
//! │  └── sync.rs     - Outbound replication, inbound apply       │
//! │                                                              │
//! │  runtime/        - tokio bindings (non-deterministic)        │
//! │  ├── queue.rs    - Bounded event queue (capacity 8)          │
//! │  ├── timer.rs    - Periodic tick source                      │
//! │  ├── redraw.rs   - Fire-and-forget redraw signal             │
//! │  └── app.rs      - Config and the main loop                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Data Flow
//!
//! ```text
//! timer ──Tick──┐
//!               ├─> queue ─> main loop ─> dispatch ─> bomb engine ─> redraw
//! buttons ─Input┘                │             └─> movement / plant ─> radio
//! radio ─> peer sync ────────────┘ (polled every pass)
//! ```
//!
//! ## Determinism
//!
//! The `core/` and `game/` modules never read a clock: time is the tick
//! counter advanced by the main loop. Two devices fed the same events end
//! in the same state hash.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod network;
pub mod runtime;

// Re-export commonly used types
pub use crate::core::grid::{CellType, Point, TerrainGrid, GRID_HEIGHT, GRID_WIDTH};
pub use crate::core::level::Level;
pub use crate::game::input::{BomberEvent, InputEvent, InputKey, InputType};
pub use crate::game::mode::AppMode;
pub use crate::game::state::{GameState, PlayerId};
pub use crate::network::radio::{LoopbackRadio, Radio, UdpRadio};
pub use crate::runtime::app::{AppConfig, BomberApp};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
