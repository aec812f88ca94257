//! Runtime
//!
//! Binds the deterministic core to tokio: the bounded event queue, the
//! tick timer, the redraw signal and the per-device main loop.
//! This layer is **non-deterministic**; all game rules live in `game/`.

pub mod app;
pub mod queue;
pub mod redraw;
pub mod timer;

pub use app::{AppConfig, BomberApp, ConfigError, RadioKind, SharedState};
pub use queue::{event_queue, EventQueue, EventSender, QueueError, EVENT_QUEUE_CAPACITY};
pub use redraw::RedrawSignal;
pub use timer::TickTimer;
