//! Tick Timer
//!
//! Periodic tick source. It only enqueues: no state is touched here, and a
//! full queue drops the tick rather than waiting.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, trace};

use crate::game::input::BomberEvent;
use crate::runtime::queue::{EventSender, QueueError};

/// Background tick task. Stops when dropped.
#[derive(Debug)]
pub struct TickTimer {
    handle: JoinHandle<()>,
}

impl TickTimer {
    /// Start ticking every `period`. Must be called inside a tokio runtime.
    pub fn spawn(sender: EventSender, period: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // First tick completes immediately.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                match sender.try_push(BomberEvent::Tick) {
                    Ok(()) => {}
                    Err(QueueError::Full) => trace!("Event queue full, tick dropped"),
                    Err(_) => {
                        debug!("Event queue closed, tick timer stopping");
                        break;
                    }
                }
            }
        });

        Self { handle }
    }

    /// Has the tick task exited?
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Stop ticking.
    pub fn stop(&self) {
        self.handle.abort();
    }
}

impl Drop for TickTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
