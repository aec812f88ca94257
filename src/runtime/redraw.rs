//! Redraw Signal
//!
//! Fire-and-forget "please repaint" notification. The renderer watches a
//! counter; requests made faster than it can draw coalesce.

use std::sync::Arc;

use tokio::sync::watch;

/// Redraw request broadcaster.
#[derive(Debug, Clone)]
pub struct RedrawSignal {
    tx: Arc<watch::Sender<u64>>,
}

impl Default for RedrawSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl RedrawSignal {
    /// Create a signal with no listeners.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(0);
        Self { tx: Arc::new(tx) }
    }

    /// Request a redraw. Never blocks, never fails.
    pub fn request(&self) {
        self.tx.send_modify(|n| *n = n.wrapping_add(1));
    }

    /// Total requests so far.
    pub fn count(&self) -> u64 {
        *self.tx.borrow()
    }

    /// Listen for requests.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.tx.subscribe()
    }
}
