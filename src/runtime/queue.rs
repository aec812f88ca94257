//! Event Queue
//!
//! Bounded FIFO between the event producers (tick timer, buttons) and the
//! foreground loop. The only blocking point in the loop is
//! [`EventQueue::next`], which waits at most the given timeout.

use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc;

use crate::game::input::BomberEvent;

/// Queue capacity.
pub const EVENT_QUEUE_CAPACITY: usize = 8;

/// Queue status other than "got an event".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueueError {
    /// Nothing arrived within the wait bound.
    #[error("timed out waiting for an event")]
    Timeout,

    /// Queue full; the event was not enqueued.
    #[error("event queue full")]
    Full,

    /// The other side has gone away.
    #[error("event queue closed")]
    Closed,
}

/// Create a connected sender/queue pair.
pub fn event_queue() -> (EventSender, EventQueue) {
    let (tx, rx) = mpsc::channel(EVENT_QUEUE_CAPACITY);
    (EventSender { tx }, EventQueue { rx })
}

/// Producer side. Cheap to clone.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::Sender<BomberEvent>,
}

impl EventSender {
    /// Enqueue without waiting; fails if the queue is full.
    pub fn try_push(&self, event: BomberEvent) -> Result<(), QueueError> {
        self.tx.try_send(event).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => QueueError::Full,
            mpsc::error::TrySendError::Closed(_) => QueueError::Closed,
        })
    }

    /// Enqueue, waiting for room.
    pub async fn push(&self, event: BomberEvent) -> Result<(), QueueError> {
        self.tx.send(event).await.map_err(|_| QueueError::Closed)
    }

    /// Has the consumer gone away?
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consumer side, owned by the foreground loop.
#[derive(Debug)]
pub struct EventQueue {
    rx: mpsc::Receiver<BomberEvent>,
}

impl EventQueue {
    /// Next event in FIFO order, waiting at most `timeout`.
    pub async fn next(&mut self, timeout: Duration) -> Result<BomberEvent, QueueError> {
        match tokio::time::timeout(timeout, self.rx.recv()).await {
            Ok(Some(event)) => Ok(event),
            Ok(None) => Err(QueueError::Closed),
            Err(_) => Err(QueueError::Timeout),
        }
    }

    /// Stop accepting new events. Already queued events can still be read.
    pub fn close(&mut self) {
        self.rx.close();
    }
}
