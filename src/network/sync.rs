//! Peer Sync Transceiver
//!
//! Replicates local player actions to the peer device and applies the
//! peer's actions to our copy of the remote player. Best effort only:
//! no acks, no retries, last write wins.

use serde::{Serialize, Deserialize};
use tracing::{debug, trace, warn};

use crate::game::events::{GameEvent, GameEventData};
use crate::game::state::{Bomb, GameState};
use crate::network::protocol::{SyncAction, SyncMessage};
use crate::network::radio::{Radio, RadioError};

/// Frames drained per poll.
pub const MAX_FRAMES_PER_POLL: usize = 16;

/// Transceiver counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncStats {
    /// Frames handed to the radio
    pub sent: u64,
    /// Inbound messages applied
    pub applied: u64,
    /// Inbound frames dropped (malformed or naming the local player)
    pub dropped: u64,
    /// Sends the radio refused
    pub send_failures: u64,
    /// Sequence discontinuities seen
    pub seq_gaps: u64,
}

/// Peer sync over a radio.
pub struct PeerSync<R: Radio> {
    radio: R,
    next_seq: u16,
    last_seq: Option<u16>,
    link_up: bool,
    stats: SyncStats,
}

impl<R: Radio> PeerSync<R> {
    /// Create a transceiver.
    pub fn new(radio: R) -> Self {
        Self {
            radio,
            next_seq: 0,
            last_seq: None,
            link_up: true,
            stats: SyncStats::default(),
        }
    }

    /// Counters so far.
    pub fn stats(&self) -> SyncStats {
        self.stats
    }

    /// Send every outbound event. Fire-and-forget; returns frames sent.
    pub fn broadcast(&mut self, events: &[GameEvent]) -> usize {
        let mut sent = 0;
        for event in events {
            let msg = match &event.data {
                GameEventData::PlayerMoved { player_id, position } => {
                    SyncMessage::new(*player_id, SyncAction::Position, *position, self.next_seq)
                }
                GameEventData::BombPlanted { player_id, position, .. } => {
                    SyncMessage::new(*player_id, SyncAction::BombPlant, *position, self.next_seq)
                }
                _ => continue,
            };
            if self.send(&msg) {
                sent += 1;
            }
        }
        sent
    }

    fn send(&mut self, msg: &SyncMessage) -> bool {
        self.next_seq = self.next_seq.wrapping_add(1);

        let frame = match msg.encode() {
            Ok(frame) => frame,
            Err(e) => {
                debug!("Failed to encode sync message: {}", e);
                return false;
            }
        };

        match self.radio.send(&frame) {
            Ok(()) => {
                trace!("Sent {:?} #{} at {}", msg.action, msg.seq, msg.position);
                self.stats.sent += 1;
                true
            }
            Err(e) => {
                debug!("Sync send failed: {}", e);
                self.stats.send_failures += 1;
                false
            }
        }
    }

    /// Drain pending frames into `state`. Returns true if anything changed.
    pub fn poll(&mut self, state: &mut GameState) -> bool {
        let mut changed = false;

        for _ in 0..MAX_FRAMES_PER_POLL {
            let frame = match self.radio.try_recv() {
                Ok(Some(frame)) => frame,
                Ok(None) => break,
                Err(RadioError::Disconnected) => {
                    if self.link_up {
                        warn!("Peer radio link disconnected");
                        self.link_up = false;
                    }
                    break;
                }
                Err(e) => {
                    debug!("Radio receive error: {}", e);
                    break;
                }
            };

            match SyncMessage::decode(&frame) {
                Ok(msg) => changed |= self.apply(state, msg),
                Err(e) => {
                    debug!("Dropping sync frame: {}", e);
                    self.stats.dropped += 1;
                }
            }
        }

        changed
    }

    /// Apply one inbound message to the remote player.
    pub fn apply(&mut self, state: &mut GameState, msg: SyncMessage) -> bool {
        if msg.player == state.local_id() {
            debug!("Dropping sync message for local player {}", msg.player.name());
            self.stats.dropped += 1;
            return false;
        }

        if let Some(last) = self.last_seq {
            let expected = last.wrapping_add(1);
            if msg.seq != expected {
                debug!("Sync sequence gap: expected #{}, got #{}", expected, msg.seq);
                self.stats.seq_gaps += 1;
            }
        }
        self.last_seq = Some(msg.seq);
        self.stats.applied += 1;

        let now = state.now;
        let player = state.player_mut(msg.player);
        match msg.action {
            SyncAction::Position => {
                if player.position == msg.position {
                    return false;
                }
                player.position = msg.position;
            }
            SyncAction::BombPlant => {
                let slot = player.place_bomb(Bomb::planted(msg.position, now));
                debug!("Peer {} planted bomb {} at {}", msg.player.name(), slot, msg.position);
            }
        }
        true
    }
}
