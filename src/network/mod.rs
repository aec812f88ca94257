//! Network Layer
//!
//! Peer sync between the two devices over a short-range radio link.
//! This layer is **best effort**: lost or reordered packets are never
//! recovered, and all game rules stay in `game/`.

pub mod protocol;
pub mod radio;
pub mod sync;

pub use protocol::{
    PacketError, SyncAction, SyncMessage, SyncPacket, PACKET_LEN, PACKET_MAGIC, PROTOCOL_VERSION,
};
pub use radio::{LoopbackRadio, Radio, RadioError, UdpRadio};
pub use sync::{PeerSync, SyncStats, MAX_FRAMES_PER_POLL};
