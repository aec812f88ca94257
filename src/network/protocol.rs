//! Peer Sync Protocol
//!
//! Wire format for the radio link between the two devices. Packets are
//! bincode-encoded fixed-width structs, so every valid frame is exactly
//! [`PACKET_LEN`] bytes.

use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::core::grid::Point;
use crate::game::state::PlayerId;

/// First byte of every packet.
pub const PACKET_MAGIC: u8 = 0xB0;

/// Protocol version.
pub const PROTOCOL_VERSION: u8 = 1;

/// Encoded packet size.
pub const PACKET_LEN: usize = 8;

/// Packet decode/validation errors.
#[derive(Debug, Error)]
pub enum PacketError {
    /// Frame size is not [`PACKET_LEN`].
    #[error("packet is {0} bytes, expected 8")]
    WrongLength(usize),

    /// Bincode rejected the frame.
    #[error("decode failed: {0}")]
    Decode(#[from] bincode::Error),

    /// Foreign traffic on the channel.
    #[error("bad magic byte {0:#04x}")]
    BadMagic(u8),

    /// Peer speaks another protocol version.
    #[error("unsupported protocol version {0}")]
    UnsupportedVersion(u8),

    /// Player byte is neither Fox nor Wolf.
    #[error("unknown player {0}")]
    UnknownPlayer(u8),

    /// Action byte is not a known action.
    #[error("unknown action {0}")]
    UnknownAction(u8),

    /// Coordinates outside the grid.
    #[error("position ({x}, {y}) is outside the grid")]
    OutOfBounds {
        /// Column
        x: u8,
        /// Row
        y: u8,
    },
}

// =============================================================================
// ACTIONS
// =============================================================================

/// What the sender did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum SyncAction {
    /// Sender's player now stands at the position
    Position = 0,
    /// Sender's player planted a bomb at the position
    BombPlant = 1,
}

impl SyncAction {
    /// Get action from its wire value.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(SyncAction::Position),
            1 => Some(SyncAction::BombPlant),
            _ => None,
        }
    }
}

// =============================================================================
// PACKETS
// =============================================================================

/// Raw on-air packet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncPacket {
    /// Always [`PACKET_MAGIC`]
    pub magic: u8,
    /// Always [`PROTOCOL_VERSION`]
    pub version: u8,
    /// Acting player
    pub player: u8,
    /// Action kind
    pub action: u8,
    /// Column
    pub x: u8,
    /// Row
    pub y: u8,
    /// Per-sender sequence number
    pub seq: u16,
}

impl SyncPacket {
    /// Serialize to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Deserialize from bytes without validating fields.
    pub fn from_bytes(data: &[u8]) -> Result<Self, PacketError> {
        if data.len() != PACKET_LEN {
            return Err(PacketError::WrongLength(data.len()));
        }
        Ok(bincode::deserialize(data)?)
    }
}

/// A validated sync message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncMessage {
    /// Acting player
    pub player: PlayerId,
    /// Action kind
    pub action: SyncAction,
    /// In-bounds cell
    pub position: Point,
    /// Sender sequence number
    pub seq: u16,
}

impl SyncMessage {
    /// Create a message.
    pub fn new(player: PlayerId, action: SyncAction, position: Point, seq: u16) -> Self {
        Self {
            player,
            action,
            position,
            seq,
        }
    }

    /// Raw packet for this message.
    pub fn to_packet(&self) -> SyncPacket {
        SyncPacket {
            magic: PACKET_MAGIC,
            version: PROTOCOL_VERSION,
            player: self.player as u8,
            action: self.action as u8,
            x: self.position.x,
            y: self.position.y,
            seq: self.seq,
        }
    }

    /// Encode for sending.
    pub fn encode(&self) -> Result<Vec<u8>, bincode::Error> {
        self.to_packet().to_bytes()
    }

    /// Decode and validate a received frame.
    pub fn decode(data: &[u8]) -> Result<Self, PacketError> {
        Self::try_from(SyncPacket::from_bytes(data)?)
    }
}

impl TryFrom<SyncPacket> for SyncMessage {
    type Error = PacketError;

    fn try_from(packet: SyncPacket) -> Result<Self, Self::Error> {
        if packet.magic != PACKET_MAGIC {
            return Err(PacketError::BadMagic(packet.magic));
        }
        if packet.version != PROTOCOL_VERSION {
            return Err(PacketError::UnsupportedVersion(packet.version));
        }
        let player = PlayerId::from_u8(packet.player)
            .ok_or(PacketError::UnknownPlayer(packet.player))?;
        let action = SyncAction::from_u8(packet.action)
            .ok_or(PacketError::UnknownAction(packet.action))?;
        let position = Point::new(packet.x, packet.y);
        if !position.is_in_bounds() {
            return Err(PacketError::OutOfBounds { x: packet.x, y: packet.y });
        }

        Ok(Self::new(player, action, position, packet.seq))
    }
}
