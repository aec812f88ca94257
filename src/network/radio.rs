//! Radio Transport
//!
//! Packet send/receive abstraction below the peer sync layer. Both calls
//! are non-blocking: the foreground loop polls the radio once per pass and
//! must never wait on it.

use std::io;
use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::UdpSocket;
use tokio::sync::mpsc;

/// Largest frame the radio will hand up.
pub const MAX_FRAME: usize = 64;

/// Radio errors.
#[derive(Debug, Error)]
pub enum RadioError {
    /// The other end is gone.
    #[error("radio link disconnected")]
    Disconnected,

    /// Transmit buffer full; the frame was not sent.
    #[error("radio busy")]
    Busy,

    /// Socket error.
    #[error("radio I/O error: {0}")]
    Io(#[from] io::Error),
}

/// A best-effort datagram link to the peer device.
pub trait Radio: Send {
    /// Queue one frame for transmission. Never blocks.
    fn send(&mut self, frame: &[u8]) -> Result<(), RadioError>;

    /// Take one received frame, if any. Never blocks.
    fn try_recv(&mut self) -> Result<Option<Vec<u8>>, RadioError>;
}

// =============================================================================
// LOOPBACK
// =============================================================================

/// In-process radio; one half of a connected pair.
#[derive(Debug)]
pub struct LoopbackRadio {
    tx: mpsc::UnboundedSender<Vec<u8>>,
    rx: mpsc::UnboundedReceiver<Vec<u8>>,
}

impl LoopbackRadio {
    /// Create two radios wired to each other.
    pub fn pair() -> (Self, Self) {
        let (a_tx, a_rx) = mpsc::unbounded_channel();
        let (b_tx, b_rx) = mpsc::unbounded_channel();
        (Self { tx: a_tx, rx: b_rx }, Self { tx: b_tx, rx: a_rx })
    }
}

impl Radio for LoopbackRadio {
    fn send(&mut self, frame: &[u8]) -> Result<(), RadioError> {
        self.tx
            .send(frame.to_vec())
            .map_err(|_| RadioError::Disconnected)
    }

    fn try_recv(&mut self) -> Result<Option<Vec<u8>>, RadioError> {
        match self.rx.try_recv() {
            Ok(frame) => Ok(Some(frame)),
            Err(mpsc::error::TryRecvError::Empty) => Ok(None),
            Err(mpsc::error::TryRecvError::Disconnected) => Err(RadioError::Disconnected),
        }
    }
}

// =============================================================================
// UDP
// =============================================================================

/// Datagram radio over UDP, for running the two devices as separate
/// processes.
#[derive(Debug)]
pub struct UdpRadio {
    socket: UdpSocket,
    peer: SocketAddr,
}

impl UdpRadio {
    /// Wrap a bound socket. Waits until the socket reports writable so the
    /// first `send` does not fail with `Busy`.
    pub async fn new(socket: UdpSocket, peer: SocketAddr) -> Result<Self, RadioError> {
        socket.writable().await?;
        Ok(Self { socket, peer })
    }

    /// Bind `local` and talk to `peer`.
    pub async fn bind(local: SocketAddr, peer: SocketAddr) -> Result<Self, RadioError> {
        let socket = UdpSocket::bind(local).await?;
        Self::new(socket, peer).await
    }

    /// Local socket address.
    pub fn local_addr(&self) -> Result<SocketAddr, RadioError> {
        Ok(self.socket.local_addr()?)
    }
}

impl Radio for UdpRadio {
    fn send(&mut self, frame: &[u8]) -> Result<(), RadioError> {
        match self.socket.try_send_to(frame, self.peer) {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Err(RadioError::Busy),
            Err(e) => Err(e.into()),
        }
    }

    fn try_recv(&mut self) -> Result<Option<Vec<u8>>, RadioError> {
        let mut buf = [0u8; MAX_FRAME];
        match self.socket.try_recv_from(&mut buf) {
            Ok((len, _from)) => Ok(Some(buf[..len].to_vec())),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
