//! Unified error type for the Slideforge server.

use slideforge_protocol::ProtocolError;
use slideforge_room::RoomError;
use tokio_tungstenite::tungstenite;

/// Top-level error that wraps all crate-specific errors.
///
/// Turn errors arrive wrapped in [`RoomError::Turn`], since every action
/// reaches the coordinator through a room.
#[derive(Debug, thiserror::Error)]
pub enum SlideforgeError {
    /// A frame could not be decoded or an event could not be encoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A room or turn request was rejected.
    #[error(transparent)]
    Room(#[from] RoomError),

    /// The WebSocket handshake or stream failed.
    #[error("websocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    /// Binding or accepting on the listener failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl SlideforgeError {
    /// Returns `true` if the error is a server bug. Clients only ever see a
    /// generic message for these.
    pub fn is_internal(&self) -> bool {
        match self {
            Self::Room(e) => e.is_internal(),
            Self::Protocol(ProtocolError::Encode(_)) => true,
            _ => false,
        }
    }
}
