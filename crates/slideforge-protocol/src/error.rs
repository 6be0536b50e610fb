//! Error types for the protocol layer.
//!
//! When you see a `ProtocolError`, the problem is in turning frames into
//! messages (or back), never in game rules or room membership.

use slideforge_engine::InvalidPosition;

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: malformed JSON, an unknown `type`, missing
    /// fields, or wrong field types.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The message parsed but does not make sense, e.g. a
    /// `positionIndex` outside the board.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}

impl From<InvalidPosition> for ProtocolError {
    fn from(err: InvalidPosition) -> Self {
        Self::InvalidMessage(err.to_string())
    }
}
