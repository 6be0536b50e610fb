//! Error types for the room layer.

use slideforge_engine::{ClientId, RoomId, TurnError};

/// Errors that can occur during room operations.
///
/// None of these close the connection; the gateway reports them as a
/// `gameError` and keeps reading.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// No room with this code exists.
    #[error("room {0} not found")]
    NotFound(RoomId),

    /// Every seat has been taken.
    #[error("room {0} is full")]
    RoomFull(RoomId),

    /// The room no longer accepts joins or a second start.
    #[error("the game in room {0} has already started")]
    GameAlreadyStarted(RoomId),

    /// The client already holds a seat somewhere.
    #[error("client {0} is already in room {1}")]
    AlreadyInRoom(ClientId, RoomId),

    /// The client holds no seat.
    #[error("client {0} is not in a room")]
    NotInRoom(ClientId),

    /// The room's command channel is full or closed.
    #[error("room {0} is unavailable")]
    Unavailable(RoomId),

    /// The turn coordinator rejected the action.
    #[error(transparent)]
    Turn(#[from] TurnError),
}

impl RoomError {
    /// Returns `true` if this error points at a bug rather than a bad
    /// request.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Turn(e) if e.is_internal())
    }
}
