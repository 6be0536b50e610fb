//! Error types for the rules engine.

use crate::pawn::{PawnKey, Position};
use crate::session::TurnState;

/// Why a player action was rejected.
///
/// Every variant except [`TurnError::Internal`] is the player's fault and is
/// reported back to the acting connection as-is. In every case the session
/// is left exactly as it was before the action.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TurnError {
    /// The host has not started the game yet.
    #[error("the game has not started")]
    NotStarted,

    /// The game already has a winner. Nothing more can happen in this room.
    #[error("the game is over")]
    GameOver,

    /// Someone other than the current player tried to act.
    #[error("it is not your turn (player {current} is playing)")]
    NotYourTurn { player: usize, current: usize },

    /// The action does not fit the current turn sub-state.
    #[error("cannot {action} while in state {state}")]
    WrongState {
        action: &'static str,
        state: TurnState,
    },

    /// The pawn is not one of the published selectable pawns.
    #[error("pawn {0} cannot be selected")]
    InvalidPawn(usize),

    /// The destination is not one of the published valid moves.
    #[error("{0} is not a valid move")]
    InvalidMove(Position),

    /// The target is not one of the published targetable opponents.
    #[error("{0} is not a valid target")]
    InvalidTarget(PawnKey),

    /// The target belongs to the acting player.
    #[error("you cannot target your own pawn")]
    OwnTarget,

    /// A session invariant did not hold. The action was aborted.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TurnError {
    /// Returns `true` if this error points at a bug rather than a bad action.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Internal(_))
    }
}
