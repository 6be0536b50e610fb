//! Room configuration and lifecycle phase.

use serde::{Deserialize, Serialize};
use slideforge_engine::GameSession;

// ---------------------------------------------------------------------------
// RoomConfig
// ---------------------------------------------------------------------------

/// Settings shared by every room a registry creates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    /// Capacity of each room actor's command channel. Senders wait when
    /// it is full.
    pub channel_size: usize,

    /// Length of generated room codes.
    pub room_code_len: usize,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            channel_size: 64,
            room_code_len: 6,
        }
    }
}

// ---------------------------------------------------------------------------
// RoomPhase
// ---------------------------------------------------------------------------

/// The lifecycle phase of a room.
///
/// ```text
/// Lobby → InProgress → Finished
/// ```
///
/// - **Lobby**: seats are being filled; `startGame` has not been sent.
/// - **InProgress**: turns are being played. No more joins.
/// - **Finished**: someone won. Every action is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomPhase {
    Lobby,
    InProgress,
    Finished,
}

impl RoomPhase {
    /// The phase a session is in.
    pub fn of(session: &GameSession) -> Self {
        if session.is_game_over() {
            Self::Finished
        } else if session.is_started() {
            Self::InProgress
        } else {
            Self::Lobby
        }
    }

    /// Returns `true` if the room is accepting new players.
    pub fn is_joinable(&self) -> bool {
        matches!(self, Self::Lobby)
    }
}

impl std::fmt::Display for RoomPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lobby => write!(f, "Lobby"),
            Self::InProgress => write!(f, "InProgress"),
            Self::Finished => write!(f, "Finished"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slideforge_engine::{start_game, ClientId, RoomId};

    #[test]
    fn test_phase_follows_session() {
        let mut session = GameSession::new(RoomId("PHASE1".into()));
        session.seat(ClientId(1), "ann");
        assert_eq!(RoomPhase::of(&session), RoomPhase::Lobby);

        start_game(&mut session).unwrap();
        assert_eq!(RoomPhase::of(&session), RoomPhase::InProgress);
    }

    #[test]
    fn test_phase_is_joinable() {
        assert!(RoomPhase::Lobby.is_joinable());
        assert!(!RoomPhase::InProgress.is_joinable());
        assert!(!RoomPhase::Finished.is_joinable());
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(RoomPhase::InProgress.to_string(), "InProgress");
    }

    #[test]
    fn test_room_config_default() {
        let config = RoomConfig::default();
        assert_eq!(config.channel_size, 64);
        assert_eq!(config.room_code_len, 6);
    }

    #[test]
    fn test_room_config_fills_missing_fields() {
        let config: RoomConfig = serde_json::from_str(r#"{"room_code_len": 4}"#).unwrap();
        assert_eq!(config.room_code_len, 4);
        assert_eq!(config.channel_size, 64);
    }
}
