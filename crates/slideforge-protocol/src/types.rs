//! Every message that travels between a browser and the server.
//!
//! Frames are JSON objects, internally tagged with a camelCase `"type"`:
//!
//! ```text
//! client → server   { "type": "selectMove", "positionType": "board", "positionIndex": 4 }
//! server → client   { "type": "yourTurn", "currentPlayerIndex": 1 }
//! ```

use serde::{Deserialize, Serialize};

use slideforge_engine::{
    GameSnapshot, PawnKey, PlayerSummary, Position, PositionType, RoomId, TurnAction,
};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// ClientMessage
// ---------------------------------------------------------------------------

/// Client → server messages.
///
/// `#[serde(tag = "type")]` produces internally tagged JSON:
///   `{ "type": "selectPawn", "pawnId": 2 }`
/// rather than `{ "selectPawn": { "pawnId": 2 } }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    // -- Room management --
    /// Open a new room and take seat 0.
    #[serde(rename_all = "camelCase")]
    CreateRoom {
        #[serde(default)]
        player_name: String,
    },

    /// Take the next free seat in an existing room.
    #[serde(rename_all = "camelCase")]
    JoinRoom {
        room_code: String,
        #[serde(default)]
        player_name: String,
    },

    /// Begin play. Any seated player may send it once.
    StartGame,

    /// Give up the seat. Same effect as closing the connection.
    LeaveRoom,

    // -- Turn actions --
    DrawCard,

    #[serde(rename_all = "camelCase")]
    SelectPawn { pawn_id: usize },

    /// `steps` is required for 7 moves and ignored otherwise.
    #[serde(rename_all = "camelCase")]
    SelectMove {
        position_type: PositionType,
        position_index: i8,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        steps: Option<u8>,
    },

    #[serde(rename_all = "camelCase")]
    ExecuteSorry {
        target_pawn_id: usize,
        target_player_index: usize,
    },

    #[serde(rename_all = "camelCase")]
    ExecuteSwap {
        target_pawn_id: usize,
        target_player_index: usize,
    },
}

/// A decoded client message, split by which layer handles it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Handled by the registry itself.
    Room(RoomRequest),
    /// Forwarded to the player's room and applied by the turn coordinator.
    Turn(TurnAction),
}

/// Room membership requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomRequest {
    Create { player_name: String },
    Join { room_id: RoomId, player_name: String },
    Start,
    Leave,
}

impl ClientMessage {
    /// Converts the wire message into a typed request.
    ///
    /// # Errors
    /// Returns `ProtocolError::InvalidMessage` when a position does not
    /// name a real cell.
    pub fn into_request(self) -> Result<Request, ProtocolError> {
        let request = match self {
            Self::CreateRoom { player_name } => Request::Room(RoomRequest::Create { player_name }),
            Self::JoinRoom {
                room_code,
                player_name,
            } => Request::Room(RoomRequest::Join {
                room_id: RoomId::parse(&room_code),
                player_name,
            }),
            Self::StartGame => Request::Room(RoomRequest::Start),
            Self::LeaveRoom => Request::Room(RoomRequest::Leave),
            Self::DrawCard => Request::Turn(TurnAction::DrawCard),
            Self::SelectPawn { pawn_id } => Request::Turn(TurnAction::SelectPawn { pawn_id }),
            Self::SelectMove {
                position_type,
                position_index,
                steps,
            } => Request::Turn(TurnAction::SelectMove {
                position: Position::from_parts(position_type, position_index)?,
                steps,
            }),
            Self::ExecuteSorry {
                target_pawn_id,
                target_player_index,
            } => Request::Turn(TurnAction::ExecuteSorry {
                target: PawnKey::new(target_player_index, target_pawn_id),
            }),
            Self::ExecuteSwap {
                target_pawn_id,
                target_player_index,
            } => Request::Turn(TurnAction::ExecuteSwap {
                target: PawnKey::new(target_player_index, target_pawn_id),
            }),
        };
        Ok(request)
    }
}

// ---------------------------------------------------------------------------
// ServerEvent
// ---------------------------------------------------------------------------

/// Server → client events.
///
/// `state` is always the full snapshot, never a delta. It is boxed to
/// keep the small variants small.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerEvent {
    /// To the host, after `createRoom`.
    #[serde(rename_all = "camelCase")]
    RoomCreated {
        room_id: RoomId,
        state: Box<GameSnapshot>,
        players: Vec<PlayerSummary>,
    },

    /// To the joiner, after `joinRoom`.
    #[serde(rename_all = "camelCase")]
    RoomJoined {
        room_id: RoomId,
        your_player_index: usize,
        state: Box<GameSnapshot>,
        players: Vec<PlayerSummary>,
    },

    /// To the leaver, after `leaveRoom`.
    #[serde(rename_all = "camelCase")]
    RoomLeft { room_id: RoomId },

    /// To everyone seated, whenever the seat list changes.
    RoomInfoUpdate { players: Vec<PlayerSummary> },

    /// To everyone seated, after every accepted change.
    GameStateUpdate { state: Box<GameSnapshot> },

    #[serde(rename_all = "camelCase")]
    YourTurn { current_player_index: usize },

    /// To the acting connection only.
    GameError { message: String },

    #[serde(rename_all = "camelCase")]
    GameOver {
        winner_index: usize,
        winner_name: String,
    },

    /// Narrative text for the game log.
    Message { text: String },
}

impl ServerEvent {
    pub fn error(message: impl Into<String>) -> Self {
        Self::GameError {
            message: message.into(),
        }
    }

    pub fn state(snapshot: GameSnapshot) -> Self {
        Self::GameStateUpdate {
            state: Box::new(snapshot),
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! The browser client parses these exact shapes, so every test here
    //! pins a field name or a tag.

    use super::*;
    use slideforge_engine::{ClientId, GameSession};

    fn decode(json: &str) -> ClientMessage {
        serde_json::from_str(json).unwrap()
    }

    // =====================================================================
    // ClientMessage
    // =====================================================================

    #[test]
    fn test_create_room_reads_player_name() {
        let msg = decode(r#"{"type":"createRoom","playerName":"Ann"}"#);
        assert_eq!(
            msg,
            ClientMessage::CreateRoom {
                player_name: "Ann".into()
            }
        );
    }

    #[test]
    fn test_player_name_is_optional() {
        let msg = decode(r#"{"type":"joinRoom","roomCode":"abc123"}"#);
        let Ok(Request::Room(RoomRequest::Join {
            room_id,
            player_name,
        })) = msg.into_request()
        else {
            panic!("expected a join request");
        };
        assert_eq!(room_id, RoomId("ABC123".into()));
        assert!(player_name.is_empty());
    }

    #[test]
    fn test_unit_messages() {
        assert_eq!(decode(r#"{"type":"startGame"}"#), ClientMessage::StartGame);
        assert_eq!(decode(r#"{"type":"leaveRoom"}"#), ClientMessage::LeaveRoom);
        assert_eq!(decode(r#"{"type":"drawCard"}"#), ClientMessage::DrawCard);
    }

    #[test]
    fn test_select_move_becomes_turn_action() {
        let msg = decode(
            r#"{"type":"selectMove","positionType":"safe","positionIndex":2,"steps":3}"#,
        );
        assert_eq!(
            msg.into_request().unwrap(),
            Request::Turn(TurnAction::SelectMove {
                position: Position::Safe(2),
                steps: Some(3),
            })
        );
    }

    #[test]
    fn test_select_move_without_steps() {
        let msg = decode(r#"{"type":"selectMove","positionType":"home","positionIndex":-1}"#);
        assert_eq!(
            msg.into_request().unwrap(),
            Request::Turn(TurnAction::SelectMove {
                position: Position::Home,
                steps: None,
            })
        );
    }

    #[test]
    fn test_select_move_off_board_is_invalid() {
        let msg = decode(r#"{"type":"selectMove","positionType":"board","positionIndex":75}"#);
        let err = msg.into_request().unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidMessage(_)));
    }

    #[test]
    fn test_execute_sorry_builds_pawn_key() {
        let msg = decode(r#"{"type":"executeSorry","targetPawnId":3,"targetPlayerIndex":2}"#);
        assert_eq!(
            msg.into_request().unwrap(),
            Request::Turn(TurnAction::ExecuteSorry {
                target: PawnKey::new(2, 3)
            })
        );
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let result: Result<ClientMessage, _> =
            serde_json::from_str(r#"{"type":"flyToMoon","speed":9000}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let result: Result<ClientMessage, _> = serde_json::from_str(r#"{"type":"selectPawn"}"#);
        assert!(result.is_err());
    }

    // =====================================================================
    // ServerEvent
    // =====================================================================

    #[test]
    fn test_your_turn_json_format() {
        let json = serde_json::to_value(ServerEvent::YourTurn {
            current_player_index: 2,
        })
        .unwrap();
        assert_eq!(json["type"], "yourTurn");
        assert_eq!(json["currentPlayerIndex"], 2);
    }

    #[test]
    fn test_game_over_json_format() {
        let json = serde_json::to_value(ServerEvent::GameOver {
            winner_index: 1,
            winner_name: "Bob".into(),
        })
        .unwrap();
        assert_eq!(json["type"], "gameOver");
        assert_eq!(json["winnerIndex"], 1);
        assert_eq!(json["winnerName"], "Bob");
    }

    #[test]
    fn test_room_joined_json_format() {
        let mut session = GameSession::new(RoomId("K7QX2M".into()));
        session.seat(ClientId(1), "Ann");
        session.seat(ClientId(2), "Bob");

        let json = serde_json::to_value(ServerEvent::RoomJoined {
            room_id: session.room_id().clone(),
            your_player_index: 1,
            state: Box::new(session.snapshot()),
            players: session.players(),
        })
        .unwrap();

        assert_eq!(json["type"], "roomJoined");
        assert_eq!(json["roomId"], "K7QX2M");
        assert_eq!(json["yourPlayerIndex"], 1);
        assert_eq!(json["state"]["turnState"], "waiting-for-players");
        assert_eq!(json["players"][1]["name"], "Bob");
        assert_eq!(json["players"][1]["color"], "blue");
    }

    #[test]
    fn test_game_state_update_decodes_back() {
        let session = GameSession::new(RoomId("K7QX2M".into()));
        let event = ServerEvent::state(session.snapshot());
        let json = serde_json::to_string(&event).unwrap();
        let back: ServerEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
