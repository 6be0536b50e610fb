//! Per-room game state: seats, pawns, deck, and the turn sub-state.
//!
//! A [`GameSession`] is plain data. The only code that mutates it during
//! play is the turn coordinator; the room layer only seats and unseats
//! players.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{Color, PLAYER_COUNT};
use crate::card::CardRank;
use crate::deck::Deck;
use crate::ids::{ClientId, RoomId};
use crate::moves::MoveOption;
use crate::pawn::{Pawn, PawnKey, PawnSet};

// ---------------------------------------------------------------------------
// TurnState
// ---------------------------------------------------------------------------

/// Where the current turn is in its action sequence.
///
/// ```text
/// awaiting-draw ─┬─ select-pawn ─────── select-move ───────────────┐
///                ├─ select-sorry-pawn ─ select-sorry-target ───────┤
///                ├─ select-11-pawn ──── select-11-action ──────────┤
///                └─ select-7-pawn1 ──── select-7-move1 ─┬──────────┤
///                                                       └ select-7-pawn2
///                                                         select-7-move2 ┤
///                                         turn-resolved ◄──────────────────┘
///                                         → awaiting-draw (next player)
///                                         → game-over
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnState {
    #[serde(rename = "waiting-for-players")]
    WaitingForPlayers,
    #[serde(rename = "awaiting-draw")]
    AwaitingDraw,
    #[serde(rename = "select-pawn")]
    SelectPawn,
    #[serde(rename = "select-move")]
    SelectMove,
    #[serde(rename = "select-sorry-pawn")]
    SelectSorryPawn,
    #[serde(rename = "select-sorry-target")]
    SelectSorryTarget,
    #[serde(rename = "select-11-pawn")]
    Select11Pawn,
    #[serde(rename = "select-11-action")]
    Select11Action,
    #[serde(rename = "select-7-pawn1")]
    Select7Pawn1,
    #[serde(rename = "select-7-move1")]
    Select7Move1,
    #[serde(rename = "select-7-pawn2")]
    Select7Pawn2,
    #[serde(rename = "select-7-move2")]
    Select7Move2,
    #[serde(rename = "turn-resolved")]
    TurnResolved,
    #[serde(rename = "game-over")]
    GameOver,
}

impl TurnState {
    /// Returns `true` for the states that wait on `selectPawn`.
    pub fn is_pawn_selection(self) -> bool {
        matches!(
            self,
            Self::SelectPawn
                | Self::SelectSorryPawn
                | Self::Select11Pawn
                | Self::Select7Pawn1
                | Self::Select7Pawn2
        )
    }

    /// Returns `true` for the states that wait on `selectMove`.
    pub fn is_move_selection(self) -> bool {
        matches!(
            self,
            Self::SelectMove | Self::Select11Action | Self::Select7Move1 | Self::Select7Move2
        )
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::WaitingForPlayers => "waiting-for-players",
            Self::AwaitingDraw => "awaiting-draw",
            Self::SelectPawn => "select-pawn",
            Self::SelectMove => "select-move",
            Self::SelectSorryPawn => "select-sorry-pawn",
            Self::SelectSorryTarget => "select-sorry-target",
            Self::Select11Pawn => "select-11-pawn",
            Self::Select11Action => "select-11-action",
            Self::Select7Pawn1 => "select-7-pawn1",
            Self::Select7Move1 => "select-7-move1",
            Self::Select7Pawn2 => "select-7-pawn2",
            Self::Select7Move2 => "select-7-move2",
            Self::TurnResolved => "turn-resolved",
            Self::GameOver => "game-over",
        }
    }
}

impl fmt::Display for TurnState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Seats
// ---------------------------------------------------------------------------

/// Occupancy of a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    /// Nobody has taken the seat yet.
    Pending,
    /// A connected player holds the seat.
    Human,
    /// The player left. The seat is never handed out again.
    Disconnected,
}

/// One of the four seats of a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerSlot {
    pub player_index: usize,
    pub client: Option<ClientId>,
    pub name: String,
    pub status: SlotStatus,
}

impl PlayerSlot {
    fn empty(player_index: usize) -> Self {
        Self {
            player_index,
            client: None,
            name: String::new(),
            status: SlotStatus::Pending,
        }
    }

    pub fn is_human(&self) -> bool {
        self.status == SlotStatus::Human
    }
}

/// What clients see of a seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSummary {
    pub index: usize,
    pub name: String,
    pub status: SlotStatus,
    pub color: Color,
}

/// Bookkeeping for a 7 split across two pawns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitData {
    pub first_pawn_id: usize,
    pub first_steps: u8,
    pub second_pawn_id: Option<usize>,
}

impl SplitData {
    /// Steps left for the second pawn.
    pub fn remaining(&self) -> u8 {
        7 - self.first_steps
    }
}

// ---------------------------------------------------------------------------
// GameSession
// ---------------------------------------------------------------------------

/// All mutable state of one room.
#[derive(Debug, Clone)]
pub struct GameSession {
    pub(crate) room_id: RoomId,
    pub(crate) slots: [PlayerSlot; PLAYER_COUNT],
    pub(crate) pawns: PawnSet,
    pub(crate) deck: Deck,
    pub(crate) current_player: usize,
    pub(crate) current_card: Option<CardRank>,
    pub(crate) turn_state: TurnState,
    pub(crate) selected_pawn: Option<PawnKey>,
    pub(crate) selectable_pawn_ids: Vec<usize>,
    pub(crate) valid_moves: Vec<MoveOption>,
    pub(crate) targetable_opponents: Vec<PawnKey>,
    pub(crate) split: Option<SplitData>,
    pub(crate) started: bool,
    pub(crate) winner: Option<usize>,
    pub(crate) turn_number: u32,
}

impl GameSession {
    /// A fresh room: every seat pending, every pawn at start, a shuffled
    /// deck.
    pub fn new(room_id: RoomId) -> Self {
        Self {
            room_id,
            slots: std::array::from_fn(PlayerSlot::empty),
            pawns: PawnSet::new(),
            deck: Deck::new(),
            current_player: 0,
            current_card: None,
            turn_state: TurnState::WaitingForPlayers,
            selected_pawn: None,
            selectable_pawn_ids: Vec::new(),
            valid_moves: Vec::new(),
            targetable_opponents: Vec::new(),
            split: None,
            started: false,
            winner: None,
            turn_number: 0,
        }
    }

    // -- Seats --

    /// Puts a player in the next pending seat. Returns the seat index, or
    /// `None` if every seat has been handed out.
    pub fn seat(&mut self, client: ClientId, name: impl Into<String>) -> Option<usize> {
        let slot = self
            .slots
            .iter_mut()
            .find(|s| s.status == SlotStatus::Pending)?;
        slot.client = Some(client);
        slot.name = name.into();
        slot.status = SlotStatus::Human;
        Some(slot.player_index)
    }

    /// The seat held by `client`, if it is still connected.
    pub fn seat_of(&self, client: ClientId) -> Option<usize> {
        self.slots
            .iter()
            .find(|s| s.is_human() && s.client == Some(client))
            .map(|s| s.player_index)
    }

    /// Marks `client`'s seat disconnected. Returns the seat index.
    pub fn unseat(&mut self, client: ClientId) -> Option<usize> {
        let index = self.seat_of(client)?;
        self.slots[index].status = SlotStatus::Disconnected;
        Some(index)
    }

    /// Number of seats with a connected player.
    pub fn human_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_human()).count()
    }

    /// Returns `true` while at least one seat is still pending.
    pub fn has_free_seat(&self) -> bool {
        self.slots.iter().any(|s| s.status == SlotStatus::Pending)
    }

    pub fn slots(&self) -> &[PlayerSlot; PLAYER_COUNT] {
        &self.slots
    }

    /// Display name of a seat (empty if the seat was never taken).
    pub fn player_name(&self, index: usize) -> &str {
        self.slots.get(index).map(|s| s.name.as_str()).unwrap_or("")
    }

    /// Clients still connected to this room.
    pub fn connected_clients(&self) -> impl Iterator<Item = ClientId> + '_ {
        self.slots
            .iter()
            .filter(|s| s.is_human())
            .filter_map(|s| s.client)
    }

    pub fn players(&self) -> Vec<PlayerSummary> {
        self.slots
            .iter()
            .map(|s| PlayerSummary {
                index: s.player_index,
                name: s.name.clone(),
                status: s.status,
                color: Color::of(s.player_index),
            })
            .collect()
    }

    // -- Read access --

    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    pub fn pawns(&self) -> &PawnSet {
        &self.pawns
    }

    /// Direct pawn access for setting up scenarios. Bypasses every rule.
    pub fn pawns_mut(&mut self) -> &mut PawnSet {
        &mut self.pawns
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Direct deck access for stacking draws. Card counts must be kept.
    pub fn deck_mut(&mut self) -> &mut Deck {
        &mut self.deck
    }

    pub fn current_player(&self) -> usize {
        self.current_player
    }

    pub fn current_card(&self) -> Option<CardRank> {
        self.current_card
    }

    pub fn turn_state(&self) -> TurnState {
        self.turn_state
    }

    pub fn selected_pawn(&self) -> Option<PawnKey> {
        self.selected_pawn
    }

    pub fn selectable_pawn_ids(&self) -> &[usize] {
        &self.selectable_pawn_ids
    }

    pub fn valid_moves(&self) -> &[MoveOption] {
        &self.valid_moves
    }

    pub fn targetable_opponents(&self) -> &[PawnKey] {
        &self.targetable_opponents
    }

    pub fn split(&self) -> Option<SplitData> {
        self.split
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_game_over(&self) -> bool {
        self.winner.is_some()
    }

    pub fn winner(&self) -> Option<usize> {
        self.winner
    }

    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    /// Cards accounted for: draw pile + discard pile + the held card.
    /// Always 54.
    pub fn card_count(&self) -> usize {
        self.deck.draw_len() + self.deck.discard_len() + usize::from(self.current_card.is_some())
    }

    /// Clears the per-selection buffers.
    pub(crate) fn clear_selection(&mut self) {
        self.selected_pawn = None;
        self.selectable_pawn_ids.clear();
        self.valid_moves.clear();
        self.targetable_opponents.clear();
    }

    /// A full snapshot for broadcasting.
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            room_id: self.room_id.clone(),
            players: self.players(),
            draw_pile_size: self.deck.draw_len(),
            discard_pile_size: self.deck.discard_len(),
            current_player_index: self.current_player,
            current_card: self.current_card,
            turn_state: self.turn_state,
            selected_pawn_id: self.selected_pawn.map(|k| k.id),
            selectable_pawn_ids: self.selectable_pawn_ids.clone(),
            valid_moves: self.valid_moves.clone(),
            targetable_opponent_ids: self.targetable_opponents.clone(),
            split_data: self.split,
            started: self.started,
            game_over: self.is_game_over(),
            winner_index: self.winner,
            turn_number: self.turn_number,
            pawns: self.pawns.iter().copied().collect(),
        }
    }
}

/// Everything a client needs to render the room. Sent whole after every
/// accepted change. Deck contents are never included, only pile sizes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub room_id: RoomId,
    pub players: Vec<PlayerSummary>,
    pub draw_pile_size: usize,
    pub discard_pile_size: usize,
    pub current_player_index: usize,
    pub current_card: Option<CardRank>,
    pub turn_state: TurnState,
    pub selected_pawn_id: Option<usize>,
    pub selectable_pawn_ids: Vec<usize>,
    pub valid_moves: Vec<MoveOption>,
    pub targetable_opponent_ids: Vec<PawnKey>,
    pub split_data: Option<SplitData>,
    pub started: bool,
    pub game_over: bool,
    pub winner_index: Option<usize>,
    pub turn_number: u32,
    pub pawns: Vec<Pawn>,
}
