//! Pawns, their positions, and the per-room collection of all 16 pawns.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{PAWNS_PER_PLAYER, PLAYER_COUNT, SAFETY_LEN, TRACK_LEN};

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// The kind of area a pawn is in. This is the `positionType` the client
/// sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionType {
    Start,
    Board,
    Entry,
    Safe,
    Home,
}

impl fmt::Display for PositionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "start"),
            Self::Board => write!(f, "board"),
            Self::Entry => write!(f, "entry"),
            Self::Safe => write!(f, "safe"),
            Self::Home => write!(f, "home"),
        }
    }
}

/// Where a pawn is.
///
/// `Entry(i)` is a track cell like `Board(i)`, but it is the pawn owner's
/// own safety entrance: the next forward move turns into the lane.
///
/// On the wire this flattens to `{ "positionType": ..., "positionIndex": ... }`
/// with index `-1` for `Start` and `Home`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "WirePosition", try_from = "WirePosition")]
pub enum Position {
    Start,
    Board(u8),
    Entry(u8),
    Safe(u8),
    Home,
}

impl Position {
    /// The area kind of this position.
    pub fn kind(self) -> PositionType {
        match self {
            Self::Start => PositionType::Start,
            Self::Board(_) => PositionType::Board,
            Self::Entry(_) => PositionType::Entry,
            Self::Safe(_) => PositionType::Safe,
            Self::Home => PositionType::Home,
        }
    }

    /// The wire index: `-1` for start/home, otherwise the cell index.
    pub fn index(self) -> i8 {
        match self {
            Self::Start | Self::Home => -1,
            Self::Board(i) | Self::Entry(i) | Self::Safe(i) => i as i8,
        }
    }

    /// The track cell, if this position is on the shared track.
    pub fn track_index(self) -> Option<u8> {
        match self {
            Self::Board(i) | Self::Entry(i) => Some(i),
            _ => None,
        }
    }

    /// Returns `true` for `Board` and `Entry`.
    pub fn is_on_track(self) -> bool {
        self.track_index().is_some()
    }

    /// Builds a position from its wire form.
    pub fn from_parts(kind: PositionType, index: i8) -> Result<Self, InvalidPosition> {
        let err = InvalidPosition { kind, index };
        match kind {
            PositionType::Start => Ok(Self::Start),
            PositionType::Home => Ok(Self::Home),
            PositionType::Board | PositionType::Entry => {
                let i = u8::try_from(index).map_err(|_| err)?;
                if i >= TRACK_LEN {
                    return Err(err);
                }
                Ok(if kind == PositionType::Board {
                    Self::Board(i)
                } else {
                    Self::Entry(i)
                })
            }
            PositionType::Safe => {
                let i = u8::try_from(index).map_err(|_| err)?;
                if i >= SAFETY_LEN {
                    return Err(err);
                }
                Ok(Self::Safe(i))
            }
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start | Self::Home => write!(f, "{}", self.kind()),
            Self::Board(i) | Self::Entry(i) | Self::Safe(i) => {
                write!(f, "{} {}", self.kind(), i)
            }
        }
    }
}

/// A `positionType`/`positionIndex` pair that does not name a real cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid position: {kind} {index}")]
pub struct InvalidPosition {
    pub kind: PositionType,
    pub index: i8,
}

/// Flat wire shape of a [`Position`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePosition {
    pub position_type: PositionType,
    pub position_index: i8,
}

impl From<Position> for WirePosition {
    fn from(pos: Position) -> Self {
        Self {
            position_type: pos.kind(),
            position_index: pos.index(),
        }
    }
}

impl TryFrom<WirePosition> for Position {
    type Error = InvalidPosition;

    fn try_from(wire: WirePosition) -> Result<Self, Self::Error> {
        Position::from_parts(wire.position_type, wire.position_index)
    }
}

// ---------------------------------------------------------------------------
// Pawn
// ---------------------------------------------------------------------------

/// Stable reference to a pawn: seat plus pawn id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PawnKey {
    #[serde(rename = "playerIndex")]
    pub player: usize,
    #[serde(rename = "pawnId")]
    pub id: usize,
}

impl PawnKey {
    pub fn new(player: usize, id: usize) -> Self {
        Self { player, id }
    }
}

impl fmt::Display for PawnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pawn {}/{}", self.player, self.id)
    }
}

/// A single playing piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pawn {
    #[serde(rename = "playerIndex")]
    pub player: usize,
    pub id: usize,
    #[serde(flatten)]
    pub position: Position,
}

impl Pawn {
    pub fn key(&self) -> PawnKey {
        PawnKey::new(self.player, self.id)
    }
}

// ---------------------------------------------------------------------------
// PawnSet
// ---------------------------------------------------------------------------

/// All 16 pawns of a room, stored seat-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PawnSet {
    pawns: Vec<Pawn>,
}

impl PawnSet {
    /// Every pawn in its start area.
    pub fn new() -> Self {
        let pawns = (0..PLAYER_COUNT)
            .flat_map(|player| {
                (0..PAWNS_PER_PLAYER).map(move |id| Pawn {
                    player,
                    id,
                    position: Position::Start,
                })
            })
            .collect();
        Self { pawns }
    }

    fn slot(key: PawnKey) -> Option<usize> {
        (key.player < PLAYER_COUNT && key.id < PAWNS_PER_PLAYER)
            .then(|| key.player * PAWNS_PER_PLAYER + key.id)
    }

    pub fn get(&self, key: PawnKey) -> Option<&Pawn> {
        Self::slot(key).and_then(|i| self.pawns.get(i))
    }

    pub fn get_mut(&mut self, key: PawnKey) -> Option<&mut Pawn> {
        Self::slot(key).and_then(|i| self.pawns.get_mut(i))
    }

    /// Moves a pawn without any rule checks. Returns `false` if the key does
    /// not name a pawn.
    pub fn place(&mut self, key: PawnKey, position: Position) -> bool {
        match self.get_mut(key) {
            Some(pawn) => {
                pawn.position = position;
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pawn> {
        self.pawns.iter()
    }

    pub fn of_player(&self, player: usize) -> impl Iterator<Item = &Pawn> {
        self.pawns.iter().filter(move |p| p.player == player)
    }

    /// The pawn (of any player) standing on track cell `index`.
    pub fn track_occupant(&self, index: u8) -> Option<&Pawn> {
        self.pawns
            .iter()
            .find(|p| p.position.track_index() == Some(index))
    }

    /// The pawn of `player` that would block a move onto `position`.
    ///
    /// Track cells are shared by everyone, safe cells are per player, and
    /// start/home never block.
    pub fn own_blocker(&self, player: usize, position: Position) -> Option<&Pawn> {
        match position {
            Position::Board(i) | Position::Entry(i) => {
                self.track_occupant(i).filter(|p| p.player == player)
            }
            Position::Safe(_) => self
                .of_player(player)
                .find(|p| p.position == position),
            Position::Start | Position::Home => None,
        }
    }

    /// Opponent pawns of `player` that are on the shared track.
    pub fn opponents_on_track(&self, player: usize) -> impl Iterator<Item = &Pawn> {
        self.pawns
            .iter()
            .filter(move |p| p.player != player && p.position.is_on_track())
    }

    /// Returns `true` once all four of `player`'s pawns are home.
    pub fn all_home(&self, player: usize) -> bool {
        self.of_player(player).all(|p| p.position == Position::Home)
    }
}

impl Default for PawnSet {
    fn default() -> Self {
        Self::new()
    }
}
