//! Static board topology: the shared track, safety lanes, and slides.
//!
//! The board is pure data. Nothing here ever mutates after construction,
//! so a single instance is shared by every room through
//! [`Board::standard`].
//!
//! ```text
//!  side of player p = track cells 15p .. 15p+14
//!
//!  15p+1 ─ short slide ─ 15p+4        15p+9 ── long slide ── 15p+13
//!    │   15p+2 = safety entry            (owner p never slides)
//!    │   15p+4 = exit from start
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::pawn::Position;

/// Number of cells on the shared track.
pub const TRACK_LEN: u8 = 60;

/// Number of cells in each player's safety lane. Reaching index
/// `SAFETY_LEN` means the pawn is home.
pub const SAFETY_LEN: u8 = 5;

/// Seats per room.
pub const PLAYER_COUNT: usize = 4;

/// Pawns per player.
pub const PAWNS_PER_PLAYER: usize = 4;

/// Track cells owned by each side of the board.
const SIDE_LEN: u8 = TRACK_LEN / PLAYER_COUNT as u8;

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// The color attached to a seat. Seat 0 is always red, 1 blue, and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Blue,
    Yellow,
    Green,
}

impl Color {
    /// All colors in seat order.
    pub const ALL: [Color; PLAYER_COUNT] =
        [Color::Red, Color::Blue, Color::Yellow, Color::Green];

    /// Returns the color of the given seat.
    ///
    /// # Panics
    /// Panics if `player` is not a valid seat index (`>= 4`).
    pub fn of(player: usize) -> Self {
        Self::ALL[player]
    }

    /// Returns the seat index this color belongs to.
    pub fn player(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Red => write!(f, "red"),
            Self::Blue => write!(f, "blue"),
            Self::Yellow => write!(f, "yellow"),
            Self::Green => write!(f, "green"),
        }
    }
}

// ---------------------------------------------------------------------------
// Slide
// ---------------------------------------------------------------------------

/// A slide segment on the track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    /// Track index where the slide begins.
    pub start: u8,
    /// Number of cells covered, including `start` and `end`.
    pub length: u8,
    /// Track index where a sliding pawn comes to rest.
    pub end_index: u8,
    /// The player whose own pawns ignore this slide.
    pub owner: Color,
}

impl Slide {
    fn new(start: u8, length: u8, owner: Color) -> Self {
        Self {
            start,
            length,
            end_index: (start + length - 1) % TRACK_LEN,
            owner,
        }
    }

    /// Track cells swept by a sliding pawn: `start+1 ..= end`.
    pub fn swept_cells(&self) -> impl Iterator<Item = u8> + '_ {
        (1..self.length).map(move |offset| (self.start + offset) % TRACK_LEN)
    }
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

static STANDARD: LazyLock<Board> = LazyLock::new(Board::build_standard);

/// The immutable board topology.
#[derive(Debug, Clone)]
pub struct Board {
    exits: [u8; PLAYER_COUNT],
    safety_entries: [u8; PLAYER_COUNT],
    slides: HashMap<u8, Slide>,
}

impl Board {
    /// Returns the shared standard board.
    pub fn standard() -> &'static Board {
        &STANDARD
    }

    fn build_standard() -> Self {
        let mut exits = [0; PLAYER_COUNT];
        let mut safety_entries = [0; PLAYER_COUNT];
        let mut slides = HashMap::new();

        for (player, color) in Color::ALL.into_iter().enumerate() {
            let side = player as u8 * SIDE_LEN;
            exits[player] = side + 4;
            safety_entries[player] = side + 2;
            for slide in [Slide::new(side + 1, 4, color), Slide::new(side + 9, 5, color)] {
                slides.insert(slide.start, slide);
            }
        }

        Self {
            exits,
            safety_entries,
            slides,
        }
    }

    /// Track index where `player`'s pawns leave their start area.
    pub fn exit_index(&self, player: usize) -> u8 {
        self.exits[player]
    }

    /// Track index where `player`'s pawns turn off into their safety lane.
    pub fn safety_entry_index(&self, player: usize) -> u8 {
        self.safety_entries[player]
    }

    /// Returns the slide starting at `index`, if any.
    pub fn slide_at(&self, index: u8) -> Option<&Slide> {
        self.slides.get(&index)
    }

    /// All slides, unordered.
    pub fn slides(&self) -> impl Iterator<Item = &Slide> {
        self.slides.values()
    }

    /// The track position a pawn of `player` occupies at `index`.
    ///
    /// A pawn standing on its own safety entry is `Entry`, everything else
    /// on the track is `Board`.
    pub fn track_position(&self, player: usize, index: u8) -> Position {
        let index = index % TRACK_LEN;
        if index == self.safety_entry_index(player) {
            Position::Entry(index)
        } else {
            Position::Board(index)
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::build_standard()
    }
}
