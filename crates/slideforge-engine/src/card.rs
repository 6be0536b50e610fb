//! Card ranks and the composition of a fresh deck.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Total number of cards in a fresh deck.
pub const DECK_SIZE: usize = 54;

/// The rank printed on a card.
///
/// On the wire ranks are the strings `"1"` … `"12"` and `"Sorry!"`, which
/// is what the client renders on the card face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardRank {
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "7")]
    Seven,
    #[serde(rename = "8")]
    Eight,
    #[serde(rename = "10")]
    Ten,
    #[serde(rename = "11")]
    Eleven,
    #[serde(rename = "12")]
    Twelve,
    #[serde(rename = "Sorry!")]
    Sorry,
}

impl CardRank {
    /// Every rank, in the order a fresh deck is assembled.
    pub const ALL: [CardRank; 11] = [
        CardRank::One,
        CardRank::Two,
        CardRank::Three,
        CardRank::Four,
        CardRank::Five,
        CardRank::Seven,
        CardRank::Eight,
        CardRank::Ten,
        CardRank::Eleven,
        CardRank::Twelve,
        CardRank::Sorry,
    ];

    /// The number of steps this card is worth, or `None` for Sorry!.
    pub fn value(self) -> Option<u8> {
        match self {
            Self::One => Some(1),
            Self::Two => Some(2),
            Self::Three => Some(3),
            Self::Four => Some(4),
            Self::Five => Some(5),
            Self::Seven => Some(7),
            Self::Eight => Some(8),
            Self::Ten => Some(10),
            Self::Eleven => Some(11),
            Self::Twelve => Some(12),
            Self::Sorry => None,
        }
    }

    /// How many copies of this rank a fresh deck holds.
    pub fn multiplicity(self) -> usize {
        match self {
            Self::One => 5,
            _ => 4,
        }
    }

    /// Returns `true` if this rank lets a pawn leave its start area.
    pub fn leaves_start(self) -> bool {
        matches!(self, Self::One | Self::Two)
    }
}

impl fmt::Display for CardRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value() {
            Some(v) => write!(f, "{v}"),
            None => write!(f, "Sorry!"),
        }
    }
}

/// Builds an unshuffled fresh deck: every rank repeated by its multiplicity.
pub fn fresh_deck() -> Vec<CardRank> {
    CardRank::ALL
        .iter()
        .flat_map(|rank| std::iter::repeat_n(*rank, rank.multiplicity()))
        .collect()
}
