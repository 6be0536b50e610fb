//! The draw and discard piles for one room.

use rand::seq::SliceRandom;

use crate::card::{fresh_deck, CardRank};

/// A room's cards: a draw pile and a discard pile.
///
/// The top of each pile is the end of its `Vec`. Together with the card a
/// player is currently holding, the two piles always account for all 54
/// cards of the room.
#[derive(Debug, Clone)]
pub struct Deck {
    draw: Vec<CardRank>,
    discard: Vec<CardRank>,
}

impl Deck {
    /// Creates a freshly shuffled deck.
    pub fn new() -> Self {
        let mut deck = Self {
            draw: fresh_deck(),
            discard: Vec::new(),
        };
        deck.draw.shuffle(&mut rand::rng());
        deck
    }

    /// Draws the top card, reshuffling the discard pile first if the draw
    /// pile ran out.
    ///
    /// Returns `None` when both piles are empty. That is not an error: the
    /// caller ends the turn with a "no cards" message.
    pub fn draw(&mut self) -> Option<CardRank> {
        self.reshuffle_if_needed();
        self.draw.pop()
    }

    /// Puts a played card on the discard pile.
    pub fn discard(&mut self, card: CardRank) {
        self.discard.push(card);
    }

    /// Moves the discard pile back into the draw pile and shuffles it when
    /// the draw pile is empty. Returns `true` if a reshuffle happened.
    pub fn reshuffle_if_needed(&mut self) -> bool {
        if !self.draw.is_empty() || self.discard.is_empty() {
            return false;
        }
        self.draw.append(&mut self.discard);
        self.draw.shuffle(&mut rand::rng());
        tracing::debug!(cards = self.draw.len(), "discard pile reshuffled");
        true
    }

    /// Moves one card of `rank` to the top of the draw pile, pulling it from
    /// the discard pile if the draw pile has none. Card counts are unchanged.
    ///
    /// Returns `false` if no card of that rank is in either pile. Used by
    /// tests and tooling to stack a known draw.
    pub fn move_to_top(&mut self, rank: CardRank) -> bool {
        if let Some(pos) = self.draw.iter().rposition(|c| *c == rank) {
            let card = self.draw.remove(pos);
            self.draw.push(card);
            return true;
        }
        if let Some(pos) = self.discard.iter().rposition(|c| *c == rank) {
            let card = self.discard.remove(pos);
            self.draw.push(card);
            return true;
        }
        false
    }

    /// Number of cards left in the draw pile.
    pub fn draw_len(&self) -> usize {
        self.draw.len()
    }

    /// Number of cards in the discard pile.
    pub fn discard_len(&self) -> usize {
        self.discard.len()
    }

    /// Drops every card from both piles. Only useful for exercising the
    /// empty-deck path.
    pub fn clear(&mut self) {
        self.draw.clear();
        self.discard.clear();
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}
