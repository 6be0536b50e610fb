//! Rules engine for Slideforge.
//!
//! Everything about the game itself lives here, with no I/O and no async:
//!
//! - **Board** ([`Board`], [`Slide`], [`Color`]): the static track layout.
//! - **Cards** ([`CardRank`], [`Deck`]): the 54-card deck.
//! - **Pawns** ([`Pawn`], [`Position`], [`PawnSet`]): who stands where.
//! - **Moves** ([`moves`]): the one definition of a legal move.
//! - **Session** ([`GameSession`]): all mutable state of one room.
//! - **Coordinator** ([`apply`], [`TurnAction`]): the turn state machine.
//!
//! ```text
//! TurnAction → coordinator::apply → moves::* → GameSession (committed)
//!                                           ↘ Vec<Notice>
//! ```

mod board;
mod card;
mod coordinator;
mod deck;
mod error;
mod ids;
pub mod moves;
mod pawn;
mod session;

pub use board::{Board, Color, Slide, PAWNS_PER_PLAYER, PLAYER_COUNT, SAFETY_LEN, TRACK_LEN};
pub use card::{CardRank, DECK_SIZE};
pub use coordinator::{apply, handle_departure, start_game, Notice, TurnAction};
pub use deck::Deck;
pub use error::TurnError;
pub use ids::{ClientId, RoomId};
pub use moves::{MoveBasis, MoveOption, MoveReport};
pub use pawn::{InvalidPosition, Pawn, PawnKey, PawnSet, Position, PositionType, WirePosition};
pub use session::{
    GameSession, GameSnapshot, PlayerSlot, PlayerSummary, SlotStatus, SplitData, TurnState,
};
