//! # Slideforge
//!
//! Authoritative server for a four-player "Sorry!"-style race game.
//!
//! Browsers connect over WebSocket and exchange JSON frames. Each room is a
//! Tokio task that owns its game session, so every rule check and every
//! state change happens on the server.
//!
//! ```text
//! browser ⇄ gateway ⇄ RoomRegistry ⇄ room actor ⇄ TurnCoordinator ⇄ MoveEngine
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use slideforge::prelude::*;
//!
//! # async fn run() -> Result<(), SlideforgeError> {
//! let server = Server::builder().bind("0.0.0.0:8080").build().await?;
//! server.run().await
//! # }
//! ```

mod error;
mod gateway;
mod server;

pub use error::SlideforgeError;
pub use server::{Server, ServerBuilder};

/// Everything needed to run a server or talk to one in tests.
pub mod prelude {
    pub use crate::{Server, ServerBuilder, SlideforgeError};
    pub use slideforge_engine::{
        ClientId, GameSnapshot, PawnKey, PlayerSummary, Position, RoomId, SlotStatus, TurnState,
    };
    pub use slideforge_protocol::{ClientMessage, Codec, JsonCodec, ServerEvent};
    pub use slideforge_room::{RoomConfig, RoomPhase, RoomRegistry};
}
