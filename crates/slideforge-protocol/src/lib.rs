//! Wire protocol for Slideforge.
//!
//! This crate defines the "language" browsers and the server speak:
//!
//! - **Types** ([`ClientMessage`], [`ServerEvent`]): the JSON frames.
//! - **Requests** ([`Request`], [`RoomRequest`]): client messages after
//!   validation, split into room management and turn actions.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how frames become bytes.
//! - **Errors** ([`ProtocolError`]): what can go wrong in between.
//!
//! ```text
//! WebSocket text → Codec → ClientMessage → Request → room / coordinator
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{ClientMessage, Request, RoomRequest, ServerEvent};
