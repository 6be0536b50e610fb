//! Room lifecycle management for Slideforge.
//!
//! Each room runs as an isolated Tokio task (actor model) that owns its
//! [`GameSession`](slideforge_engine::GameSession). The registry only
//! knows which rooms exist and which client sits where.
//!
//! # Key types
//!
//! - [`RoomRegistry`]: creates rooms, seats players, routes actions
//! - [`RoomHandle`]: send commands to a running room actor
//! - [`RoomPhase`]: lobby / in progress / finished
//! - [`RoomConfig`]: channel size and room code length

mod config;
mod error;
mod registry;
mod room;

pub use config::{RoomConfig, RoomPhase};
pub use error::RoomError;
pub use registry::RoomRegistry;
pub use room::{ClientSender, RoomHandle, RoomInfo};
