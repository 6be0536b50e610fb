//! `Server` builder and accept loop.
//!
//! This is the entry point for running a Slideforge server. It ties the
//! layers together: WebSocket gateway → protocol → room registry → engine.

use std::net::SocketAddr;
use std::sync::Arc;

use slideforge_protocol::{Codec, JsonCodec};
use slideforge_room::{RoomConfig, RoomRegistry};
use tokio::net::TcpListener;

use crate::SlideforgeError;
use crate::gateway::handle_connection;

/// Shared server state passed to each connection task.
///
/// Wrapped in `Arc` so it can be cheaply cloned across tasks. The registry
/// does its own locking.
pub(crate) struct ServerState<C: Codec> {
    pub(crate) registry: RoomRegistry,
    pub(crate) codec: C,
}

/// Builder for configuring and starting a Slideforge server.
///
/// # Example
///
/// ```rust,ignore
/// use slideforge::prelude::*;
///
/// let server = Server::builder()
///     .bind("0.0.0.0:8080")
///     .room_config(RoomConfig { room_code_len: 4, ..RoomConfig::default() })
///     .build()
///     .await?;
/// server.run().await
/// ```
pub struct ServerBuilder {
    bind_addr: String,
    room_config: RoomConfig,
}

impl ServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            room_config: RoomConfig::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the configuration every new room is created with.
    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.room_config = config;
        self
    }

    /// Binds the listener. Frames are JSON, the only format browsers send.
    pub async fn build(self) -> Result<Server<JsonCodec>, SlideforgeError> {
        let listener = TcpListener::bind(&self.bind_addr).await?;
        tracing::info!(addr = %self.bind_addr, "listening for WebSocket connections");

        let state = Arc::new(ServerState {
            registry: RoomRegistry::new(self.room_config),
            codec: JsonCodec,
        });

        Ok(Server { listener, state })
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound Slideforge server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct Server<C: Codec> {
    listener: TcpListener,
    state: Arc<ServerState<C>>,
}

impl Server<JsonCodec> {
    /// Creates a new builder.
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }
}

impl<C: Codec + Clone> Server<C> {
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// The registry holding every live room.
    pub fn registry(&self) -> &RoomRegistry {
        &self.state.registry
    }

    /// Runs the accept loop.
    ///
    /// Spawns a gateway task for each accepted socket. Runs until the
    /// process is terminated.
    pub async fn run(self) -> Result<(), SlideforgeError> {
        tracing::info!("Slideforge server running");

        loop {
            match self.listener.accept().await {
                Ok((stream, peer)) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, peer, state).await {
                            tracing::debug!(%peer, error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
