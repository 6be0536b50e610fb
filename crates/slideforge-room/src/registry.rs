//! Room registry: creates rooms, tracks who sits where, routes requests.

use std::collections::HashMap;
use std::sync::Arc;

use slideforge_engine::{ClientId, GameSnapshot, RoomId, TurnAction};
use tokio::sync::Mutex;

use crate::room::spawn_room;
use crate::{ClientSender, RoomConfig, RoomError, RoomHandle, RoomInfo};

/// The shared index of rooms and seated clients.
#[derive(Default)]
struct Index {
    /// Active rooms, keyed by room code.
    rooms: HashMap<RoomId, RoomHandle>,

    /// Maps each client to the room it is seated in.
    /// A client is in at most ONE room at a time.
    client_rooms: HashMap<ClientId, RoomId>,
}

/// Manages all active rooms.
///
/// Cloning is cheap and every clone sees the same rooms. The index lock
/// is only ever held to read or update the maps, never while waiting on
/// a room actor, so a slow room cannot stall the others.
#[derive(Clone)]
pub struct RoomRegistry {
    config: RoomConfig,
    index: Arc<Mutex<Index>>,
}

impl RoomRegistry {
    pub fn new(config: RoomConfig) -> Self {
        Self {
            config,
            index: Arc::new(Mutex::new(Index::default())),
        }
    }

    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    /// Opens a new room with `client` seated at 0.
    ///
    /// The host receives `roomCreated` on `sender` before this returns.
    pub async fn create_room(
        &self,
        client: ClientId,
        name: String,
        sender: ClientSender,
    ) -> Result<(RoomId, usize), RoomError> {
        let handle = {
            let mut index = self.index.lock().await;
            if let Some(current) = index.client_rooms.get(&client) {
                return Err(RoomError::AlreadyInRoom(client, current.clone()));
            }
            let room_id = loop {
                let candidate = RoomId::random(self.config.room_code_len);
                if !index.rooms.contains_key(&candidate) {
                    break candidate;
                }
            };
            let handle = spawn_room(room_id.clone(), &self.config);
            index.rooms.insert(room_id.clone(), handle.clone());
            index.client_rooms.insert(client, room_id);
            handle
        };
        let room_id = handle.room_id().clone();
        tracing::info!(%room_id, %client, "room created");

        match handle.join(client, name, sender, true).await {
            Ok(seat) => Ok((room_id, seat)),
            Err(err) => {
                let mut index = self.index.lock().await;
                index.rooms.remove(&room_id);
                index.client_rooms.remove(&client);
                Err(err)
            }
        }
    }

    /// Seats `client` in an existing room. Returns the seat index.
    pub async fn join_room(
        &self,
        room_id: &RoomId,
        client: ClientId,
        name: String,
        sender: ClientSender,
    ) -> Result<usize, RoomError> {
        let handle = {
            let index = self.index.lock().await;
            if let Some(current) = index.client_rooms.get(&client) {
                return Err(RoomError::AlreadyInRoom(client, current.clone()));
            }
            index
                .rooms
                .get(room_id)
                .cloned()
                .ok_or_else(|| RoomError::NotFound(room_id.clone()))?
        };

        let seat = handle.join(client, name, sender, false).await?;
        self.index
            .lock()
            .await
            .client_rooms
            .insert(client, room_id.clone());
        Ok(seat)
    }

    /// Unseats `client` from whatever room it is in.
    ///
    /// The seat is marked disconnected and never handed out again. If it
    /// was that player's turn, the turn passes immediately. The room is
    /// deleted once nobody is left in it.
    pub async fn leave(&self, client: ClientId) -> Result<RoomId, RoomError> {
        let (room_id, handle) = {
            let mut index = self.index.lock().await;
            let room_id = index
                .client_rooms
                .remove(&client)
                .ok_or(RoomError::NotInRoom(client))?;
            let handle = index.rooms.get(&room_id).cloned();
            (room_id, handle)
        };

        let Some(handle) = handle else {
            return Ok(room_id);
        };

        let remaining = handle.leave(client).await?;
        if remaining == 0 {
            self.index.lock().await.rooms.remove(&room_id);
            tracing::info!(%room_id, "room destroyed");
        }
        Ok(room_id)
    }

    /// Starts the game in `client`'s room.
    pub async fn start_game(&self, client: ClientId) -> Result<(), RoomError> {
        self.handle_for(client).await?.start(client).await
    }

    /// Forwards a turn action to `client`'s room.
    pub async fn route_action(&self, client: ClientId, action: TurnAction) -> Result<(), RoomError> {
        self.handle_for(client).await?.act(client, action).await
    }

    /// The full game snapshot of a room.
    pub async fn snapshot(&self, room_id: &RoomId) -> Result<GameSnapshot, RoomError> {
        self.handle(room_id).await?.snapshot().await
    }

    /// Metadata about a room.
    pub async fn room_info(&self, room_id: &RoomId) -> Result<RoomInfo, RoomError> {
        self.handle(room_id).await?.info().await
    }

    /// The room `client` is seated in, if any.
    pub async fn room_of(&self, client: ClientId) -> Option<RoomId> {
        self.index.lock().await.client_rooms.get(&client).cloned()
    }

    /// Returns the number of active rooms.
    pub async fn room_count(&self) -> usize {
        self.index.lock().await.rooms.len()
    }

    async fn handle(&self, room_id: &RoomId) -> Result<RoomHandle, RoomError> {
        self.index
            .lock()
            .await
            .rooms
            .get(room_id)
            .cloned()
            .ok_or_else(|| RoomError::NotFound(room_id.clone()))
    }

    async fn handle_for(&self, client: ClientId) -> Result<RoomHandle, RoomError> {
        let index = self.index.lock().await;
        let room_id = index
            .client_rooms
            .get(&client)
            .ok_or(RoomError::NotInRoom(client))?;
        index
            .rooms
            .get(room_id)
            .cloned()
            .ok_or_else(|| RoomError::NotFound(room_id.clone()))
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new(RoomConfig::default())
    }
}
