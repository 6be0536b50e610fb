//! Room actor: an isolated Tokio task that owns one game session.
//!
//! Each room runs in its own task, communicating with the outside world
//! through a bounded mpsc channel. Commands are handled one at a time, so
//! there is never more than one in-flight mutation per room.

use std::collections::HashMap;

use slideforge_engine::{
    self as engine, ClientId, GameSession, GameSnapshot, Notice, RoomId, SlotStatus, TurnAction,
};
use slideforge_protocol::ServerEvent;
use tokio::sync::{mpsc, oneshot};

use crate::{RoomConfig, RoomError, RoomPhase};

/// Longest display name kept; the rest is cut off.
const MAX_NAME_LEN: usize = 24;

/// Channel sender for delivering events to one client's connection.
pub type ClientSender = mpsc::UnboundedSender<ServerEvent>;

/// Commands sent to a room actor through its channel.
///
/// The `oneshot::Sender` in each variant is a "reply channel": the caller
/// sends a command and waits for the response on it.
pub(crate) enum RoomCommand {
    /// Seat a client. `host` marks the room creator.
    Join {
        client: ClientId,
        name: String,
        sender: ClientSender,
        host: bool,
        reply: oneshot::Sender<Result<usize, RoomError>>,
    },

    /// Unseat a client. Replies with the number of players still seated.
    Leave {
        client: ClientId,
        reply: oneshot::Sender<Result<usize, RoomError>>,
    },

    /// Start the game on behalf of a seated client.
    Start {
        client: ClientId,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },

    /// Apply a turn action on behalf of a seated client.
    Action {
        client: ClientId,
        action: TurnAction,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },

    /// Request the full game snapshot.
    Snapshot {
        reply: oneshot::Sender<GameSnapshot>,
    },

    /// Request room metadata.
    Info { reply: oneshot::Sender<RoomInfo> },
}

/// A summary of a room (not the game state itself).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomInfo {
    pub room_id: RoomId,
    pub phase: RoomPhase,
    /// Players currently seated and connected.
    pub player_count: usize,
    pub turn_number: u32,
}

// ---------------------------------------------------------------------------
// RoomHandle
// ---------------------------------------------------------------------------

/// Handle to a running room actor. Used to send commands to it.
///
/// Cheap to clone, it is just an `mpsc::Sender` wrapper.
#[derive(Clone)]
pub struct RoomHandle {
    room_id: RoomId,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    /// Returns the room's code.
    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    fn unavailable(&self) -> RoomError {
        RoomError::Unavailable(self.room_id.clone())
    }

    /// Sends a command built around a fresh reply channel and waits for
    /// the answer.
    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> RoomCommand,
    ) -> Result<T, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(build(reply_tx))
            .await
            .map_err(|_| self.unavailable())?;
        reply_rx.await.map_err(|_| self.unavailable())
    }

    /// Seats a client. Returns the seat index.
    pub async fn join(
        &self,
        client: ClientId,
        name: String,
        sender: ClientSender,
        host: bool,
    ) -> Result<usize, RoomError> {
        self.request(|reply| RoomCommand::Join {
            client,
            name,
            sender,
            host,
            reply,
        })
        .await?
    }

    /// Unseats a client. Returns how many players remain seated.
    pub async fn leave(&self, client: ClientId) -> Result<usize, RoomError> {
        self.request(|reply| RoomCommand::Leave { client, reply })
            .await?
    }

    /// Starts the game.
    pub async fn start(&self, client: ClientId) -> Result<(), RoomError> {
        self.request(|reply| RoomCommand::Start { client, reply })
            .await?
    }

    /// Applies a turn action and waits until it has been accepted or
    /// rejected.
    pub async fn act(&self, client: ClientId, action: TurnAction) -> Result<(), RoomError> {
        self.request(|reply| RoomCommand::Action {
            client,
            action,
            reply,
        })
        .await?
    }

    /// Requests the full game snapshot.
    pub async fn snapshot(&self) -> Result<GameSnapshot, RoomError> {
        self.request(|reply| RoomCommand::Snapshot { reply }).await
    }

    /// Requests the current room info.
    pub async fn info(&self) -> Result<RoomInfo, RoomError> {
        self.request(|reply| RoomCommand::Info { reply }).await
    }
}

// ---------------------------------------------------------------------------
// RoomActor
// ---------------------------------------------------------------------------

/// The internal room actor state. Runs inside a Tokio task.
struct RoomActor {
    session: GameSession,
    /// Per-client outbound channels, for seated clients only.
    senders: HashMap<ClientId, ClientSender>,
    receiver: mpsc::Receiver<RoomCommand>,
}

impl RoomActor {
    fn room_id(&self) -> &RoomId {
        self.session.room_id()
    }

    /// Runs the actor loop until every handle is dropped or the last
    /// player leaves.
    async fn run(mut self) {
        tracing::info!(room_id = %self.room_id(), "room actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                RoomCommand::Join {
                    client,
                    name,
                    sender,
                    host,
                    reply,
                } => {
                    let result = self.handle_join(client, name, sender, host);
                    let _ = reply.send(result);
                }
                RoomCommand::Leave { client, reply } => {
                    let result = self.handle_leave(client);
                    let empty = matches!(result, Ok(0));
                    let _ = reply.send(result);
                    if empty {
                        break;
                    }
                }
                RoomCommand::Start { client, reply } => {
                    let _ = reply.send(self.handle_start(client));
                }
                RoomCommand::Action {
                    client,
                    action,
                    reply,
                } => {
                    let _ = reply.send(self.handle_action(client, action));
                }
                RoomCommand::Snapshot { reply } => {
                    let _ = reply.send(self.session.snapshot());
                }
                RoomCommand::Info { reply } => {
                    let _ = reply.send(self.info());
                }
            }
        }

        tracing::info!(room_id = %self.room_id(), "room actor stopped");
    }

    fn handle_join(
        &mut self,
        client: ClientId,
        name: String,
        sender: ClientSender,
        host: bool,
    ) -> Result<usize, RoomError> {
        let room_id = self.room_id().clone();
        if self.session.seat_of(client).is_some() {
            return Err(RoomError::AlreadyInRoom(client, room_id));
        }
        if !self.session.has_free_seat() {
            return Err(RoomError::RoomFull(room_id));
        }
        if !RoomPhase::of(&self.session).is_joinable() {
            return Err(RoomError::GameAlreadyStarted(room_id));
        }

        let name = display_name(&name, self.next_seat());
        let index = self
            .session
            .seat(client, name)
            .ok_or_else(|| RoomError::RoomFull(room_id.clone()))?;
        self.senders.insert(client, sender);

        tracing::info!(
            %room_id,
            %client,
            player_index = index,
            players = self.session.human_count(),
            "player joined"
        );

        let state = Box::new(self.session.snapshot());
        let players = self.session.players();
        let welcome = if host {
            ServerEvent::RoomCreated {
                room_id,
                state,
                players: players.clone(),
            }
        } else {
            ServerEvent::RoomJoined {
                room_id,
                your_player_index: index,
                state,
                players: players.clone(),
            }
        };
        self.send_to(client, welcome);
        self.broadcast(&ServerEvent::RoomInfoUpdate { players });

        Ok(index)
    }

    fn next_seat(&self) -> usize {
        self.session
            .slots()
            .iter()
            .position(|s| s.status == SlotStatus::Pending)
            .unwrap_or_default()
    }

    fn handle_leave(&mut self, client: ClientId) -> Result<usize, RoomError> {
        let index = self
            .session
            .unseat(client)
            .ok_or(RoomError::NotInRoom(client))?;

        if let Some(sender) = self.senders.remove(&client) {
            let _ = sender.send(ServerEvent::RoomLeft {
                room_id: self.room_id().clone(),
            });
        }

        let remaining = self.session.human_count();
        tracing::info!(
            room_id = %self.room_id(),
            %client,
            player_index = index,
            players = remaining,
            "player left"
        );

        if remaining > 0 {
            let notices = engine::handle_departure(&mut self.session, index);
            self.broadcast(&ServerEvent::RoomInfoUpdate {
                players: self.session.players(),
            });
            if self.session.is_started() {
                self.publish(notices);
            }
        }

        Ok(remaining)
    }

    fn handle_start(&mut self, client: ClientId) -> Result<(), RoomError> {
        if self.session.seat_of(client).is_none() {
            return Err(RoomError::NotInRoom(client));
        }
        if self.session.is_started() {
            return Err(RoomError::GameAlreadyStarted(self.room_id().clone()));
        }

        let notices = engine::start_game(&mut self.session)?;
        tracing::info!(
            room_id = %self.room_id(),
            %client,
            players = self.session.human_count(),
            "game started"
        );
        self.publish(notices);
        Ok(())
    }

    fn handle_action(&mut self, client: ClientId, action: TurnAction) -> Result<(), RoomError> {
        let Some(player) = self.session.seat_of(client) else {
            tracing::warn!(
                room_id = %self.room_id(),
                %client,
                "action from non-member, ignoring"
            );
            return Err(RoomError::NotInRoom(client));
        };

        match engine::apply(&mut self.session, player, action) {
            Ok(notices) => {
                self.publish(notices);
                Ok(())
            }
            Err(err) if err.is_internal() => {
                tracing::error!(
                    room_id = %self.room_id(),
                    player,
                    action = action.label(),
                    error = %err,
                    "invariant violated; action discarded"
                );
                Err(err.into())
            }
            Err(err) => {
                tracing::debug!(
                    room_id = %self.room_id(),
                    player,
                    action = action.label(),
                    reason = %err,
                    "action rejected"
                );
                Err(err.into())
            }
        }
    }

    /// Broadcasts the new state, then each notice as its own event.
    fn publish(&self, notices: Vec<Notice>) {
        self.broadcast(&ServerEvent::state(self.session.snapshot()));

        for notice in notices {
            let event = match notice {
                Notice::Message(text) => ServerEvent::Message { text },
                Notice::YourTurn(index) => ServerEvent::YourTurn {
                    current_player_index: index,
                },
                Notice::GameOver { winner } => {
                    tracing::info!(room_id = %self.room_id(), winner, "game over");
                    ServerEvent::GameOver {
                        winner_index: winner,
                        winner_name: self.session.player_name(winner).to_owned(),
                    }
                }
            };
            self.broadcast(&event);
        }
    }

    /// Sends an event to every seated client.
    fn broadcast(&self, event: &ServerEvent) {
        for client in self.session.connected_clients() {
            self.send_to(client, event.clone());
        }
    }

    /// Sends an event to a single client. Silently drops it if the
    /// receiver is gone (connection already closed).
    fn send_to(&self, client: ClientId, event: ServerEvent) {
        if let Some(sender) = self.senders.get(&client) {
            let _ = sender.send(event);
        }
    }

    fn info(&self) -> RoomInfo {
        RoomInfo {
            room_id: self.room_id().clone(),
            phase: RoomPhase::of(&self.session),
            player_count: self.session.human_count(),
            turn_number: self.session.turn_number(),
        }
    }
}

/// Trims and caps a requested name, falling back to "Player N".
fn display_name(requested: &str, seat: usize) -> String {
    let trimmed = requested.trim();
    if trimmed.is_empty() {
        format!("Player {}", seat + 1)
    } else {
        trimmed.chars().take(MAX_NAME_LEN).collect()
    }
}

/// Spawns a new room actor task and returns a handle to communicate with
/// it.
pub(crate) fn spawn_room(room_id: RoomId, config: &RoomConfig) -> RoomHandle {
    let (tx, rx) = mpsc::channel(config.channel_size);

    let actor = RoomActor {
        session: GameSession::new(room_id.clone()),
        senders: HashMap::new(),
        receiver: rx,
    };

    tokio::spawn(actor.run());

    RoomHandle { room_id, sender: tx }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slideforge_engine::{CardRank, PawnKey, Position, TurnError, TurnState};

    /// Builds an actor without spawning it, so handlers can be driven
    /// directly and the session rigged in between.
    fn actor() -> RoomActor {
        let (_tx, rx) = mpsc::channel(1);
        RoomActor {
            session: GameSession::new(RoomId("UNIT01".into())),
            senders: HashMap::new(),
            receiver: rx,
        }
    }

    fn seat(actor: &mut RoomActor, id: u64, name: &str) -> mpsc::UnboundedReceiver<ServerEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        actor
            .handle_join(ClientId(id), name.into(), tx, id == 1)
            .unwrap();
        rx
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<ServerEvent>) -> Vec<ServerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    /// Two seated players, game started, every queue empty.
    fn started_pair() -> (
        RoomActor,
        mpsc::UnboundedReceiver<ServerEvent>,
        mpsc::UnboundedReceiver<ServerEvent>,
    ) {
        let mut actor = actor();
        let mut ann = seat(&mut actor, 1, "Ann");
        let mut bob = seat(&mut actor, 2, "Bob");
        actor.handle_start(ClientId(1)).unwrap();
        drain(&mut ann);
        drain(&mut bob);
        (actor, ann, bob)
    }

    fn play(actor: &mut RoomActor, action: TurnAction) {
        actor.handle_action(ClientId(1), action).unwrap();
    }

    #[test]
    fn test_display_name_defaults_and_trims() {
        assert_eq!(display_name("  Ann ", 0), "Ann");
        assert_eq!(display_name("", 2), "Player 3");
        assert_eq!(display_name(&"x".repeat(40), 0).len(), MAX_NAME_LEN);
    }

    #[test]
    fn test_accepted_move_broadcasts_new_state() {
        let (mut actor, _ann, mut bob) = started_pair();
        assert!(actor.session.deck_mut().move_to_top(CardRank::Two));

        play(&mut actor, TurnAction::DrawCard);
        play(&mut actor, TurnAction::SelectPawn { pawn_id: 0 });
        drain(&mut bob);
        play(
            &mut actor,
            TurnAction::SelectMove {
                position: Position::Board(4),
                steps: None,
            },
        );

        let events = drain(&mut bob);
        let ServerEvent::GameStateUpdate { state } = &events[0] else {
            panic!("expected gameStateUpdate first, got {:?}", events[0]);
        };
        let moved = state
            .pawns
            .iter()
            .find(|p| p.key() == PawnKey::new(0, 0))
            .unwrap();
        assert_eq!(moved.position, Position::Board(4));
        assert_eq!(state.current_card, None);
        assert_eq!(state.current_player_index, 1);
        assert_eq!(state.turn_state, TurnState::AwaitingDraw);

        assert!(events[1..]
            .iter()
            .any(|e| matches!(e, ServerEvent::Message { .. })));
        assert_eq!(
            events.last(),
            Some(&ServerEvent::YourTurn {
                current_player_index: 1
            })
        );
    }

    #[test]
    fn test_draw_narration_reaches_every_seat() {
        let (mut actor, mut ann, mut bob) = started_pair();
        assert!(actor.session.deck_mut().move_to_top(CardRank::Two));

        play(&mut actor, TurnAction::DrawCard);

        for rx in [&mut ann, &mut bob] {
            let events = drain(rx);
            assert!(matches!(events[0], ServerEvent::GameStateUpdate { .. }));
            assert!(events.contains(&ServerEvent::Message {
                text: "Ann drew 2.".into()
            }));
        }
    }

    #[test]
    fn test_win_broadcasts_game_over_with_winner_name() {
        let (mut actor, mut ann, mut bob) = started_pair();
        for id in 1..4 {
            actor.session.pawns_mut().place(PawnKey::new(0, id), Position::Home);
        }
        actor.session.pawns_mut().place(PawnKey::new(0, 0), Position::Safe(3));
        assert!(actor.session.deck_mut().move_to_top(CardRank::Two));

        play(&mut actor, TurnAction::DrawCard);
        play(&mut actor, TurnAction::SelectPawn { pawn_id: 0 });
        drain(&mut ann);
        drain(&mut bob);
        play(
            &mut actor,
            TurnAction::SelectMove {
                position: Position::Home,
                steps: None,
            },
        );

        for rx in [&mut ann, &mut bob] {
            let events = drain(rx);
            let ServerEvent::GameStateUpdate { state } = &events[0] else {
                panic!("expected gameStateUpdate first, got {:?}", events[0]);
            };
            assert!(state.game_over);
            assert_eq!(state.winner_index, Some(0));
            assert_eq!(
                events.last(),
                Some(&ServerEvent::GameOver {
                    winner_index: 0,
                    winner_name: "Ann".into(),
                })
            );
        }

        assert_eq!(actor.info().phase, RoomPhase::Finished);
        let late = actor.handle_action(ClientId(2), TurnAction::DrawCard);
        assert!(matches!(late, Err(RoomError::Turn(TurnError::GameOver))));
        assert!(drain(&mut bob).is_empty());
    }
}
