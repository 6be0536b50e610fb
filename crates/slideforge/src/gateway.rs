//! Per-connection gateway: WebSocket frames in, room requests out.
//!
//! Each accepted socket gets its own Tokio task running [`handle_connection`]:
//!   1. Upgrade to WebSocket and assign a `ClientId`
//!   2. Spawn a writer task that drains the client's event queue
//!   3. Loop: decode frames → route to the registry → report failures
//!
//! Rejections go back to the acting connection only, as `gameError`.
//! Everything the room has to say to its players flows through the
//! event queue handed to it on create/join.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::{SinkExt, StreamExt};
use slideforge_engine::ClientId;
use slideforge_protocol::{ClientMessage, Codec, Request, RoomRequest, ServerEvent};
use slideforge_room::{ClientSender, RoomError, RoomRegistry};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

use crate::SlideforgeError;
use crate::server::ServerState;

/// Counter for generating unique client IDs.
static NEXT_CLIENT_ID: AtomicU64 = AtomicU64::new(1);

/// What a client sees when the server itself failed.
const INTERNAL_ERROR_MESSAGE: &str = "internal server error";

/// Drop guard that releases the client's seat when the handler exits.
///
/// Runs on clean close, on stream errors, and on panics alike. Since
/// `Drop` is synchronous, the async leave is spawned fire-and-forget.
struct ConnectionGuard {
    client: ClientId,
    registry: RoomRegistry,
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        let client = self.client;
        let registry = self.registry.clone();
        tokio::spawn(async move {
            match registry.leave(client).await {
                Ok(room_id) => tracing::info!(%client, %room_id, "seat released on disconnect"),
                Err(RoomError::NotInRoom(_)) => {}
                Err(e) => tracing::debug!(%client, error = %e, "disconnect cleanup failed"),
            }
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<C: Codec + Clone>(
    stream: TcpStream,
    peer: SocketAddr,
    state: Arc<ServerState<C>>,
) -> Result<(), SlideforgeError> {
    let ws = tokio_tungstenite::accept_async(stream).await?;
    let client = ClientId(NEXT_CLIENT_ID.fetch_add(1, Ordering::Relaxed));
    tracing::info!(%client, %peer, "client connected");

    let (mut sink, mut frames) = ws.split();
    let (events, mut outbox) = mpsc::unbounded_channel::<ServerEvent>();

    // --- Writer: event queue → socket ---
    let codec = state.codec.clone();
    tokio::spawn(async move {
        while let Some(event) = outbox.recv().await {
            let text = match codec.encode_text(&event) {
                Ok(text) => text,
                Err(e) => {
                    tracing::error!(%client, error = %e, "failed to encode event");
                    continue;
                }
            };
            if sink.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
        let _ = sink.close().await;
    });

    let _guard = ConnectionGuard {
        client,
        registry: state.registry.clone(),
    };

    // --- Reader: socket → registry ---
    while let Some(frame) = frames.next().await {
        let data = match frame {
            Ok(Message::Text(text)) => text.as_bytes().to_vec(),
            Ok(Message::Binary(bytes)) => bytes.to_vec(),
            Ok(Message::Close(_)) => break,
            Ok(_) => continue, // ping/pong/raw frame
            Err(e) => {
                tracing::debug!(%client, error = %e, "recv error");
                break;
            }
        };

        if let Err(e) = handle_frame(&state, client, &events, &data).await {
            report(client, &events, &e);
        }
    }

    tracing::info!(%client, "client disconnected");
    // _guard drops here → seat released.
    Ok(())
}

/// Decodes one frame and routes it.
async fn handle_frame<C: Codec>(
    state: &ServerState<C>,
    client: ClientId,
    events: &ClientSender,
    data: &[u8],
) -> Result<(), SlideforgeError> {
    let message: ClientMessage = state.codec.decode(data)?;
    let request = message.into_request()?;
    dispatch(&state.registry, client, events, request).await?;
    Ok(())
}

/// Routes a request to the registry.
async fn dispatch(
    registry: &RoomRegistry,
    client: ClientId,
    events: &ClientSender,
    request: Request,
) -> Result<(), RoomError> {
    match request {
        Request::Room(RoomRequest::Create { player_name }) => {
            registry.create_room(client, player_name, events.clone()).await?;
        }
        Request::Room(RoomRequest::Join {
            room_id,
            player_name,
        }) => {
            registry
                .join_room(&room_id, client, player_name, events.clone())
                .await?;
        }
        Request::Room(RoomRequest::Start) => registry.start_game(client).await?,
        Request::Room(RoomRequest::Leave) => {
            registry.leave(client).await?;
        }
        Request::Turn(action) => {
            let label = action.label();
            if let Err(e) = registry.route_action(client, action).await {
                if matches!(e, RoomError::NotInRoom(_)) {
                    tracing::warn!(%client, action = label, "action from a client without a seat");
                }
                return Err(e);
            }
        }
    }
    Ok(())
}

/// Sends a `gameError` to the acting connection.
fn report(client: ClientId, events: &ClientSender, err: &SlideforgeError) {
    let message = if err.is_internal() {
        tracing::error!(%client, error = %err, "request failed");
        INTERNAL_ERROR_MESSAGE.to_owned()
    } else {
        tracing::debug!(%client, error = %err, "request rejected");
        err.to_string()
    };
    let _ = events.send(ServerEvent::error(message));
}
