//! Per-connection handler: frame decoding and action routing.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The task owns the receiving half of the connection's event channel;
//! rooms push events into the sending half. One `select!` loop forwards
//! events to the socket and dispatches inbound actions until either side
//! closes.

use std::sync::Arc;

use scrawl_protocol::{ClientAction, Codec, ConnectionId, ServerEvent};
use scrawl_room::{EventSender, RoomAction, RoomError};
use scrawl_transport::{Connection, WebSocketConnection};
use tokio::sync::mpsc;

use crate::ScrawlError;
use crate::server::ServerState;

/// Drop guard that reports the connection gone when the handler exits.
///
/// Since `Drop` is synchronous, we spawn a fire-and-forget task for the
/// async lock. A connection that already left (or was taken over) has no
/// membership, so the report is a no-op.
struct ConnectionGuard {
    conn_id: ConnectionId,
    state: Arc<ServerState>,
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        let conn_id = self.conn_id;
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            state.rooms.lock().await.disconnect(conn_id).await;
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection(
    conn: WebSocketConnection,
    state: Arc<ServerState>,
) -> Result<(), ScrawlError> {
    let conn_id = conn.id();
    tracing::debug!(%conn_id, peer = %conn.peer_addr(), "handling new connection");

    let (events, mut outbox) = mpsc::unbounded_channel();
    let _guard = ConnectionGuard {
        conn_id,
        state: Arc::clone(&state),
    };

    loop {
        tokio::select! {
            frame = conn.recv() => {
                let data = match frame {
                    Ok(Some(data)) => data,
                    Ok(None) => {
                        tracing::info!(%conn_id, "connection closed cleanly");
                        break;
                    }
                    Err(e) => {
                        tracing::debug!(%conn_id, error = %e, "recv error");
                        break;
                    }
                };
                handle_frame(&state, conn_id, &events, &data).await;
            }
            Some(event) = outbox.recv() => {
                let bytes = state.codec.encode_event(&event)?;
                conn.send(&bytes).await?;
            }
        }
    }

    // _guard drops here → disconnect fires.
    Ok(())
}

/// Decodes one inbound frame and acts on it. Failures become an `Error`
/// event for this connection only; the connection stays open.
async fn handle_frame(
    state: &Arc<ServerState>,
    conn_id: ConnectionId,
    events: &EventSender,
    data: &[u8],
) {
    let action = match state.codec.decode_action(data) {
        Ok(action) => action,
        Err(e) => {
            tracing::debug!(%conn_id, error = %e, "failed to decode action");
            send_error(events, 400, format!("invalid message: {e}"));
            return;
        }
    };

    let name = action.name();
    if let Err(e) = dispatch(state, conn_id, events, action).await {
        tracing::debug!(%conn_id, action = name, error = %e, "action failed");
        send_error(events, e.code(), e.to_string());
    }
}

async fn dispatch(
    state: &Arc<ServerState>,
    conn_id: ConnectionId,
    events: &EventSender,
    action: ClientAction,
) -> Result<(), RoomError> {
    // PERF: every action takes the directory lock; a per-connection room
    // handle cache would let game actions skip it.
    let mut rooms = state.rooms.lock().await;
    let room_action = match action {
        ClientAction::CreateRoom {
            name,
            avatar,
            visibility,
        } => {
            rooms
                .create_room(conn_id, events.clone(), name, avatar, visibility)
                .await?;
            return Ok(());
        }
        ClientAction::JoinRoom {
            room_id,
            name,
            avatar,
        } => {
            rooms
                .join_room(conn_id, events.clone(), room_id, name, avatar)
                .await?;
            return Ok(());
        }
        ClientAction::Reconnect {
            room_id,
            token,
            name,
            avatar,
        } => {
            rooms
                .reconnect(conn_id, events.clone(), room_id, token, name, avatar)
                .await?;
            return Ok(());
        }
        ClientAction::LeaveRoom => {
            rooms.leave_room(conn_id).await?;
            return Ok(());
        }
        ClientAction::ListRooms => {
            let list = rooms.list_public_rooms().await;
            let _ = events.send(ServerEvent::RoomList { rooms: list });
            return Ok(());
        }
        ClientAction::StartGame { settings } => RoomAction::StartGame(settings),
        ClientAction::SelectWord { word } => RoomAction::SelectWord(word),
        ClientAction::Chat { text } => RoomAction::Chat(text),
        ClientAction::Stroke { stroke } => RoomAction::Stroke(stroke),
        ClientAction::ClearCanvas => RoomAction::ClearCanvas,
    };
    rooms.route_action(conn_id, room_action).await
}

fn send_error(events: &EventSender, code: u16, message: String) {
    let _ = events.send(ServerEvent::Error { code, message });
}
