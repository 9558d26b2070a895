//! Room directory: creates, tracks and removes rooms, and remembers which
//! connection plays as which player in which room.

use std::collections::HashMap;
use std::sync::Arc;

use scrawl_game::WordBank;
use scrawl_protocol::{
    ConnectionId, PlayerId, PlayerToken, RoomId, RoomListEntry, ServerEvent, Visibility,
};
use tracing::{debug, info, warn};

use crate::room::{RoomAction, RoomInfo, spawn_room};
use crate::state::EventSender;
use crate::{RoomConfig, RoomError, RoomHandle};

/// Where a connection sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Membership {
    pub room_id: RoomId,
    pub player_id: PlayerId,
}

/// Entry point for room operations from the connection handlers.
///
/// A connection is in at most one room at a time. A player's stable
/// identity is their reconnect token; the connection bound to them may
/// change many times over a game.
pub struct RoomDirectory {
    rooms: HashMap<RoomId, RoomHandle>,
    connections: HashMap<ConnectionId, Membership>,
    config: Arc<RoomConfig>,
    words: Arc<WordBank>,
    next_room_id: u64,
}

impl RoomDirectory {
    pub fn new(config: RoomConfig, words: Arc<WordBank>) -> Self {
        Self {
            rooms: HashMap::new(),
            connections: HashMap::new(),
            config: Arc::new(config),
            words,
            next_room_id: 1,
        }
    }

    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn membership(&self, conn: ConnectionId) -> Option<Membership> {
        self.connections.get(&conn).copied()
    }

    fn ensure_free(&self, conn: ConnectionId) -> Result<(), RoomError> {
        match self.connections.get(&conn) {
            Some(m) => Err(RoomError::AlreadyInRoom(conn, m.room_id)),
            None => Ok(()),
        }
    }

    fn handle(&self, room_id: RoomId) -> Result<&RoomHandle, RoomError> {
        self.rooms.get(&room_id).ok_or(RoomError::NotFound(room_id))
    }

    /// Opens a room with `conn` as its host.
    pub async fn create_room(
        &mut self,
        conn: ConnectionId,
        sender: EventSender,
        name: String,
        avatar: String,
        visibility: Visibility,
    ) -> Result<Membership, RoomError> {
        self.ensure_free(conn)?;

        let room_id = RoomId(self.next_room_id);
        self.next_room_id += 1;
        let handle = spawn_room(
            room_id,
            visibility,
            Arc::clone(&self.config),
            Arc::clone(&self.words),
        );
        self.rooms.insert(room_id, handle.clone());
        info!(%room_id, ?visibility, "room created");

        let _ = sender.send(ServerEvent::RoomCreated {
            room_id,
            visibility,
        });
        match handle.join(name, avatar, conn, sender).await {
            Ok(player_id) => {
                let membership = Membership { room_id, player_id };
                self.connections.insert(conn, membership);
                Ok(membership)
            }
            Err(e) => {
                self.destroy_room(room_id).await;
                Err(e)
            }
        }
    }

    pub async fn join_room(
        &mut self,
        conn: ConnectionId,
        sender: EventSender,
        room_id: RoomId,
        name: String,
        avatar: String,
    ) -> Result<Membership, RoomError> {
        self.ensure_free(conn)?;
        let player_id = self.handle(room_id)?.join(name, avatar, conn, sender).await?;
        let membership = Membership { room_id, player_id };
        self.connections.insert(conn, membership);
        Ok(membership)
    }

    /// Reclaims the seat behind `token`. Any other connection still bound
    /// to that seat is forgotten here; its eventual disconnect is then a
    /// no-op.
    pub async fn reconnect(
        &mut self,
        conn: ConnectionId,
        sender: EventSender,
        room_id: RoomId,
        token: PlayerToken,
        name: Option<String>,
        avatar: Option<String>,
    ) -> Result<Membership, RoomError> {
        self.ensure_free(conn)?;
        let rejoin = self
            .handle(room_id)?
            .reconnect(token, name, avatar, conn, sender)
            .await?;
        let membership = Membership {
            room_id,
            player_id: rejoin.player_id,
        };
        self.connections.retain(|other, m| {
            let stale = *m == membership;
            if stale {
                debug!(%room_id, old = %other, new = %conn, "connection taken over");
            }
            !stale
        });
        self.connections.insert(conn, membership);
        Ok(membership)
    }

    /// Forwards a game action from `conn` to its room.
    pub async fn route_action(
        &self,
        conn: ConnectionId,
        action: RoomAction,
    ) -> Result<(), RoomError> {
        let m = self.membership(conn).ok_or(RoomError::NotInRoom(conn))?;
        self.handle(m.room_id)?.act(m.player_id, action).await
    }

    /// Removes `conn`'s player from their room, deleting the room once it
    /// is empty.
    pub async fn leave_room(&mut self, conn: ConnectionId) -> Result<RoomId, RoomError> {
        let m = self
            .connections
            .remove(&conn)
            .ok_or(RoomError::NotInRoom(conn))?;
        let outcome = self.handle(m.room_id)?.leave(m.player_id).await?;
        if outcome.remaining == 0 {
            self.destroy_room(m.room_id).await;
        }
        Ok(m.room_id)
    }

    /// The connection closed without leaving. The seat is held for the
    /// grace period.
    pub async fn disconnect(&mut self, conn: ConnectionId) {
        let Some(m) = self.connections.remove(&conn) else {
            return;
        };
        if let Some(handle) = self.rooms.get(&m.room_id) {
            if let Err(e) = handle.disconnect(m.player_id, conn).await {
                debug!(%conn, error = %e, "disconnect not delivered");
            }
        }
    }

    pub async fn room_info(&self, room_id: RoomId) -> Result<RoomInfo, RoomError> {
        self.handle(room_id)?.info().await
    }

    /// Public rooms, oldest first.
    pub async fn list_public_rooms(&self) -> Vec<RoomListEntry> {
        let mut entries = Vec::new();
        for handle in self.rooms.values() {
            match handle.info().await {
                Ok(info) if info.visibility == Visibility::Public => {
                    entries.push(info.list_entry());
                }
                Ok(_) => {}
                Err(e) => warn!(room_id = %handle.room_id(), error = %e, "room did not answer"),
            }
        }
        entries.sort_by_key(|e| e.room_id);
        entries
    }

    /// Runs every room's sweep and deletes the empty and the long idle.
    /// Returns how many rooms were deleted.
    pub async fn sweep(&mut self) -> usize {
        let mut doomed = Vec::new();
        for (room_id, handle) in &self.rooms {
            match handle.sweep().await {
                Ok(report) => {
                    if report.purged > 0 {
                        debug!(%room_id, purged = report.purged, "expired players purged");
                    }
                    if report.should_destroy(self.config.idle_timeout) {
                        doomed.push(*room_id);
                    }
                }
                Err(e) => {
                    warn!(%room_id, error = %e, "room task gone, removing");
                    doomed.push(*room_id);
                }
            }
        }
        for room_id in &doomed {
            self.destroy_room(*room_id).await;
        }
        doomed.len()
    }

    /// Shuts a room down and forgets every connection in it.
    pub async fn destroy_room(&mut self, room_id: RoomId) {
        let Some(handle) = self.rooms.remove(&room_id) else {
            return;
        };
        let _ = handle.shutdown().await;
        self.connections.retain(|_, m| m.room_id != room_id);
        info!(%room_id, rooms = self.rooms.len(), "room destroyed");
    }
}
