//! Joining, leaving, dropped connections and their grace period.
//!
//! A player's seat outlives their connection: a disconnect only marks them
//! offline and arms a grace timer. Reconnecting with the room-issued token
//! before it fires restores everything (score, guess status, the true word
//! for a drawer or correct guesser). After it fires the seat is gone and
//! the same token joins as a new player.

use scrawl_protocol::{ConnectionId, GameStatus, PlayerId, PlayerToken, ServerEvent};
use tokio::time::Instant;
use tracing::{debug, info};

use crate::RoomError;
use crate::room::{LeaveOutcome, Rejoin, RoomActor, RoomTimer, SweepReport};
use crate::state::{EventSender, Player};

impl RoomActor {
    fn validate_name(&self, name: &str) -> Result<String, RoomError> {
        let name = name.trim();
        let len = name.chars().count();
        if len == 0 || len > self.config.max_name_len {
            return Err(RoomError::InvalidInput(format!(
                "name must be 1 to {} characters",
                self.config.max_name_len
            )));
        }
        Ok(name.to_owned())
    }

    pub(crate) fn join(
        &mut self,
        name: String,
        avatar: String,
        conn: ConnectionId,
        sender: EventSender,
    ) -> Result<PlayerId, RoomError> {
        let name = self.validate_name(&name)?;
        if self.room.players.len() >= self.room.settings.max_players {
            return Err(RoomError::RoomFull(self.room.id));
        }

        let player_id = self.room.allocate_player_id();
        let player = Player::new(player_id, name.clone(), avatar, conn, sender);
        let token = player.token.clone();
        self.room.players.push(player);
        self.room.elect_host();

        info!(
            room_id = %self.room.id,
            %player_id,
            %conn,
            players = self.room.players.len(),
            "player joined"
        );
        self.room.send_to(
            player_id,
            ServerEvent::Joined {
                player_id,
                token,
                snapshot: self.room.snapshot_for(player_id),
            },
        );
        self.room.system_message(format!("{name} joined"));
        self.room.broadcast_players();
        Ok(player_id)
    }

    /// Rebinds the player holding `token` to `conn`.
    ///
    /// A connected player bound to another connection is taken over (the
    /// old connection stops receiving events). No match joins fresh, which
    /// needs a name.
    pub(crate) fn reconnect(
        &mut self,
        token: PlayerToken,
        name: Option<String>,
        avatar: Option<String>,
        conn: ConnectionId,
        sender: EventSender,
    ) -> Result<Rejoin, RoomError> {
        let Some(player_id) = self.room.player_by_token(&token).map(|p| p.id) else {
            let name = name.ok_or_else(|| {
                RoomError::InvalidInput("reconnect token unknown and no name given".into())
            })?;
            debug!(room_id = %self.room.id, %token, "unknown token, joining fresh");
            let player_id = self.join(name, avatar.unwrap_or_default(), conn, sender)?;
            return Ok(Rejoin {
                player_id,
                restored: false,
            });
        };

        self.timers.cancel(&RoomTimer::Grace(player_id));
        let Some(player) = self.room.player_mut(player_id) else {
            return Err(RoomError::PlayerNotFound(player_id));
        };
        let previous = player.conn.replace(conn);
        player.sender = Some(sender);
        player.disconnected_at = None;
        player.disconnect_epoch += 1;
        if let Some(avatar) = avatar {
            player.avatar = avatar;
        }
        let name = player.name.clone();

        info!(
            room_id = %self.room.id,
            %player_id,
            %conn,
            takeover = previous.is_some(),
            "player reconnected"
        );
        self.room.send_to(
            player_id,
            ServerEvent::Rejoined {
                player_id,
                token,
                snapshot: self.room.snapshot_for(player_id),
            },
        );
        // The snapshot never carries the options, so a drawer still choosing
        // gets them again on the new connection.
        if self.room.status == GameStatus::Selecting && self.room.drawer == Some(player_id) {
            self.room.send_to(
                player_id,
                ServerEvent::WordOptions {
                    options: self.room.options.clone(),
                },
            );
        }
        if previous.is_none() {
            self.room.system_message(format!("{name} reconnected"));
        }
        self.room.broadcast_players();
        Ok(Rejoin {
            player_id,
            restored: true,
        })
    }

    pub(crate) fn leave(&mut self, player_id: PlayerId) -> Result<LeaveOutcome, RoomError> {
        let player = self
            .room
            .player(player_id)
            .ok_or(RoomError::PlayerNotFound(player_id))?;
        player.send(ServerEvent::Left {
            room_id: self.room.id,
        });
        self.remove_player(player_id, "left");
        Ok(LeaveOutcome {
            remaining: self.room.players.len(),
        })
    }

    /// The connection behind `player_id` closed. Stale if `conn` no longer
    /// owns the player (they already reconnected elsewhere).
    pub(crate) fn disconnect(&mut self, player_id: PlayerId, conn: ConnectionId) {
        let Some(player) = self.room.player_mut(player_id) else {
            debug!(%player_id, %conn, "disconnect for unknown player ignored");
            return;
        };
        if player.conn != Some(conn) {
            debug!(%player_id, %conn, "stale disconnect ignored");
            return;
        }
        player.conn = None;
        player.sender = None;
        player.disconnected_at = Some(Instant::now());
        player.disconnect_epoch += 1;
        let epoch = player.disconnect_epoch;
        let name = player.name.clone();

        info!(room_id = %self.room.id, %player_id, %conn, "player disconnected");
        self.timers
            .schedule(RoomTimer::Grace(player_id), self.config.reconnect_grace, epoch);
        self.room.system_message(format!("{name} disconnected"));
        self.room.broadcast_players();

        if self.room.drawer == Some(player_id) && self.room.status.is_turn_active() {
            self.end_turn(self.config.drawer_left_delay);
        } else {
            self.settle_if_all_guessed();
        }
    }

    pub(crate) fn on_grace_expired(&mut self, player_id: PlayerId, epoch: u64) {
        let still_gone = self
            .room
            .player(player_id)
            .is_some_and(|p| !p.is_connected() && p.disconnect_epoch == epoch);
        if !still_gone {
            debug!(room_id = %self.room.id, %player_id, "stale grace timer ignored");
            return;
        }
        self.remove_player(player_id, "timed out");
    }

    /// Takes a player out of the room for good.
    fn remove_player(&mut self, player_id: PlayerId, reason: &str) {
        let Some(index) = self.room.players.iter().position(|p| p.id == player_id) else {
            return;
        };
        let was_drawing =
            self.room.drawer == Some(player_id) && self.room.status.is_turn_active();
        let player = self.room.players.remove(index);
        self.timers.cancel(&RoomTimer::Grace(player_id));
        if self.room.last_drawer == Some(player_id) {
            self.room.last_drawer = None;
        }
        if let Some(host) = self.room.elect_host() {
            info!(room_id = %self.room.id, %host, "host reassigned");
        }

        info!(
            room_id = %self.room.id,
            %player_id,
            reason,
            players = self.room.players.len(),
            "player removed"
        );

        if self.room.players.is_empty() {
            if self.room.status.is_in_game() {
                self.end_game();
            }
            self.timers.clear();
            return;
        }

        self.room.system_message(format!("{} left", player.name));
        self.room.broadcast_players();
        if was_drawing {
            self.end_turn(self.config.drawer_left_delay);
        } else {
            self.settle_if_all_guessed();
        }
    }

    /// Purges players whose grace ran out and reports on the room.
    pub(crate) fn sweep(&mut self) -> SweepReport {
        let grace = self.config.reconnect_grace;
        let expired: Vec<PlayerId> = self
            .room
            .players
            .iter()
            .filter(|p| p.disconnected_at.is_some_and(|at| at.elapsed() >= grace))
            .map(|p| p.id)
            .collect();
        for player_id in &expired {
            self.remove_player(*player_id, "timed out");
        }

        SweepReport {
            room_id: self.room.id,
            players: self.room.players.len(),
            status: self.room.status,
            idle_for: self.room.last_activity.elapsed(),
            purged: expired.len(),
        }
    }
}
