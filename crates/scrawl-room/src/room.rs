//! Room actor: an isolated Tokio task that owns one room.
//!
//! Commands arrive on a bounded mpsc channel. The 1 Hz countdown and the
//! room's one-shot timers are polled in the same `select!` loop, so every
//! mutation of a room happens on its own task, one at a time.

use std::sync::Arc;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use scrawl_game::WordBank;
use scrawl_protocol::{
    ConnectionId, GameSettings, GameStatus, PlayerId, PlayerToken, PlayerView, RoomId,
    RoomListEntry, Stroke, Visibility,
};
use scrawl_tick::{Countdown, Timers};
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;

use crate::state::{EventSender, Room};
use crate::{RoomConfig, RoomError};

/// A game action from a player who is already in the room.
#[derive(Debug, Clone, PartialEq)]
pub enum RoomAction {
    StartGame(GameSettings),
    SelectWord(String),
    Chat(String),
    Stroke(Stroke),
    ClearCanvas,
}

/// Keys of a room's one-shot timers. One pending timer per key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum RoomTimer {
    /// Start the next turn after a round-end pause.
    NextTurn,
    /// End the turn shortly after everyone guessed.
    Settle,
    /// A disconnected player's seat expires.
    Grace(PlayerId),
}

/// The player a reconnect resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rejoin {
    pub player_id: PlayerId,
    /// `false` when the token matched nobody and a fresh player was made.
    pub restored: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaveOutcome {
    /// Players left in the room afterwards.
    pub remaining: usize,
}

/// Room metadata (not the full game state).
#[derive(Debug, Clone)]
pub struct RoomInfo {
    pub room_id: RoomId,
    pub visibility: Visibility,
    pub status: GameStatus,
    pub host_name: Option<String>,
    pub player_count: usize,
    pub connected_count: usize,
    pub max_players: usize,
    pub round: u32,
    pub players: Vec<PlayerView>,
}

impl RoomInfo {
    pub fn list_entry(&self) -> RoomListEntry {
        RoomListEntry {
            room_id: self.room_id,
            host_name: self.host_name.clone(),
            status: self.status,
            player_count: self.player_count,
            max_players: self.max_players,
        }
    }
}

/// What a room reports to the periodic sweep.
#[derive(Debug, Clone)]
pub struct SweepReport {
    pub room_id: RoomId,
    pub players: usize,
    pub status: GameStatus,
    pub idle_for: Duration,
    /// Players removed by this sweep because their grace ran out.
    pub purged: usize,
}

impl SweepReport {
    /// Empty, or idle too long while no turn is running.
    pub fn should_destroy(&self, idle_timeout: Duration) -> bool {
        self.players == 0 || (self.idle_for >= idle_timeout && !self.status.is_turn_active())
    }
}

pub(crate) enum RoomCommand {
    Join {
        name: String,
        avatar: String,
        conn: ConnectionId,
        sender: EventSender,
        reply: oneshot::Sender<Result<PlayerId, RoomError>>,
    },
    Reconnect {
        token: PlayerToken,
        name: Option<String>,
        avatar: Option<String>,
        conn: ConnectionId,
        sender: EventSender,
        reply: oneshot::Sender<Result<Rejoin, RoomError>>,
    },
    Leave {
        player_id: PlayerId,
        reply: oneshot::Sender<Result<LeaveOutcome, RoomError>>,
    },
    Act {
        player_id: PlayerId,
        action: RoomAction,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },
    /// Fire-and-forget: the connection is already gone.
    Disconnect {
        player_id: PlayerId,
        conn: ConnectionId,
    },
    Info {
        reply: oneshot::Sender<RoomInfo>,
    },
    Sweep {
        reply: oneshot::Sender<SweepReport>,
    },
    Shutdown,
}

/// Handle to a running room actor. Cheap to clone.
#[derive(Clone)]
pub struct RoomHandle {
    room_id: RoomId,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    /// Sends a command carrying a reply channel and waits for the answer.
    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> RoomCommand,
    ) -> Result<T, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(make(reply_tx))
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))
    }

    /// Adds a new player. The room sends `Joined` to `sender`.
    pub async fn join(
        &self,
        name: String,
        avatar: String,
        conn: ConnectionId,
        sender: EventSender,
    ) -> Result<PlayerId, RoomError> {
        self.request(|reply| RoomCommand::Join {
            name,
            avatar,
            conn,
            sender,
            reply,
        })
        .await?
    }

    /// Rebinds the player holding `token`, or joins fresh when nobody does.
    pub async fn reconnect(
        &self,
        token: PlayerToken,
        name: Option<String>,
        avatar: Option<String>,
        conn: ConnectionId,
        sender: EventSender,
    ) -> Result<Rejoin, RoomError> {
        self.request(|reply| RoomCommand::Reconnect {
            token,
            name,
            avatar,
            conn,
            sender,
            reply,
        })
        .await?
    }

    pub async fn leave(&self, player_id: PlayerId) -> Result<LeaveOutcome, RoomError> {
        self.request(|reply| RoomCommand::Leave { player_id, reply })
            .await?
    }

    pub async fn act(&self, player_id: PlayerId, action: RoomAction) -> Result<(), RoomError> {
        self.request(|reply| RoomCommand::Act {
            player_id,
            action,
            reply,
        })
        .await?
    }

    /// Reports that `conn` closed. Ignored by the room if `conn` no longer
    /// owns the player.
    pub async fn disconnect(&self, player_id: PlayerId, conn: ConnectionId) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Disconnect { player_id, conn })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))
    }

    pub async fn info(&self) -> Result<RoomInfo, RoomError> {
        self.request(|reply| RoomCommand::Info { reply }).await
    }

    pub async fn sweep(&self) -> Result<SweepReport, RoomError> {
        self.request(|reply| RoomCommand::Sweep { reply }).await
    }

    pub async fn shutdown(&self) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Shutdown)
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))
    }
}

/// The internal room actor state. Runs inside a Tokio task.
pub(crate) struct RoomActor {
    pub(crate) room: Room,
    pub(crate) config: Arc<RoomConfig>,
    pub(crate) words: Arc<WordBank>,
    pub(crate) rng: StdRng,
    pub(crate) countdown: Countdown,
    pub(crate) timers: Timers<RoomTimer>,
    receiver: mpsc::Receiver<RoomCommand>,
}

impl RoomActor {
    async fn run(mut self) {
        tracing::info!(room_id = %self.room.id, visibility = ?self.room.visibility, "room actor started");

        loop {
            tokio::select! {
                cmd = self.receiver.recv() => {
                    let Some(cmd) = cmd else { break };
                    if !self.handle_command(cmd) {
                        break;
                    }
                }
                tick = self.countdown.wait_for_tick() => self.on_tick(tick),
                fired = self.timers.next_fired() => self.on_timer(fired),
            }
        }

        tracing::info!(room_id = %self.room.id, "room actor stopped");
    }

    /// Returns `false` when the actor should stop.
    fn handle_command(&mut self, cmd: RoomCommand) -> bool {
        match cmd {
            RoomCommand::Join {
                name,
                avatar,
                conn,
                sender,
                reply,
            } => {
                self.touch();
                let _ = reply.send(self.join(name, avatar, conn, sender));
            }
            RoomCommand::Reconnect {
                token,
                name,
                avatar,
                conn,
                sender,
                reply,
            } => {
                self.touch();
                let _ = reply.send(self.reconnect(token, name, avatar, conn, sender));
            }
            RoomCommand::Leave { player_id, reply } => {
                self.touch();
                let _ = reply.send(self.leave(player_id));
            }
            RoomCommand::Act {
                player_id,
                action,
                reply,
            } => {
                self.touch();
                let result = self.act(player_id, action);
                if let Err(e) = &result {
                    tracing::debug!(room_id = %self.room.id, %player_id, error = %e, "action rejected");
                }
                let _ = reply.send(result);
            }
            RoomCommand::Disconnect { player_id, conn } => {
                self.touch();
                self.disconnect(player_id, conn);
            }
            RoomCommand::Info { reply } => {
                let _ = reply.send(self.info());
            }
            RoomCommand::Sweep { reply } => {
                let _ = reply.send(self.sweep());
            }
            RoomCommand::Shutdown => {
                tracing::info!(room_id = %self.room.id, "room shutting down");
                return false;
            }
        }
        true
    }

    fn touch(&mut self) {
        self.room.last_activity = Instant::now();
    }

    fn act(&mut self, player_id: PlayerId, action: RoomAction) -> Result<(), RoomError> {
        if self.room.player(player_id).is_none() {
            return Err(RoomError::PlayerNotFound(player_id));
        }
        match action {
            RoomAction::StartGame(settings) => self.start_game(player_id, settings),
            RoomAction::SelectWord(word) => self.select_word(player_id, &word),
            RoomAction::Chat(text) => self.chat(player_id, &text),
            RoomAction::Stroke(stroke) => self.stroke(player_id, stroke),
            RoomAction::ClearCanvas => self.clear_canvas(player_id),
        }
    }

    fn info(&self) -> RoomInfo {
        let room = &self.room;
        RoomInfo {
            room_id: room.id,
            visibility: room.visibility,
            status: room.status,
            host_name: room
                .host
                .and_then(|h| room.player(h))
                .map(|p| p.name.clone()),
            player_count: room.players.len(),
            connected_count: room.connected_count(),
            max_players: room.settings.max_players,
            round: room.round,
            players: room.views(),
        }
    }
}

/// Spawns a room actor task and returns a handle to it.
pub(crate) fn spawn_room(
    room_id: RoomId,
    visibility: Visibility,
    config: Arc<RoomConfig>,
    words: Arc<WordBank>,
) -> RoomHandle {
    let (tx, rx) = mpsc::channel(config.channel_size.max(1));

    let rng = match config.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed ^ room_id.0),
        None => StdRng::from_os_rng(),
    };
    let actor = RoomActor {
        room: Room::new(
            room_id,
            visibility,
            config.chat_history_limit,
            config.drawing_history_limit,
        ),
        countdown: Countdown::new(config.countdown.clone()),
        timers: Timers::new(),
        rng,
        words,
        config,
        receiver: rx,
    };

    tokio::spawn(actor.run());

    RoomHandle {
        room_id,
        sender: tx,
    }
}
