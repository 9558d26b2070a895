//! The entity graph of one room: players, turn, hint state, histories.
//!
//! Nothing here knows about timers or channels beyond the per-player
//! event sender. The actor in `room.rs` owns one [`Room`] and drives it.

use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::RngCore;
use scrawl_game::{Audience, HintState, chat};
use scrawl_protocol::{
    ChatAuthor, ChatKind, ChatMessage, ConnectionId, GameSettings, GameStatus, PlayerId,
    PlayerToken, PlayerView, RankEntry, Recipient, RoomId, RoomSnapshot, ServerEvent, Stroke,
    Visibility,
};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::warn;

/// Where a room delivers events for one connected player.
pub type EventSender = mpsc::UnboundedSender<ServerEvent>;

#[derive(Debug)]
pub(crate) struct Player {
    pub id: PlayerId,
    pub token: PlayerToken,
    pub name: String,
    pub avatar: String,
    pub score: u32,
    /// Points earned in the current turn, for the round-ended summary.
    pub turn_points: u32,
    pub has_guessed: bool,
    pub has_drawn_this_round: bool,
    pub conn: Option<ConnectionId>,
    pub sender: Option<EventSender>,
    pub disconnected_at: Option<Instant>,
    /// Bumped on every disconnect and rebind; grace timers carry it.
    pub disconnect_epoch: u64,
}

impl Player {
    pub fn new(
        id: PlayerId,
        name: String,
        avatar: String,
        conn: ConnectionId,
        sender: EventSender,
    ) -> Self {
        Self {
            id,
            token: new_token(),
            name,
            avatar,
            score: 0,
            turn_points: 0,
            has_guessed: false,
            has_drawn_this_round: false,
            conn: Some(conn),
            sender: Some(sender),
            disconnected_at: None,
            disconnect_epoch: 0,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    pub fn send(&self, event: ServerEvent) {
        if let Some(sender) = &self.sender {
            // A closed receiver means the handler is gone; its disconnect
            // is already on the way.
            let _ = sender.send(event);
        }
    }
}

/// 128 random bits as 32 lowercase hex chars.
fn new_token() -> PlayerToken {
    let mut bytes = [0u8; 16];
    rand::rng().fill_bytes(&mut bytes);
    PlayerToken(bytes.iter().map(|b| format!("{b:02x}")).collect())
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

#[derive(Debug)]
struct ChatEntry {
    message: ChatMessage,
    /// Room generation when the line was posted.
    generation: u64,
}

#[derive(Debug)]
pub(crate) struct Room {
    pub id: RoomId,
    pub visibility: Visibility,
    pub status: GameStatus,
    pub settings: GameSettings,
    /// Join order, which is also turn order.
    pub players: Vec<Player>,
    pub host: Option<PlayerId>,
    pub drawer: Option<PlayerId>,
    pub last_drawer: Option<PlayerId>,
    pub word: Option<String>,
    pub options: Vec<String>,
    pub hints: HintState,
    /// Elapsed-second marks of this turn's hints.
    pub hint_marks: Vec<u32>,
    pub turn_seconds: u32,
    pub time_left: u32,
    pub round: u32,
    /// Bumped whenever a turn starts or ends; turn-scoped timers carry it.
    pub generation: u64,
    pub last_activity: Instant,
    chat: VecDeque<ChatEntry>,
    chat_limit: usize,
    drawing: VecDeque<Stroke>,
    drawing_limit: usize,
    next_player_id: u64,
    next_message_id: u64,
}

impl Room {
    pub fn new(id: RoomId, visibility: Visibility, chat_limit: usize, drawing_limit: usize) -> Self {
        Self {
            id,
            visibility,
            status: GameStatus::Waiting,
            settings: GameSettings::default(),
            players: Vec::new(),
            host: None,
            drawer: None,
            last_drawer: None,
            word: None,
            options: Vec::new(),
            hints: HintState::new(),
            hint_marks: Vec::new(),
            turn_seconds: 0,
            time_left: 0,
            round: 0,
            generation: 0,
            last_activity: Instant::now(),
            chat: VecDeque::new(),
            chat_limit,
            drawing: VecDeque::new(),
            drawing_limit,
            next_player_id: 1,
            next_message_id: 1,
        }
    }

    // -- players ----------------------------------------------------------

    pub fn allocate_player_id(&mut self) -> PlayerId {
        let id = PlayerId(self.next_player_id);
        self.next_player_id += 1;
        id
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn player_by_token(&self, token: &PlayerToken) -> Option<&Player> {
        self.players.iter().find(|p| &p.token == token)
    }

    pub fn connected_count(&self) -> usize {
        self.players.iter().filter(|p| p.is_connected()).count()
    }

    pub fn audience(&self, id: PlayerId) -> Audience {
        Audience {
            is_drawer: self.drawer == Some(id),
            has_guessed: self.player(id).is_some_and(|p| p.has_guessed),
        }
    }

    /// Every connected player other than the drawer has guessed, and there
    /// is at least one of them.
    pub fn all_guessed(&self) -> bool {
        let mut guessers = self
            .players
            .iter()
            .filter(|p| p.is_connected() && Some(p.id) != self.drawer)
            .peekable();
        guessers.peek().is_some() && guessers.all(|p| p.has_guessed)
    }

    /// The first connected player in join order who hasn't drawn this
    /// round, skipping the previous drawer unless nobody else is eligible.
    pub fn next_drawer(&self) -> Option<PlayerId> {
        let mut eligible = self
            .players
            .iter()
            .filter(|p| p.is_connected() && !p.has_drawn_this_round)
            .map(|p| p.id);
        let first = eligible.next()?;
        if Some(first) != self.last_drawer {
            return Some(first);
        }
        eligible.next().or(Some(first))
    }

    /// Picks a new host if the current one is gone: the first connected
    /// player, else the first player at all.
    pub fn elect_host(&mut self) -> Option<PlayerId> {
        if self.host.is_some_and(|h| self.player(h).is_some()) {
            return None;
        }
        self.host = self
            .players
            .iter()
            .find(|p| p.is_connected())
            .or(self.players.first())
            .map(|p| p.id);
        self.host
    }

    /// Descending score; equal scores keep join order.
    pub fn ranking(&self) -> Vec<RankEntry> {
        let mut order: Vec<&Player> = self.players.iter().collect();
        order.sort_by(|a, b| b.score.cmp(&a.score));
        order
            .into_iter()
            .enumerate()
            .map(|(i, p)| RankEntry {
                rank: i + 1,
                player_id: p.id,
                name: p.name.clone(),
                score: p.score,
            })
            .collect()
    }

    // -- delivery ---------------------------------------------------------

    pub fn send_to(&self, id: PlayerId, event: ServerEvent) {
        if let Some(player) = self.player(id) {
            player.send(event);
        }
    }

    pub fn deliver(&self, recipient: Recipient, event: ServerEvent) {
        for player in &self.players {
            let wanted = match recipient {
                Recipient::All => true,
                Recipient::Player(id) => player.id == id,
                Recipient::AllExcept(id) => player.id != id,
                Recipient::Winners => self.audience(player.id).is_winner(),
                Recipient::Guessing => !self.audience(player.id).is_winner(),
            };
            if wanted {
                player.send(event.clone());
            }
        }
    }

    pub fn broadcast_players(&self) {
        self.deliver(
            Recipient::All,
            ServerEvent::PlayerListChanged {
                players: self.views(),
            },
        );
    }

    // -- views ------------------------------------------------------------

    pub fn view(&self, player: &Player) -> PlayerView {
        PlayerView {
            id: player.id,
            name: player.name.clone(),
            avatar: player.avatar.clone(),
            score: player.score,
            is_host: self.host == Some(player.id),
            is_drawing: self.drawer == Some(player.id),
            has_guessed: player.has_guessed,
            connected: player.is_connected(),
        }
    }

    pub fn views(&self) -> Vec<PlayerView> {
        self.players.iter().map(|p| self.view(p)).collect()
    }

    /// The word as `id` should see it: in full for the drawer and correct
    /// guessers, masked (with hints) for everyone else.
    pub fn word_for(&self, id: PlayerId) -> Option<String> {
        let word = self.word.as_deref()?;
        if self.audience(id).is_winner() {
            Some(word.to_owned())
        } else {
            Some(self.hints.render(word))
        }
    }

    pub fn snapshot_for(&self, id: PlayerId) -> RoomSnapshot {
        let viewer = self.audience(id);
        let chat = self
            .chat
            .iter()
            .filter(|entry| {
                // Winners chat from an earlier turn no longer protects
                // anything.
                entry.generation != self.generation
                    || !self.status.is_turn_active()
                    || chat::is_visible(entry.message.kind, viewer)
            })
            .map(|entry| entry.message.clone())
            .collect();
        RoomSnapshot {
            room_id: self.id,
            visibility: self.visibility,
            status: self.status,
            settings: self.settings.clone(),
            players: self.views(),
            round: self.round,
            time_left: self.time_left,
            drawer: self.drawer,
            word: self.word_for(id),
            chat,
            drawing: self.drawing.iter().cloned().collect(),
        }
    }

    // -- histories --------------------------------------------------------

    /// Appends a line to the bounded chat history and returns it.
    pub fn push_chat(&mut self, author: ChatAuthor, text: String, kind: ChatKind) -> ChatMessage {
        let message = ChatMessage {
            id: self.next_message_id,
            author,
            text,
            timestamp: now_millis(),
            kind,
        };
        self.next_message_id += 1;
        self.chat.push_back(ChatEntry {
            message: message.clone(),
            generation: self.generation,
        });
        while self.chat.len() > self.chat_limit {
            self.chat.pop_front();
        }
        message
    }

    /// Posts a system line to everyone.
    pub fn system_message(&mut self, text: String) {
        let message = self.push_chat(ChatAuthor::System, text, ChatKind::System);
        self.deliver(Recipient::All, ServerEvent::ChatMessage { message });
    }

    pub fn push_stroke(&mut self, stroke: Stroke) {
        self.drawing.push_back(stroke);
        while self.drawing.len() > self.drawing_limit {
            self.drawing.pop_front();
        }
    }

    pub fn clear_drawing(&mut self) {
        self.drawing.clear();
    }

    #[cfg(test)]
    pub fn drawing_len(&self) -> usize {
        self.drawing.len()
    }

    #[cfg(test)]
    pub fn chat_len(&self) -> usize {
        self.chat.len()
    }

    // -- status -----------------------------------------------------------

    /// Moves to `target` if the transition table allows it.
    pub fn transition(&mut self, target: GameStatus) -> bool {
        if !self.status.can_transition_to(target) {
            warn!(
                room_id = %self.id,
                from = %self.status,
                to = %target,
                "ignoring illegal status transition"
            );
            return false;
        }
        self.status = target;
        true
    }
}
