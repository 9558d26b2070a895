//! Outbound events: what the server tells clients.

use serde::{Deserialize, Serialize};

use crate::{
    ChatMessage, GameSettings, PlayerId, PlayerToken, PlayerView, RankEntry,
    RoomId, RoomListEntry, RoomSnapshot, ScoreGain, Stroke, Visibility,
};

/// A named, structured event delivered to one connection.
///
/// Room-wide broadcasts are fanned out by the room into one copy per
/// recipient, so every variant here is addressed to a single client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerEvent {
    /// The room requested with `CreateRoom` exists; `Joined` follows.
    RoomCreated {
        room_id: RoomId,
        visibility: Visibility,
    },

    /// The receiver entered a room as a new player.
    Joined {
        player_id: PlayerId,
        token: PlayerToken,
        snapshot: RoomSnapshot,
    },

    /// The receiver reclaimed an existing player record.
    Rejoined {
        player_id: PlayerId,
        token: PlayerToken,
        snapshot: RoomSnapshot,
    },

    /// The receiver is no longer in the room.
    Left { room_id: RoomId },

    /// Scores, connection state, host or drawer changed.
    PlayerListChanged { players: Vec<PlayerView> },

    /// A new rotation begins.
    RoundStarted { round: u32, total_rounds: u32 },

    /// `drawer` is choosing a word.
    SelectingWord { drawer: PlayerId, time_left: u32 },

    /// Drawer only: the three words to choose from.
    WordOptions { options: Vec<String> },

    /// Drawing begins. `word` is the true word for the drawer and masked
    /// for everyone else.
    TurnStarted {
        drawer: PlayerId,
        word: String,
        time_left: u32,
        settings: GameSettings,
    },

    TimeTick { time_left: u32 },

    /// Guessers only: the mask with more letters uncovered.
    HintRevealed { hint: u8, word: String },

    /// Somebody guessed the word.
    GuessCorrect {
        player_id: PlayerId,
        name: String,
        points: u32,
    },

    /// Private to a correct guesser: the word they just found.
    SecretWord { word: String },

    /// Private to a guesser whose guess was nearly right.
    GuessClose { guess: String },

    ChatMessage { message: ChatMessage },

    Stroke { stroke: Stroke },

    CanvasCleared,

    /// A turn finished.
    RoundEnded {
        round: u32,
        word: Option<String>,
        drawer: Option<PlayerId>,
        gains: Vec<ScoreGain>,
        players: Vec<PlayerView>,
        is_last_round: bool,
    },

    /// Final ranking, best first.
    GameEnded { ranking: Vec<RankEntry> },

    RoomList { rooms: Vec<RoomListEntry> },

    /// The receiver's last action was rejected. `code` follows HTTP
    /// conventions (400 validation, 403 forbidden, 404 not found, 409
    /// conflict, 500 internal).
    Error { code: u16, message: String },
}

impl ServerEvent {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::RoomCreated { .. } => "RoomCreated",
            Self::Joined { .. } => "Joined",
            Self::Rejoined { .. } => "Rejoined",
            Self::Left { .. } => "Left",
            Self::PlayerListChanged { .. } => "PlayerListChanged",
            Self::RoundStarted { .. } => "RoundStarted",
            Self::SelectingWord { .. } => "SelectingWord",
            Self::WordOptions { .. } => "WordOptions",
            Self::TurnStarted { .. } => "TurnStarted",
            Self::TimeTick { .. } => "TimeTick",
            Self::HintRevealed { .. } => "HintRevealed",
            Self::GuessCorrect { .. } => "GuessCorrect",
            Self::SecretWord { .. } => "SecretWord",
            Self::GuessClose { .. } => "GuessClose",
            Self::ChatMessage { .. } => "ChatMessage",
            Self::Stroke { .. } => "Stroke",
            Self::CanvasCleared => "CanvasCleared",
            Self::RoundEnded { .. } => "RoundEnded",
            Self::GameEnded { .. } => "GameEnded",
            Self::RoomList { .. } => "RoomList",
            Self::Error { .. } => "Error",
        }
    }
}
