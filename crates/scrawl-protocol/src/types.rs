//! Shared data types that travel on the wire in both directions.

use serde::{Deserialize, Serialize};

use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A player's identifier inside one room.
///
/// Allocated by the room when the player first joins and kept across
/// reconnects, so chat authorship and drawer references never dangle.
/// Serialized as a plain number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// A unique identifier for a room (one game session).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub u64);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R-{}", self.0)
    }
}

/// The stable identity a client presents to reclaim its player after a
/// reconnect. Issued by the room on join; 32 lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerToken(pub String);

impl PlayerToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerToken {
    // Tokens are secrets; logs only ever see a prefix.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix: String = self.0.chars().take(6).collect();
        write!(f, "{prefix}…")
    }
}

// ---------------------------------------------------------------------------
// Recipient
// ---------------------------------------------------------------------------

/// Who inside a room should receive an outbound event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recipient {
    /// Every connected player in the room.
    All,

    /// One specific player.
    Player(PlayerId),

    /// Everyone except the given player.
    AllExcept(PlayerId),

    /// The drawer plus every player who already guessed the word this turn.
    Winners,

    /// Players who are neither the drawer nor a correct guesser.
    Guessing,
}

// ---------------------------------------------------------------------------
// Room status
// ---------------------------------------------------------------------------

/// The game state of a room.
///
/// ```text
/// Waiting → Selecting → Playing → RoundEnd → Selecting …
///                                          ↘ GameEnd → Selecting (restart)
/// ```
///
/// Only the pairs accepted by [`GameStatus::can_transition_to`] are legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// Lobby: players gather, the host configures and starts.
    Waiting,
    /// The drawer is choosing one of three words.
    Selecting,
    /// The drawer draws, everybody else guesses.
    Playing,
    /// A turn just finished; the next one starts after a short pause.
    RoundEnd,
    /// Final ranking is shown. The host may start again.
    GameEnd,
}

impl GameStatus {
    /// A drawer exists and the countdown runs.
    pub fn is_turn_active(self) -> bool {
        matches!(self, Self::Selecting | Self::Playing)
    }

    /// A game is under way (between start and the final ranking).
    pub fn is_in_game(self) -> bool {
        matches!(self, Self::Selecting | Self::Playing | Self::RoundEnd)
    }

    /// The host may start a (new) game from here.
    pub fn can_start(self) -> bool {
        matches!(self, Self::Waiting | Self::GameEnd)
    }

    /// The transition table for the round state machine.
    pub fn can_transition_to(self, target: Self) -> bool {
        use GameStatus::*;
        matches!(
            (self, target),
            (Waiting, Selecting)
                | (Selecting, Playing)
                | (Selecting, RoundEnd)
                | (Selecting, GameEnd)
                | (Playing, RoundEnd)
                | (Playing, GameEnd)
                | (RoundEnd, Selecting)
                | (RoundEnd, GameEnd)
                | (GameEnd, Selecting)
        )
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Waiting => "Waiting",
            Self::Selecting => "Selecting",
            Self::Playing => "Playing",
            Self::RoundEnd => "RoundEnd",
            Self::GameEnd => "GameEnd",
        };
        f.write_str(name)
    }
}

/// Whether a room shows up in the public room list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

// ---------------------------------------------------------------------------
// Game settings
// ---------------------------------------------------------------------------

/// Where the drawer's three word options come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WordMode {
    /// The server's dictionary.
    #[default]
    Dictionary,
    /// The host's custom list (falls back to the dictionary below 3 words).
    CustomWords,
}

/// When the two letter hints are revealed during a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HintCadence {
    /// No hints.
    Off,
    /// At 40 % and 70 % of the turn.
    #[default]
    Standard,
    /// At 25 % and 50 % of the turn.
    Early,
}

impl HintCadence {
    /// Percent-of-turn marks at which hints 1 and 2 are revealed.
    pub fn marks(self) -> &'static [u32] {
        match self {
            Self::Off => &[],
            Self::Standard => &[40, 70],
            Self::Early => &[25, 50],
        }
    }
}

/// Per-game options chosen by the host when starting.
///
/// Every field has a default, so `{}` is a valid settings object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    /// Number of full rotations (every connected player draws once).
    pub rounds: u32,
    /// Drawing time per turn in seconds.
    pub draw_seconds: u32,
    /// Player cap for the room.
    pub max_players: usize,
    pub word_mode: WordMode,
    pub custom_words: Vec<String>,
    pub hint_cadence: HintCadence,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            rounds: 3,
            draw_seconds: 80,
            max_players: 8,
            word_mode: WordMode::default(),
            custom_words: Vec::new(),
            hint_cadence: HintCadence::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Drawing
// ---------------------------------------------------------------------------

/// A point on the canvas in canvas-relative coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StrokeTool {
    #[default]
    Pen,
    Eraser,
    Fill,
}

/// One drawing operation. The server stores and relays strokes without
/// interpreting them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    #[serde(default)]
    pub tool: StrokeTool,
    pub color: String,
    pub width: f32,
    pub points: Vec<Point>,
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

/// Who wrote a chat line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ChatAuthor {
    System,
    Player { id: PlayerId, name: String },
}

/// Visibility tag of a chat line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatKind {
    /// Ordinary chat or an incorrect guess; visible to everyone.
    Normal,
    /// Server notice (joins, leaves, revealed words).
    System,
    /// "X guessed the word" announcement.
    CorrectGuess,
    /// Written by a player who already guessed; only the drawer and other
    /// correct guessers see it.
    Winners,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: u64,
    pub author: ChatAuthor,
    pub text: String,
    /// Unix time in milliseconds.
    pub timestamp: u64,
    pub kind: ChatKind,
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// A player as other clients see them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    pub avatar: String,
    pub score: u32,
    pub is_host: bool,
    pub is_drawing: bool,
    pub has_guessed: bool,
    pub connected: bool,
}

/// Points a player earned during one turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreGain {
    pub player_id: PlayerId,
    pub points: u32,
}

/// One line of the final leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankEntry {
    /// 1-based position.
    pub rank: usize,
    pub player_id: PlayerId,
    pub name: String,
    pub score: u32,
}

/// A public room as shown in the lobby browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomListEntry {
    pub room_id: RoomId,
    pub host_name: Option<String>,
    pub status: GameStatus,
    pub player_count: usize,
    pub max_players: usize,
}

/// Everything a client needs to render a room it just (re)entered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSnapshot {
    pub room_id: RoomId,
    pub visibility: Visibility,
    pub status: GameStatus,
    pub settings: GameSettings,
    pub players: Vec<PlayerView>,
    pub round: u32,
    pub time_left: u32,
    pub drawer: Option<PlayerId>,
    /// The true word for the drawer and correct guessers, the masked word
    /// for everyone else, `None` outside of a drawing phase.
    pub word: Option<String>,
    pub chat: Vec<ChatMessage>,
    pub drawing: Vec<Stroke>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_serializes_as_plain_number() {
        let json = serde_json::to_string(&PlayerId(42)).unwrap();
        assert_eq!(json, "42");
        let back: PlayerId = serde_json::from_str("42").unwrap();
        assert_eq!(back, PlayerId(42));
    }

    #[test]
    fn test_ids_display() {
        assert_eq!(PlayerId(7).to_string(), "P-7");
        assert_eq!(RoomId(3).to_string(), "R-3");
    }

    #[test]
    fn test_token_display_hides_the_secret() {
        let token = PlayerToken("0123456789abcdef0123456789abcdef".into());
        assert_eq!(token.to_string(), "012345…");
    }

    #[test]
    fn test_status_transition_table() {
        use GameStatus::*;
        assert!(Waiting.can_transition_to(Selecting));
        assert!(Selecting.can_transition_to(Playing));
        assert!(Selecting.can_transition_to(RoundEnd));
        assert!(Playing.can_transition_to(RoundEnd));
        assert!(RoundEnd.can_transition_to(Selecting));
        assert!(RoundEnd.can_transition_to(GameEnd));
        assert!(GameEnd.can_transition_to(Selecting));

        assert!(!Waiting.can_transition_to(Playing));
        assert!(!Playing.can_transition_to(Selecting));
        assert!(!GameEnd.can_transition_to(Playing));
        assert!(!Waiting.can_transition_to(GameEnd));
        assert!(!Playing.can_transition_to(Playing));
    }

    #[test]
    fn test_status_predicates() {
        assert!(GameStatus::Selecting.is_turn_active());
        assert!(GameStatus::Playing.is_turn_active());
        assert!(!GameStatus::RoundEnd.is_turn_active());
        assert!(GameStatus::RoundEnd.is_in_game());
        assert!(!GameStatus::GameEnd.is_in_game());
        assert!(GameStatus::Waiting.can_start());
        assert!(GameStatus::GameEnd.can_start());
        assert!(!GameStatus::Playing.can_start());
    }

    #[test]
    fn test_settings_default_from_empty_object() {
        let settings: GameSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, GameSettings::default());
        assert_eq!(settings.rounds, 3);
        assert_eq!(settings.hint_cadence, HintCadence::Standard);
    }

    #[test]
    fn test_hint_cadence_marks() {
        assert!(HintCadence::Off.marks().is_empty());
        assert_eq!(HintCadence::Standard.marks(), &[40, 70]);
        assert_eq!(HintCadence::Early.marks(), &[25, 50]);
    }

    #[test]
    fn test_chat_author_json_shape() {
        let author = ChatAuthor::Player {
            id: PlayerId(2),
            name: "Bob".into(),
        };
        let json = serde_json::to_value(&author).unwrap();
        assert_eq!(json["type"], "Player");
        assert_eq!(json["id"], 2);

        let json = serde_json::to_value(&ChatAuthor::System).unwrap();
        assert_eq!(json["type"], "System");
    }
}
