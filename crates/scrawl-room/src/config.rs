//! Room configuration and per-game settings validation.

use std::time::Duration;

use scrawl_game::{GuessEvaluator, dedup_words};
use scrawl_protocol::GameSettings;
use scrawl_tick::CountdownConfig;
use serde::{Deserialize, Serialize};

use crate::RoomError;

/// Server-side tuning shared by every room.
///
/// Unlike [`GameSettings`], which the host picks per game, these are set
/// once by whoever runs the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    /// Connected players required to start (and keep) a game.
    pub min_players: usize,

    /// Highest `max_players` a host may choose.
    pub max_players_limit: usize,

    pub max_rounds: u32,
    pub min_draw_seconds: u32,
    pub max_draw_seconds: u32,

    /// Time the drawer has to pick a word.
    pub selection_seconds: u32,

    /// Added to the host's draw time to get the full turn length.
    pub draw_grace_seconds: u32,

    /// Pause between a turn ending and the next drawer selecting.
    pub round_end_delay: Duration,

    /// Pause between the last guesser finding the word and the turn ending.
    pub settle_delay: Duration,

    /// Shorter inter-turn pause used when the drawer left mid-turn.
    pub drawer_left_delay: Duration,

    /// How long a disconnected player keeps their seat.
    pub reconnect_grace: Duration,

    /// Rooms idle this long are removed by the sweep (unless mid-turn).
    pub idle_timeout: Duration,

    pub chat_history_limit: usize,
    pub drawing_history_limit: usize,

    /// Awarded to the drawer when at least one player guessed.
    pub drawer_bonus: u32,

    pub max_message_len: usize,
    pub max_name_len: usize,
    pub max_word_len: usize,
    pub max_custom_words: usize,

    pub evaluator: GuessEvaluator,

    #[serde(skip)]
    pub countdown: CountdownConfig,

    /// Capacity of each room's command queue.
    pub channel_size: usize,

    /// Fixed RNG seed for word options and hints. `None` seeds from the OS.
    pub rng_seed: Option<u64>,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            min_players: 2,
            max_players_limit: 20,
            max_rounds: 10,
            min_draw_seconds: 15,
            max_draw_seconds: 240,
            selection_seconds: 15,
            draw_grace_seconds: 10,
            round_end_delay: Duration::from_secs(5),
            settle_delay: Duration::from_millis(1_500),
            drawer_left_delay: Duration::from_secs(3),
            reconnect_grace: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(60 * 60),
            chat_history_limit: 100,
            drawing_history_limit: 1_000,
            drawer_bonus: 25,
            max_message_len: 200,
            max_name_len: 24,
            max_word_len: 32,
            max_custom_words: 500,
            evaluator: GuessEvaluator::default(),
            countdown: CountdownConfig::default(),
            channel_size: 64,
            rng_seed: None,
        }
    }
}

impl RoomConfig {
    /// Checks a host's settings against the server limits and normalizes
    /// the custom word list. `player_count` is the room's current size;
    /// `max_players` may not drop below it.
    pub fn validate_settings(
        &self,
        mut settings: GameSettings,
        player_count: usize,
    ) -> Result<GameSettings, RoomError> {
        if !(1..=self.max_rounds).contains(&settings.rounds) {
            return Err(RoomError::InvalidSettings(format!(
                "rounds must be between 1 and {}",
                self.max_rounds
            )));
        }
        if !(self.min_draw_seconds..=self.max_draw_seconds).contains(&settings.draw_seconds) {
            return Err(RoomError::InvalidSettings(format!(
                "draw time must be between {} and {} seconds",
                self.min_draw_seconds, self.max_draw_seconds
            )));
        }
        let floor = self.min_players.max(player_count);
        if !(floor..=self.max_players_limit).contains(&settings.max_players) {
            return Err(RoomError::InvalidSettings(format!(
                "max players must be between {floor} and {}",
                self.max_players_limit
            )));
        }

        let words = dedup_words(&settings.custom_words);
        if words.len() > self.max_custom_words {
            return Err(RoomError::InvalidSettings(format!(
                "at most {} custom words",
                self.max_custom_words
            )));
        }
        if let Some(long) = words.iter().find(|w| w.chars().count() > self.max_word_len) {
            return Err(RoomError::InvalidSettings(format!(
                "custom word {long:?} is longer than {} characters",
                self.max_word_len
            )));
        }
        settings.custom_words = words;
        Ok(settings)
    }

    /// Length of the drawing phase: draw time plus grace.
    pub fn turn_seconds(&self, settings: &GameSettings) -> u32 {
        settings.draw_seconds + self.draw_grace_seconds
    }
}
