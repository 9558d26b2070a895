//! Judging guesses.
//!
//! A guess and the secret are compared after trimming and lowercasing.
//! Long words tolerate a small edit distance, and a guess that is near
//! but not near enough earns a private "close" notice instead of points.

use serde::{Deserialize, Serialize};

/// Trimmed and lowercased, the form guesses are compared in.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Levenshtein distance over chars.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Points for a correct guess with `time_left` of `draw_seconds`
/// remaining: `ceil(time_left / draw_seconds * 100) + 50`.
pub fn guess_points(time_left: u32, draw_seconds: u32) -> u32 {
    if draw_seconds == 0 {
        return 50;
    }
    (time_left * 100).div_ceil(draw_seconds) + 50
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    Correct,
    /// `close` is set when the guess was within the close distance.
    Incorrect { close: bool },
}

impl GuessOutcome {
    pub fn is_correct(self) -> bool {
        matches!(self, Self::Correct)
    }
}

/// Decides whether a guess names the secret word.
///
/// A guess is correct when it matches exactly, or when it is longer than
/// `near_match_len_threshold` chars and within `near_match_distance` edits
/// (so "strawbery" counts for "strawberry" but "aple" doesn't for
/// "apple").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuessEvaluator {
    pub near_match_len_threshold: usize,
    pub near_match_distance: usize,
    /// Incorrect guesses within this many edits are reported as close.
    /// `None` turns the notice off.
    pub close_distance: Option<usize>,
}

impl Default for GuessEvaluator {
    fn default() -> Self {
        Self {
            near_match_len_threshold: 6,
            near_match_distance: 1,
            close_distance: Some(2),
        }
    }
}

impl GuessEvaluator {
    pub fn evaluate(&self, guess: &str, secret: &str) -> GuessOutcome {
        let guess = normalize(guess);
        let secret = normalize(secret);
        if guess.is_empty() || secret.is_empty() {
            return GuessOutcome::Incorrect { close: false };
        }
        if guess == secret {
            return GuessOutcome::Correct;
        }

        let distance = edit_distance(&guess, &secret);
        if guess.chars().count() > self.near_match_len_threshold
            && distance <= self.near_match_distance
        {
            return GuessOutcome::Correct;
        }
        let close = self.close_distance.is_some_and(|d| distance <= d);
        GuessOutcome::Incorrect { close }
    }
}
