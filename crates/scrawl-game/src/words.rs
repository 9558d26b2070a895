//! The pool the drawer's word options come from.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::debug;

use crate::WordBankError;

/// How many words the drawer chooses from.
pub const OPTION_COUNT: usize = 3;

const BUILTIN_WORDS: &[&str] = &[
    "apple", "banana", "strawberry", "pineapple", "carrot", "pizza", "hamburger",
    "sandwich", "cookie", "cupcake", "dog", "cat", "elephant", "giraffe",
    "penguin", "octopus", "butterfly", "spider", "snake", "turtle", "rabbit",
    "kangaroo", "dolphin", "shark", "owl", "house", "castle", "bridge",
    "lighthouse", "windmill", "tent", "igloo", "pyramid", "skyscraper",
    "bicycle", "airplane", "helicopter", "rocket", "submarine", "train",
    "tractor", "sailboat", "skateboard", "guitar", "piano", "drum", "trumpet",
    "violin", "microphone", "headphones", "camera", "television", "computer",
    "keyboard", "telephone", "lamp", "umbrella", "scissors", "hammer",
    "ladder", "key", "clock", "candle", "balloon", "kite", "crown", "glasses",
    "backpack", "sock", "shoe", "hat", "tree", "flower", "cactus", "mushroom",
    "volcano", "rainbow", "mountain", "island", "waterfall", "snowman", "sun",
    "moon", "star", "cloud", "lightning", "tornado", "beach", "desert",
    "dragon", "robot", "ghost", "wizard", "mermaid", "pirate", "astronaut",
    "vampire", "unicorn", "ice cream", "hot dog", "fire truck", "treasure map",
    "soccer ball", "traffic light", "toothbrush", "popcorn", "anchor",
    "compass", "telescope", "magnet", "spaceship",
];

/// A dictionary plus a process-wide memory of recently offered words.
///
/// One bank is shared (behind an `Arc`) by every room. The recent set is a
/// soft anti-repeat heuristic: words offered lately are skipped until a
/// pool has fewer than three fresh words left, at which point that pool's
/// words are forgotten and drawing starts over.
#[derive(Debug)]
pub struct WordBank {
    words: Vec<String>,
    recent: Mutex<HashSet<String>>,
}

impl WordBank {
    /// Builds a bank from any list of words. Entries are trimmed, empty
    /// ones dropped and duplicates (ignoring case) collapsed.
    ///
    /// # Errors
    /// [`WordBankError::TooFewWords`] if fewer than three words survive.
    pub fn new<I, S>(words: I) -> Result<Self, WordBankError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = dedup_words(words);
        if words.len() < OPTION_COUNT {
            return Err(WordBankError::TooFewWords {
                required: OPTION_COUNT,
                found: words.len(),
            });
        }
        Ok(Self {
            words,
            recent: Mutex::new(HashSet::new()),
        })
    }

    /// The built-in dictionary.
    pub fn builtin() -> Self {
        Self {
            words: BUILTIN_WORDS.iter().map(|w| (*w).to_owned()).collect(),
            recent: Mutex::new(HashSet::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Draws three distinct options.
    ///
    /// `custom` is the room's custom list; it is used when it holds at least
    /// three words, otherwise the dictionary is.
    pub fn draw_options<R>(&self, custom: Option<&[String]>, rng: &mut R) -> Vec<String>
    where
        R: Rng + ?Sized,
    {
        let pool = match custom {
            Some(list) if list.len() >= OPTION_COUNT => list,
            _ => &self.words,
        };

        let mut recent = self.recent.lock().unwrap_or_else(PoisonError::into_inner);

        let mut fresh: Vec<&String> = pool
            .iter()
            .filter(|w| !recent.contains(&w.to_lowercase()))
            .collect();
        if fresh.len() < OPTION_COUNT {
            debug!(pool = pool.len(), fresh = fresh.len(), "word pool exhausted, resetting");
            for word in pool {
                recent.remove(&word.to_lowercase());
            }
            fresh = pool.iter().collect();
        }

        let options: Vec<String> = fresh
            .choose_multiple(rng, OPTION_COUNT)
            .map(|w| (*w).clone())
            .collect();
        for word in &options {
            recent.insert(word.to_lowercase());
        }
        options
    }

    /// Forgets every recently offered word.
    pub fn reset_recent(&self) {
        self.recent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Default for WordBank {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Trims, drops empties and removes case-insensitive duplicates, keeping
/// first occurrences in order.
pub fn dedup_words<I, S>(words: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    words
        .into_iter()
        .map(|w| w.as_ref().trim().to_owned())
        .filter(|w| !w.is_empty() && seen.insert(w.to_lowercase()))
        .collect()
}
