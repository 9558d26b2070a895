//! Masked renderings of the secret word and the two letter hints.
//!
//! Positions are char indices, not byte offsets, so multi-byte letters
//! are masked and revealed whole.

use std::collections::BTreeSet;

use rand::Rng;
use rand::seq::SliceRandom;

/// Stands in for every hidden letter.
pub const PLACEHOLDER: char = '_';

/// Hints per turn.
pub const MAX_HINTS: u8 = 2;

/// The word with every non-whitespace char hidden.
pub fn masked(word: &str) -> String {
    masked_with(word, &BTreeSet::new())
}

/// The word with every non-whitespace char hidden except the `revealed`
/// positions.
pub fn masked_with(word: &str, revealed: &BTreeSet<usize>) -> String {
    word.chars()
        .enumerate()
        .map(|(i, c)| {
            if c.is_whitespace() || revealed.contains(&i) {
                c
            } else {
                PLACEHOLDER
            }
        })
        .collect()
}

/// Number of chars a hint can uncover.
pub fn letter_count(word: &str) -> usize {
    word.chars().filter(|c| !c.is_whitespace()).count()
}

/// Converts percent-of-turn marks into elapsed-second marks for a turn of
/// `turn_seconds`. Each mark is at least one second in.
pub fn hint_marks(turn_seconds: u32, percents: &[u32]) -> Vec<u32> {
    percents
        .iter()
        .map(|pct| (turn_seconds * pct / 100).max(1))
        .collect()
}

/// Hints revealed so far for the current word. Replace it with a fresh
/// one whenever the word changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HintState {
    hints_revealed: u8,
    revealed: BTreeSet<usize>,
}

impl HintState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hints_revealed(&self) -> u8 {
        self.hints_revealed
    }

    pub fn revealed(&self) -> &BTreeSet<usize> {
        &self.revealed
    }

    /// What a player who is still guessing sees.
    pub fn render(&self, word: &str) -> String {
        masked_with(word, &self.revealed)
    }

    /// Uncovers the next hint's worth of random positions and returns them.
    ///
    /// Hint 1 uncovers ceil(25 % of the letters), hint 2 ceil(50 %), each
    /// at least one and never more than remain hidden. Returns `None` once
    /// both hints are spent or nothing is left to uncover.
    pub fn reveal_next<R>(&mut self, word: &str, rng: &mut R) -> Option<Vec<usize>>
    where
        R: Rng + ?Sized,
    {
        if self.hints_revealed >= MAX_HINTS {
            return None;
        }
        let mut hidden: Vec<usize> = word
            .chars()
            .enumerate()
            .filter(|(i, c)| !c.is_whitespace() && !self.revealed.contains(i))
            .map(|(i, _)| i)
            .collect();
        if hidden.is_empty() {
            return None;
        }

        let total = letter_count(word);
        let quota = match self.hints_revealed {
            0 => total.div_ceil(4),
            _ => total.div_ceil(2),
        };
        let take = quota.max(1).min(hidden.len());

        hidden.shuffle(rng);
        hidden.truncate(take);
        hidden.sort_unstable();

        self.revealed.extend(hidden.iter().copied());
        self.hints_revealed += 1;
        Some(hidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_masked_preserves_length_and_spaces() {
        let mask = masked("ice cream");
        assert_eq!(mask, "___ _____");
        assert_eq!(mask.chars().count(), "ice cream".chars().count());
    }

    #[test]
    fn test_masked_counts_chars_not_bytes() {
        assert_eq!(masked("café"), "____");
    }

    #[test]
    fn test_hint_marks() {
        assert_eq!(hint_marks(90, &[40, 70]), vec![36, 63]);
        assert_eq!(hint_marks(2, &[25, 50]), vec![1, 1]);
        assert!(hint_marks(90, &[]).is_empty());
    }

    #[test]
    fn test_hint_sizes_for_eight_letters() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut hints = HintState::new();
        let first = hints.reveal_next("elephant", &mut rng).unwrap();
        assert_eq!(first.len(), 2);
        let second = hints.reveal_next("elephant", &mut rng).unwrap();
        assert_eq!(second.len(), 4);
        assert!(first.iter().all(|i| !second.contains(i)));
        assert_eq!(hints.revealed().len(), 6);
        assert!(hints.reveal_next("elephant", &mut rng).is_none());
    }

    #[test]
    fn test_hint_never_reveals_whitespace() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut hints = HintState::new();
        let word = "hot dog";
        while let Some(positions) = hints.reveal_next(word, &mut rng) {
            assert!(!positions.contains(&3));
        }
        let rendered = hints.render(word);
        assert_eq!(rendered.chars().nth(3), Some(' '));
    }

    #[test]
    fn test_short_word_reveals_at_least_one_and_stops_when_exhausted() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut hints = HintState::new();
        assert_eq!(hints.reveal_next("ox", &mut rng).unwrap().len(), 1);
        // ceil(2 * 0.5) = 1, exactly what remains.
        assert_eq!(hints.reveal_next("ox", &mut rng).unwrap().len(), 1);
        assert_eq!(hints.render("ox"), "ox");
    }

    #[test]
    fn test_single_letter_word_has_one_hint() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut hints = HintState::new();
        assert_eq!(hints.reveal_next("a", &mut rng), Some(vec![0]));
        assert_eq!(hints.reveal_next("a", &mut rng), None);
        assert_eq!(hints.hints_revealed(), 1);
    }
}
