//! Chat visibility.
//!
//! While a word is live, players who already know it (the drawer and the
//! correct guessers) must not leak it to those still guessing. Chat from a
//! correct guesser goes to the "winners" only; chat from anyone still
//! guessing is evaluated as a guess first.

use scrawl_protocol::ChatKind;

/// A player's relation to the current turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Audience {
    pub is_drawer: bool,
    pub has_guessed: bool,
}

impl Audience {
    /// Knows the secret word.
    pub fn is_winner(self) -> bool {
        self.is_drawer || self.has_guessed
    }
}

/// Where an incoming chat line should go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRoute {
    /// Ordinary message for the whole room.
    Everyone,
    /// Only the drawer and correct guessers.
    Winners,
    /// Run it through the guess evaluator first.
    Guess,
}

/// Routes a line from `sender`. `playing` is true while a word is live.
pub fn route(playing: bool, sender: Audience) -> ChatRoute {
    if !playing || sender.is_drawer {
        ChatRoute::Everyone
    } else if sender.has_guessed {
        ChatRoute::Winners
    } else {
        ChatRoute::Guess
    }
}

/// Whether a stored message of `kind` may be shown to `viewer`.
pub fn is_visible(kind: ChatKind, viewer: Audience) -> bool {
    match kind {
        ChatKind::Winners => viewer.is_winner(),
        ChatKind::Normal | ChatKind::System | ChatKind::CorrectGuess => true,
    }
}

/// Replaces every case-insensitive occurrence of `secret` in `text` with
/// asterisks, one per source char covered.
pub fn redact(text: &str, secret: &str) -> String {
    let needle: Vec<char> = secret.chars().flat_map(char::to_lowercase).collect();
    if needle.is_empty() {
        return text.to_owned();
    }
    let chars: Vec<char> = text.chars().collect();

    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        match match_len(&chars[i..], &needle) {
            Some(len) => {
                out.extend(std::iter::repeat_n('*', len));
                i += len;
            }
            None => {
                out.push(chars[i]);
                i += 1;
            }
        }
    }
    out
}

/// How many leading chars of `chars` lowercase into `needle`. A char whose
/// lowercase form expands (e.g. 'İ') counts once it finishes the needle.
fn match_len(chars: &[char], needle: &[char]) -> Option<usize> {
    let mut matched = 0;
    for (taken, c) in chars.iter().enumerate() {
        for lower in c.to_lowercase() {
            if needle.get(matched) != Some(&lower) {
                return None;
            }
            matched += 1;
            if matched == needle.len() {
                return Some(taken + 1);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const DRAWER: Audience = Audience {
        is_drawer: true,
        has_guessed: false,
    };
    const WINNER: Audience = Audience {
        is_drawer: false,
        has_guessed: true,
    };
    const GUESSER: Audience = Audience {
        is_drawer: false,
        has_guessed: false,
    };

    #[test]
    fn test_route_outside_play_is_everyone() {
        assert_eq!(route(false, GUESSER), ChatRoute::Everyone);
        assert_eq!(route(false, WINNER), ChatRoute::Everyone);
    }

    #[test]
    fn test_route_while_playing() {
        assert_eq!(route(true, DRAWER), ChatRoute::Everyone);
        assert_eq!(route(true, WINNER), ChatRoute::Winners);
        assert_eq!(route(true, GUESSER), ChatRoute::Guess);
    }

    #[test]
    fn test_winners_messages_hidden_from_guessers() {
        assert!(!is_visible(ChatKind::Winners, GUESSER));
        assert!(is_visible(ChatKind::Winners, WINNER));
        assert!(is_visible(ChatKind::Winners, DRAWER));
        assert!(is_visible(ChatKind::Normal, GUESSER));
        assert!(is_visible(ChatKind::CorrectGuess, GUESSER));
    }

    #[test]
    fn test_redact_is_case_insensitive() {
        assert_eq!(redact("it's a DOG, a dog!", "dog"), "it's a ***, a ***!");
        assert_eq!(redact("hot dogs", "hot dog"), "*******s");
    }

    #[test]
    fn test_redact_leaves_other_text_alone() {
        assert_eq!(redact("nice drawing", "dog"), "nice drawing");
        assert_eq!(redact("anything", ""), "anything");
    }

    #[test]
    fn test_redact_survives_expanding_lowercase() {
        assert_eq!(redact("İ think dog", "dog"), "İ think ***");
        assert_eq!(redact("DOG İİ dOg", "dog"), "*** İİ ***");
        assert_eq!(redact("so DOGİ", "dogi"), "so ****");
    }
}
