//! Game rules for Scrawl that don't need a clock or a connection.
//!
//! Everything here is synchronous and deterministic given an RNG, so the
//! room actor can call it inline and tests can drive it with a seeded
//! `StdRng`.
//!
//! - [`WordBank`]: the three word options offered to each drawer.
//! - [`masking`]: masked renderings and the two letter hints.
//! - [`GuessEvaluator`]: exact, near and close guesses, and their score.
//! - [`chat`]: who gets to see a chat line.

pub mod chat;
mod error;
mod guess;
pub mod masking;
mod words;

pub use chat::{Audience, ChatRoute};
pub use error::WordBankError;
pub use guess::{GuessEvaluator, GuessOutcome, edit_distance, guess_points, normalize};
pub use masking::HintState;
pub use words::{OPTION_COUNT, WordBank, dedup_words};
