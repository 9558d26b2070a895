//! Chat lines and the guesses hidden inside them.

use scrawl_game::chat::{self, ChatRoute};
use scrawl_game::{GuessOutcome, guess_points};
use scrawl_protocol::{ChatAuthor, ChatKind, GameStatus, PlayerId, Recipient, ServerEvent};
use tracing::info;

use crate::RoomError;
use crate::room::RoomActor;

impl RoomActor {
    pub(crate) fn chat(&mut self, player_id: PlayerId, text: &str) -> Result<(), RoomError> {
        let text = text.trim();
        let len = text.chars().count();
        if len == 0 {
            return Err(RoomError::InvalidInput("message is empty".into()));
        }
        if len > self.config.max_message_len {
            return Err(RoomError::InvalidInput(format!(
                "message is longer than {} characters",
                self.config.max_message_len
            )));
        }
        let author = match self.room.player(player_id) {
            Some(p) => ChatAuthor::Player {
                id: p.id,
                name: p.name.clone(),
            },
            None => return Err(RoomError::PlayerNotFound(player_id)),
        };

        let secret = match self.room.status {
            GameStatus::Playing => self.room.word.clone(),
            _ => None,
        };
        let route = chat::route(secret.is_some(), self.room.audience(player_id));

        match (route, secret) {
            (ChatRoute::Guess, Some(secret)) => {
                match self.config.evaluator.evaluate(text, &secret) {
                    GuessOutcome::Correct => self.correct_guess(player_id, &secret),
                    GuessOutcome::Incorrect { close } => {
                        self.post(author, chat::redact(text, &secret), ChatKind::Normal, Recipient::All);
                        if close {
                            self.room.send_to(
                                player_id,
                                ServerEvent::GuessClose {
                                    guess: text.to_owned(),
                                },
                            );
                        }
                    }
                }
            }
            (ChatRoute::Winners, Some(_)) => {
                self.post(author, text.to_owned(), ChatKind::Winners, Recipient::Winners);
            }
            (_, Some(secret)) => {
                self.post(author, chat::redact(text, &secret), ChatKind::Normal, Recipient::All);
            }
            (_, None) => {
                self.post(author, text.to_owned(), ChatKind::Normal, Recipient::All);
            }
        }
        Ok(())
    }

    fn post(&mut self, author: ChatAuthor, text: String, kind: ChatKind, to: Recipient) {
        let message = self.room.push_chat(author, text, kind);
        self.room.deliver(to, ServerEvent::ChatMessage { message });
    }

    fn correct_guess(&mut self, player_id: PlayerId, secret: &str) {
        let points = guess_points(self.room.time_left, self.room.settings.draw_seconds);
        let Some(player) = self.room.player_mut(player_id) else {
            return;
        };
        player.has_guessed = true;
        player.score += points;
        player.turn_points += points;
        let name = player.name.clone();

        info!(room_id = %self.room.id, %player_id, points, time_left = self.room.time_left, "word guessed");
        self.room.deliver(
            Recipient::All,
            ServerEvent::GuessCorrect {
                player_id,
                name: name.clone(),
                points,
            },
        );
        self.post(
            ChatAuthor::System,
            format!("{name} guessed the word!"),
            ChatKind::CorrectGuess,
            Recipient::All,
        );
        self.room.send_to(
            player_id,
            ServerEvent::SecretWord {
                word: secret.to_owned(),
            },
        );
        self.room.broadcast_players();
        self.settle_if_all_guessed();
    }
}
