//! Round and turn progression.
//!
//! ```text
//! Waiting ─start─▶ Selecting ─pick/timeout─▶ Playing ─0s/all guessed─▶ RoundEnd
//!                      ▲                                                  │
//!                      └────────────────── next turn (5 s) ───────────────┤
//!                                                                         ▼
//!                                                 GameEnd ◀── last turn done
//! ```
//!
//! Every turn-scoped timer is armed with the room's current generation.
//! Each start or end of a turn bumps it, so a timer left over from an
//! earlier turn fires into a mismatch and is dropped.

use std::time::Duration;

use scrawl_game::masking;
use scrawl_protocol::{
    GameSettings, GameStatus, PlayerId, Recipient, ScoreGain, ServerEvent, WordMode,
};
use scrawl_tick::{Fired, TickInfo};
use tracing::{debug, error, info, warn};

use crate::RoomError;
use crate::room::{RoomActor, RoomTimer};

impl RoomActor {
    pub(crate) fn start_game(
        &mut self,
        player_id: PlayerId,
        settings: GameSettings,
    ) -> Result<(), RoomError> {
        if self.room.host != Some(player_id) {
            return Err(RoomError::NotHost);
        }
        if !self.room.status.can_start() {
            return Err(RoomError::InvalidState(format!(
                "cannot start a game while {}",
                self.room.status
            )));
        }
        let connected = self.room.connected_count();
        if connected < self.config.min_players {
            return Err(RoomError::NotEnoughPlayers {
                required: self.config.min_players,
                connected,
            });
        }
        let settings = self
            .config
            .validate_settings(settings, self.room.players.len())?;

        let room = &mut self.room;
        room.settings = settings;
        room.round = 0;
        room.drawer = None;
        room.last_drawer = None;
        room.word = None;
        for p in &mut room.players {
            p.score = 0;
            p.turn_points = 0;
            p.has_guessed = false;
            p.has_drawn_this_round = false;
        }
        self.timers.cancel(&RoomTimer::NextTurn);
        self.timers.cancel(&RoomTimer::Settle);

        info!(
            room_id = %self.room.id,
            players = connected,
            rounds = self.room.settings.rounds,
            draw_seconds = self.room.settings.draw_seconds,
            "game started"
        );
        self.advance_turn();
        Ok(())
    }

    /// Picks the next drawer and opens word selection, starting a new
    /// round or ending the game when the rotation is exhausted.
    pub(crate) fn advance_turn(&mut self) {
        self.timers.cancel(&RoomTimer::NextTurn);

        let connected = self.room.connected_count();
        if connected < self.config.min_players {
            info!(room_id = %self.room.id, connected, "too few players to continue");
            self.end_game();
            return;
        }

        if self.room.round == 0 || self.room.next_drawer().is_none() {
            if self.room.round >= self.room.settings.rounds {
                self.end_game();
                return;
            }
            self.room.round += 1;
            for p in &mut self.room.players {
                p.has_drawn_this_round = false;
            }
            debug!(room_id = %self.room.id, round = self.room.round, "round started");
            self.room.deliver(
                Recipient::All,
                ServerEvent::RoundStarted {
                    round: self.room.round,
                    total_rounds: self.room.settings.rounds,
                },
            );
        }

        let Some(drawer) = self.room.next_drawer() else {
            let e = RoomError::Internal("no eligible drawer at the start of a round".into());
            error!(room_id = %self.room.id, error = %e, "ending game");
            self.end_game();
            return;
        };

        if !self.room.transition(GameStatus::Selecting) {
            return;
        }

        let custom = match self.room.settings.word_mode {
            WordMode::CustomWords => Some(self.room.settings.custom_words.as_slice()),
            WordMode::Dictionary => None,
        };
        let options = self.words.draw_options(custom, &mut self.rng);

        let room = &mut self.room;
        room.generation += 1;
        room.drawer = Some(drawer);
        room.last_drawer = Some(drawer);
        room.word = None;
        room.hints = Default::default();
        room.hint_marks.clear();
        room.options = options;
        room.time_left = self.config.selection_seconds;
        room.clear_drawing();
        for p in &mut room.players {
            p.has_guessed = false;
            p.turn_points = 0;
            if p.id == drawer {
                p.has_drawn_this_round = true;
            }
        }
        self.countdown.start();

        debug!(room_id = %self.room.id, %drawer, round = self.room.round, "selecting word");
        self.room.send_to(
            drawer,
            ServerEvent::WordOptions {
                options: self.room.options.clone(),
            },
        );
        self.room.deliver(
            Recipient::All,
            ServerEvent::SelectingWord {
                drawer,
                time_left: self.room.time_left,
            },
        );
        self.room.broadcast_players();
    }

    pub(crate) fn select_word(&mut self, player_id: PlayerId, word: &str) -> Result<(), RoomError> {
        if self.room.status != GameStatus::Selecting {
            return Err(RoomError::InvalidState("no word is being chosen".into()));
        }
        if self.room.drawer != Some(player_id) {
            return Err(RoomError::NotDrawer);
        }
        let word = word.trim();
        let chosen = self
            .room
            .options
            .iter()
            .find(|o| o.to_lowercase() == word.to_lowercase())
            .cloned()
            .ok_or(RoomError::WordNotOffered)?;
        self.begin_drawing(chosen);
        Ok(())
    }

    /// Selecting → Playing with `word` as the secret.
    fn begin_drawing(&mut self, word: String) {
        let Some(drawer) = self.room.drawer else {
            error!(room_id = %self.room.id, "drawing phase without a drawer");
            self.end_game();
            return;
        };
        if !self.room.transition(GameStatus::Playing) {
            return;
        }

        let turn_seconds = self.config.turn_seconds(&self.room.settings);
        let masked = masking::masked(&word);
        let room = &mut self.room;
        room.generation += 1;
        room.word = Some(word.clone());
        room.options.clear();
        room.hints = Default::default();
        room.turn_seconds = turn_seconds;
        room.hint_marks = masking::hint_marks(turn_seconds, room.settings.hint_cadence.marks());
        room.time_left = turn_seconds;
        room.clear_drawing();
        self.countdown.start();

        info!(room_id = %self.room.id, %drawer, round = self.room.round, "turn started");
        self.room.send_to(
            drawer,
            ServerEvent::TurnStarted {
                drawer,
                word,
                time_left: turn_seconds,
                settings: self.room.settings.clone(),
            },
        );
        self.room.deliver(
            Recipient::AllExcept(drawer),
            ServerEvent::TurnStarted {
                drawer,
                word: masked,
                time_left: turn_seconds,
                settings: self.room.settings.clone(),
            },
        );
    }

    /// One countdown tick, possibly standing in for several late seconds.
    pub(crate) fn on_tick(&mut self, tick: TickInfo) {
        if !self.room.status.is_turn_active() {
            warn!(room_id = %self.room.id, status = %self.room.status, "countdown running outside a turn");
            self.countdown.stop();
            return;
        }

        for _ in 0..=tick.ticks_skipped {
            self.room.time_left = self.room.time_left.saturating_sub(1);
            self.room.deliver(
                Recipient::All,
                ServerEvent::TimeTick {
                    time_left: self.room.time_left,
                },
            );

            match self.room.status {
                GameStatus::Playing => {
                    self.reveal_due_hints();
                    if self.room.time_left == 0 {
                        self.end_turn(self.config.round_end_delay);
                        return;
                    }
                }
                GameStatus::Selecting if self.room.time_left == 0 => {
                    let Some(first) = self.room.options.first().cloned() else {
                        error!(room_id = %self.room.id, "selection timed out with no options");
                        self.end_game();
                        return;
                    };
                    debug!(room_id = %self.room.id, "selection timed out, picking first option");
                    self.begin_drawing(first);
                    return;
                }
                _ => {}
            }
        }
    }

    fn reveal_due_hints(&mut self) {
        let Some(word) = self.room.word.clone() else {
            return;
        };
        let elapsed = self.room.turn_seconds.saturating_sub(self.room.time_left);
        loop {
            let next = usize::from(self.room.hints.hints_revealed());
            match self.room.hint_marks.get(next) {
                Some(&mark) if elapsed >= mark => {}
                _ => return,
            }
            if self.room.hints.reveal_next(&word, &mut self.rng).is_none() {
                return;
            }
            let hint = self.room.hints.hints_revealed();
            debug!(room_id = %self.room.id, hint, "hint revealed");
            self.room.deliver(
                Recipient::Guessing,
                ServerEvent::HintRevealed {
                    hint,
                    word: self.room.hints.render(&word),
                },
            );
        }
    }

    /// Selecting | Playing → RoundEnd. The next turn starts after `delay`.
    pub(crate) fn end_turn(&mut self, delay: Duration) {
        if !self.room.status.is_turn_active() {
            return;
        }
        self.countdown.stop();
        self.timers.cancel(&RoomTimer::Settle);

        let drawer = self.room.drawer;
        let word = self.room.word.take();
        let any_correct = self.room.players.iter().any(|p| p.has_guessed);
        if any_correct {
            let bonus = self.config.drawer_bonus;
            if let Some(p) = drawer.and_then(|d| self.room.player_mut(d)) {
                p.score += bonus;
                p.turn_points += bonus;
            }
        }

        if !self.room.transition(GameStatus::RoundEnd) {
            return;
        }
        let room = &mut self.room;
        room.generation += 1;
        room.drawer = None;
        room.options.clear();
        room.hints = Default::default();
        room.hint_marks.clear();
        room.time_left = 0;

        let gains: Vec<ScoreGain> = room
            .players
            .iter()
            .filter(|p| p.turn_points > 0)
            .map(|p| ScoreGain {
                player_id: p.id,
                points: p.turn_points,
            })
            .collect();
        let is_last_round = room.round >= room.settings.rounds && room.next_drawer().is_none();

        debug!(room_id = %room.id, round = room.round, ?drawer, any_correct, "turn ended");
        room.deliver(
            Recipient::All,
            ServerEvent::RoundEnded {
                round: room.round,
                word: word.clone(),
                drawer,
                gains,
                players: room.views(),
                is_last_round,
            },
        );
        if let Some(word) = word {
            room.system_message(format!("The word was {word}"));
        }

        let generation = self.room.generation;
        self.timers.schedule(RoomTimer::NextTurn, delay, generation);
    }

    /// Ends the game and broadcasts the final ranking.
    pub(crate) fn end_game(&mut self) {
        self.countdown.stop();
        self.timers.cancel_where(|t| !matches!(t, RoomTimer::Grace(_)));

        if !self.room.transition(GameStatus::GameEnd) {
            return;
        }
        let room = &mut self.room;
        room.generation += 1;
        room.drawer = None;
        room.word = None;
        room.options.clear();
        room.hints = Default::default();
        room.time_left = 0;
        for p in &mut room.players {
            p.has_guessed = false;
        }

        let ranking = room.ranking();
        info!(
            room_id = %room.id,
            round = room.round,
            winner = ?ranking.first().map(|r| r.player_id),
            "game ended"
        );
        room.deliver(Recipient::All, ServerEvent::GameEnded { ranking });
        room.broadcast_players();
    }

    /// Schedules the settle pause once every connected guesser has the word.
    pub(crate) fn settle_if_all_guessed(&mut self) {
        if self.room.status == GameStatus::Playing
            && self.room.all_guessed()
            && !self.timers.is_scheduled(&RoomTimer::Settle)
        {
            let generation = self.room.generation;
            self.timers
                .schedule(RoomTimer::Settle, self.config.settle_delay, generation);
        }
    }

    pub(crate) fn on_timer(&mut self, fired: Fired<RoomTimer>) {
        match fired.key {
            RoomTimer::NextTurn | RoomTimer::Settle if fired.generation != self.room.generation => {
                debug!(room_id = %self.room.id, timer = ?fired.key, "stale timer ignored");
            }
            RoomTimer::NextTurn => {
                if self.room.status == GameStatus::RoundEnd {
                    self.advance_turn();
                }
            }
            RoomTimer::Settle => {
                if self.room.status == GameStatus::Playing {
                    self.end_turn(self.config.round_end_delay);
                }
            }
            RoomTimer::Grace(player_id) => self.on_grace_expired(player_id, fired.generation),
        }
    }
}
