/// Game room actor: one match's state machine.
///
/// All mutations of a room — submissions, transitions, timer scheduling — run
/// through this actor's mailbox, so no two state changes for the same room
/// race each other; different rooms proceed fully in parallel.
///
/// The room owns at most one pending timer at any instant (pre-game delay,
/// round end, or round break). Scheduling always cancels the previous handle
/// first, and forced endings cancel it, so a stale timer can never revive a
/// finished room.
use actix::prelude::*;
use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};
use uuid::Uuid;

use actix::MessageResult;
use log::{debug, error, info, warn};

use super::messages::{
    Chat, CheckStale, CloseRoom, EndRoundRequest, PlayerDisconnected, SubmissionOutcome,
    SubmitWord,
};
use super::registry::{RoomClosed, RoomRegistry};
use super::{RoomConfig, RoomServices};
use crate::game::types::{GameMode, GameSession, GameStatus, Submission, epoch_millis,
    epoch_seconds};
use crate::game::validator::WordValidator;
use crate::ports::{GameStore, Identity};
use crate::protocol::GameEvent;
use crate::server::registry::{SendTo, SendToMany, SessionRegistry};

const REASON_COMPLETED: &str = "Game completed";
const REASON_NOT_ENOUGH_PLAYERS: &str = "Not enough players";
const REASON_TIMEOUT: &str = "timeout";
const REASON_ROUND_ERROR: &str = "Error creating round";

struct OpenRound {
    id: Uuid,
    letters: String,
    started_at: Instant,
}

pub struct GameRoom {
    game_id: Uuid,
    mode: GameMode,
    participants: Vec<String>,
    status: GameStatus,
    round_number: u32,
    current_round: Option<OpenRound>,
    /// (player id, lowercased word) pairs already accepted this round.
    seen_words: HashSet<(String, String)>,
    /// Consecutive valid submissions per player, for the streak bonus.
    valid_streaks: HashMap<String, u32>,
    last_activity: Instant,
    timer: Option<SpawnHandle>,
    config: RoomConfig,
    services: RoomServices,
    registry: Addr<SessionRegistry>,
    manager: Addr<RoomRegistry>,
}

impl GameRoom {
    pub fn new(
        session: &GameSession,
        config: RoomConfig,
        services: RoomServices,
        registry: Addr<SessionRegistry>,
        manager: Addr<RoomRegistry>,
    ) -> Self {
        GameRoom {
            game_id: session.id,
            mode: session.game_mode,
            participants: session.players.clone(),
            status: GameStatus::Waiting,
            round_number: 0,
            current_round: None,
            seen_words: HashSet::new(),
            valid_streaks: HashMap::new(),
            last_activity: Instant::now(),
            timer: None,
            config,
            services,
            registry,
            manager,
        }
    }

    fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    /// Replace the room's single pending timer, cancelling any prior one.
    fn schedule<F>(&mut self, ctx: &mut Context<Self>, after: Duration, task: F)
    where
        F: FnOnce(&mut Self, &mut Context<Self>) + 'static,
    {
        if let Some(handle) = self.timer.take() {
            ctx.cancel_future(handle);
        }
        self.timer = Some(ctx.run_later(after, task));
    }

    fn cancel_timer(&mut self, ctx: &mut Context<Self>) {
        if let Some(handle) = self.timer.take() {
            ctx.cancel_future(handle);
        }
    }

    fn broadcast(&self, event: GameEvent) {
        self.registry.do_send(SendToMany {
            player_ids: self.participants.clone(),
            event,
        });
    }

    /// Start the game: valid only while waiting with enough players.
    fn start_game(&mut self, ctx: &mut Context<Self>) {
        if self.status != GameStatus::Waiting {
            warn!("[GameRoom] Cannot start game {}: not waiting", self.game_id);
            return;
        }
        if self.participants.len() < 2 {
            warn!(
                "[GameRoom] Cannot start game {}: not enough players",
                self.game_id
            );
            return;
        }
        self.start_next_round(ctx);
    }

    fn start_next_round(&mut self, ctx: &mut Context<Self>) {
        self.round_number += 1;
        if self.round_number > self.config.max_rounds {
            self.end_game(REASON_COMPLETED, ctx);
            return;
        }

        let letters = self
            .services
            .letters
            .generate(self.config.letters_per_round);
        let round = match self
            .services
            .store
            .create_round(self.game_id, self.round_number, &letters)
        {
            Ok(round) => round,
            Err(e) => {
                error!(
                    "[GameRoom] Failed to create round {} for game {}: {}",
                    self.round_number, self.game_id, e
                );
                self.end_game(REASON_ROUND_ERROR, ctx);
                return;
            }
        };

        self.current_round = Some(OpenRound {
            id: round.id,
            letters: round.letters.clone(),
            started_at: Instant::now(),
        });
        self.seen_words.clear();
        self.status = GameStatus::RoundActive;
        self.touch();

        info!(
            "[GameRoom] Game {} round {} started with letters '{}'",
            self.game_id, self.round_number, round.letters
        );
        self.broadcast(GameEvent::RoundStarted {
            game_id: self.game_id,
            round,
            time_limit: self.config.round_duration.as_secs(),
        });

        self.schedule(ctx, self.config.round_duration, |act, ctx| {
            act.end_round(ctx)
        });
    }

    /// Close the current round, broadcast its results, and either schedule
    /// the next round or finish the game.
    fn end_round(&mut self, ctx: &mut Context<Self>) {
        if self.status != GameStatus::RoundActive {
            return;
        }
        let Some(open) = self.current_round.take() else {
            return;
        };

        self.cancel_timer(ctx);
        self.status = GameStatus::RoundOver;
        self.touch();

        let submissions = match self.services.store.rounds_for_session(self.game_id) {
            Ok(rounds) => rounds
                .into_iter()
                .find(|r| r.id == open.id)
                .map(|r| r.submissions)
                .unwrap_or_default(),
            Err(e) => {
                error!(
                    "[GameRoom] Could not load round results for game {}: {}",
                    self.game_id, e
                );
                Vec::new()
            }
        };

        let mut results: HashMap<String, i32> = HashMap::new();
        let mut winning: Option<&Submission> = None;
        for submission in submissions.iter().filter(|s| s.is_valid) {
            *results.entry(submission.player_id.clone()).or_insert(0) += submission.score;
            if winning.is_none_or(|w| submission.score > w.score) {
                winning = Some(submission);
            }
        }

        info!(
            "[GameRoom] Game {} round {} over after {:?}",
            self.game_id,
            self.round_number,
            open.started_at.elapsed()
        );
        self.broadcast(GameEvent::RoundEnded {
            game_id: self.game_id,
            round_id: open.id,
            results,
            winning_word: winning.map(|s| s.word.clone()).unwrap_or_default(),
            winning_player_id: winning.map(|s| s.player_id.clone()),
        });

        if self.round_number < self.config.max_rounds {
            self.schedule(ctx, self.config.round_break, |act, ctx| {
                act.start_next_round(ctx)
            });
        } else {
            self.end_game(REASON_COMPLETED, ctx);
        }
    }

    /// Finish the game. Idempotent: the first call wins, so at most one
    /// `GameEnded` is ever broadcast per room.
    fn end_game(&mut self, reason: &str, ctx: &mut Context<Self>) {
        if self.status == GameStatus::GameOver {
            return;
        }
        self.status = GameStatus::GameOver;
        self.cancel_timer(ctx);
        self.current_round = None;
        self.touch();

        let results = self.final_scores();
        let winner_id = unique_winner(&results);
        if let Err(e) = self
            .services
            .store
            .end_session(self.game_id, winner_id.as_deref())
        {
            error!(
                "[GameRoom] Failed to record end of game {}: {}",
                self.game_id, e
            );
        }

        info!("[GameRoom] Game {} over: {}", self.game_id, reason);
        self.broadcast(GameEvent::GameEnded {
            game_id: self.game_id,
            results,
            winner_id,
            reason: reason.to_string(),
        });

        self.manager.do_send(RoomClosed {
            game_id: self.game_id,
        });
        ctx.stop();
    }

    /// Total score per player over every round, valid submissions only.
    fn final_scores(&self) -> HashMap<String, i32> {
        let rounds = match self.services.store.rounds_for_session(self.game_id) {
            Ok(rounds) => rounds,
            Err(e) => {
                error!(
                    "[GameRoom] Could not load final scores for game {}: {}",
                    self.game_id, e
                );
                return HashMap::new();
            }
        };

        let mut totals: HashMap<String, i32> = HashMap::new();
        for submission in rounds
            .iter()
            .flat_map(|r| r.submissions.iter())
            .filter(|s| s.is_valid)
        {
            *totals.entry(submission.player_id.clone()).or_insert(0) += submission.score;
        }
        totals
    }

    fn submit_word(&mut self, msg: SubmitWord) -> SubmissionOutcome {
        let (round_id, letters, elapsed_secs) = match (&self.status, &self.current_round) {
            (GameStatus::RoundActive, Some(open)) if open.id == msg.round_id => (
                open.id,
                open.letters.clone(),
                open.started_at.elapsed().as_secs(),
            ),
            _ => {
                debug!(
                    "[GameRoom] Submission by {} outside an open round, ignoring",
                    msg.player_id
                );
                return SubmissionOutcome::rejected();
            }
        };
        if !self.participants.contains(&msg.player_id) {
            return SubmissionOutcome::rejected();
        }

        let seen_key = (msg.player_id.clone(), msg.word.trim().to_lowercase());
        if self.seen_words.contains(&seen_key) {
            debug!(
                "[GameRoom] Duplicate word '{}' by {} in game {}",
                msg.word, msg.player_id, self.game_id
            );
            return SubmissionOutcome::rejected();
        }

        // Validity needs both the dictionary and the letter pool; a word that
        // cannot be built from the pool never scores, whatever the dictionary
        // says.
        let is_valid = self.services.validator.is_valid_word(&msg.word)
            && WordValidator::can_form_word(&msg.word, &letters);
        let score = if is_valid {
            let mut score = self.services.scoring.score(&msg.word);
            if self.mode == GameMode::TimeAttack {
                score += self
                    .services
                    .scoring
                    .time_bonus(elapsed_secs, self.config.round_duration.as_secs());
            }
            let streak = self.valid_streaks.entry(msg.player_id.clone()).or_insert(0);
            *streak += 1;
            score + self.services.scoring.streak_bonus(*streak)
        } else {
            self.valid_streaks.insert(msg.player_id.clone(), 0);
            0
        };

        let submission = Submission {
            player_id: msg.player_id.clone(),
            word: msg.word.clone(),
            timestamp: epoch_seconds(),
            is_valid,
            score,
        };
        if let Err(e) = self.services.store.append_submission(round_id, submission) {
            warn!(
                "[GameRoom] Could not persist submission for game {}: {}",
                self.game_id, e
            );
            return SubmissionOutcome::rejected();
        }

        self.seen_words.insert(seen_key);
        self.touch();

        let event = GameEvent::WordResult {
            player_id: msg.player_id.clone(),
            game_id: self.game_id,
            word: msg.word,
            is_valid,
            score,
        };
        self.registry.do_send(SendTo {
            player_id: msg.player_id.clone(),
            event: event.clone(),
        });
        if is_valid {
            let others: Vec<String> = self
                .participants
                .iter()
                .filter(|id| **id != msg.player_id)
                .cloned()
                .collect();
            if !others.is_empty() {
                self.registry.do_send(SendToMany {
                    player_ids: others,
                    event,
                });
            }
        }

        SubmissionOutcome {
            success: true,
            is_valid,
            score,
        }
    }
}

/// The player with the strictly highest total; a tie leaves the winner unset.
fn unique_winner(results: &HashMap<String, i32>) -> Option<String> {
    let best = results.values().max()?;
    let mut leaders = results.iter().filter(|(_, score)| *score == best);
    let winner = leaders.next()?;
    if leaders.next().is_some() {
        return None;
    }
    Some(winner.0.clone())
}

impl Actor for GameRoom {
    type Context = Context<Self>;

    /// A new room waits briefly so players can see who they were matched
    /// with, then starts round one.
    fn started(&mut self, ctx: &mut Self::Context) {
        info!(
            "[GameRoom] Room created for game {} ({:?}) with {} players",
            self.game_id,
            self.mode,
            self.participants.len()
        );
        self.schedule(ctx, self.config.start_delay, |act, ctx| {
            act.start_game(ctx)
        });
    }
}

impl Handler<SubmitWord> for GameRoom {
    type Result = MessageResult<SubmitWord>;

    fn handle(&mut self, msg: SubmitWord, _ctx: &mut Self::Context) -> Self::Result {
        MessageResult(self.submit_word(msg))
    }
}

impl Handler<EndRoundRequest> for GameRoom {
    type Result = ();

    /// Handles a participant ending the round ahead of the timer.
    fn handle(&mut self, msg: EndRoundRequest, ctx: &mut Self::Context) -> Self::Result {
        if !self.participants.contains(&msg.player_id) {
            return;
        }
        let open = self
            .current_round
            .as_ref()
            .is_some_and(|r| r.id == msg.round_id);
        if self.status != GameStatus::RoundActive || !open {
            debug!(
                "[GameRoom] EndRound by {} for a closed round, ignoring",
                msg.player_id
            );
            return;
        }
        info!(
            "[GameRoom] Game {} round {} ended early by {}",
            self.game_id, self.round_number, msg.player_id
        );
        self.end_round(ctx);
    }
}

impl Handler<Chat> for GameRoom {
    type Result = ();

    fn handle(&mut self, msg: Chat, _ctx: &mut Self::Context) -> Self::Result {
        if !self.participants.contains(&msg.player_id) {
            return;
        }
        let username = self
            .services
            .identity
            .profile(&msg.player_id)
            .map(|p| p.username)
            .unwrap_or_else(|| msg.player_id.clone());
        self.broadcast(GameEvent::ChatReceived {
            player_id: msg.player_id,
            username,
            message: msg.message,
            timestamp: epoch_millis(),
        });
    }
}

impl Handler<PlayerDisconnected> for GameRoom {
    type Result = ();

    /// Handles a participant dropping out. The room ends the moment fewer
    /// than two players remain.
    fn handle(&mut self, msg: PlayerDisconnected, ctx: &mut Self::Context) -> Self::Result {
        let Some(position) = self
            .participants
            .iter()
            .position(|id| *id == msg.player_id)
        else {
            return;
        };
        self.participants.remove(position);
        self.touch();
        info!(
            "[GameRoom] Player {} left game {} ({} remaining)",
            msg.player_id,
            self.game_id,
            self.participants.len()
        );

        if self.status != GameStatus::GameOver && self.participants.len() < 2 {
            self.end_game(REASON_NOT_ENOUGH_PLAYERS, ctx);
        }
    }
}

impl Handler<CheckStale> for GameRoom {
    type Result = ();

    fn handle(&mut self, _msg: CheckStale, ctx: &mut Self::Context) -> Self::Result {
        if self.status != GameStatus::GameOver
            && self.last_activity.elapsed() >= self.config.stale_after
        {
            info!("[GameRoom] Game {} is stale, closing", self.game_id);
            self.end_game(REASON_TIMEOUT, ctx);
        }
    }
}

impl Handler<CloseRoom> for GameRoom {
    type Result = ();

    fn handle(&mut self, msg: CloseRoom, ctx: &mut Self::Context) -> Self::Result {
        self.end_game(&msg.reason, ctx);
    }
}
