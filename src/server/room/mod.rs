/// Game room module: per-match state machines and the registry that owns them.

pub mod messages;
pub mod registry;
pub mod room;

use std::sync::Arc;
use std::time::Duration;

use crate::config::game::{
    GAME_START_DELAY_SECS, LETTERS_PER_ROUND, MAX_ROUNDS, ROOM_STALE_AFTER_SECS,
    ROOM_SWEEP_INTERVAL_SECS, ROUND_BREAK_SECS, ROUND_DURATION_SECS,
};
use crate::game::letters::LetterGenerator;
use crate::game::scoring::ScoringSystem;
use crate::game::validator::WordValidator;
use crate::ports::{GameStore, Identity};

/// Timings and limits for a room. Defaults come from the game configuration;
/// tests shrink the durations.
#[derive(Debug, Clone, Copy)]
pub struct RoomConfig {
    pub start_delay: Duration,
    pub round_duration: Duration,
    pub round_break: Duration,
    pub stale_after: Duration,
    pub sweep_interval: Duration,
    pub max_rounds: u32,
    pub letters_per_round: usize,
}

impl Default for RoomConfig {
    fn default() -> Self {
        RoomConfig {
            start_delay: Duration::from_secs(GAME_START_DELAY_SECS),
            round_duration: Duration::from_secs(ROUND_DURATION_SECS),
            round_break: Duration::from_secs(ROUND_BREAK_SECS),
            stale_after: Duration::from_secs(ROOM_STALE_AFTER_SECS),
            sweep_interval: Duration::from_secs(ROOM_SWEEP_INTERVAL_SECS),
            max_rounds: MAX_ROUNDS,
            letters_per_round: LETTERS_PER_ROUND,
        }
    }
}

/// Collaborators shared by every room.
#[derive(Clone)]
pub struct RoomServices {
    pub store: Arc<dyn GameStore>,
    pub identity: Arc<dyn Identity>,
    pub validator: WordValidator,
    pub scoring: ScoringSystem,
    pub letters: LetterGenerator,
}
