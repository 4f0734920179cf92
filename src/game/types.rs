use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Available game modes. Every shipped mode currently plays with two players;
/// the required group size is kept per-mode so larger parties stay possible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameMode {
    #[default]
    Classic,
    VoiceBattle,
    Asymmetric,
    TimeAttack,
}

impl GameMode {
    /// Number of players required to start a game in this mode.
    pub fn required_players(&self) -> usize {
        match self {
            GameMode::Classic
            | GameMode::VoiceBattle
            | GameMode::Asymmetric
            | GameMode::TimeAttack => 2,
        }
    }

    pub fn all() -> [GameMode; 4] {
        [
            GameMode::Classic,
            GameMode::VoiceBattle,
            GameMode::Asymmetric,
            GameMode::TimeAttack,
        ]
    }
}

/// Lifecycle of a game room.
///
/// `GameOver` is terminal; a room never leaves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Waiting,
    RoundActive,
    RoundOver,
    GameOver,
}

/// Public player profile, as exposed by the identity collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub id: String,
    pub username: String,
}

/// A persisted game session between a fixed set of players.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSession {
    pub id: Uuid,
    pub players: Vec<String>,
    pub game_mode: GameMode,
    pub created_at: u64,
    pub ended_at: Option<u64>,
    pub winner_id: Option<String>,
    pub is_active: bool,
}

/// One timed round of a game session, with its immutable letter pool and the
/// submissions appended while it was open.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    pub id: Uuid,
    pub game_id: Uuid,
    pub round_number: u32,
    pub letters: String,
    pub submissions: Vec<Submission>,
}

/// A word submitted by a player during a round.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub player_id: String,
    pub word: String,
    pub timestamp: u64,
    pub is_valid: bool,
    pub score: i32,
}

/// Seconds since the Unix epoch, for persisted timestamps.
pub fn epoch_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Milliseconds since the Unix epoch, for wire timestamps (chat).
pub fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
