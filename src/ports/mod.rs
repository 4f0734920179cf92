// src/ports/mod.rs

//! Ports to external collaborators consumed by the core: persistence,
//! dictionary content, and identity. The core only depends on these traits;
//! `memory` provides the in-process reference implementations used by the
//! server binary and the tests.

pub mod memory;

use uuid::Uuid;

use crate::game::types::{GameMode, GameSession, PlayerProfile, Round, Submission};

/// Failure reported by the persistence collaborator. Callers treat these as
/// retryable on the next tick; none of them aborts the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    NotFound,
    Unavailable(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::NotFound => write!(f, "record not found"),
            StoreError::Unavailable(reason) => write!(f, "store unavailable: {}", reason),
        }
    }
}

impl std::error::Error for StoreError {}

/// Persistence port for sessions, rounds and submissions.
pub trait GameStore: Send + Sync {
    /// Create a session for the given players. Fails for groups below two.
    fn create_session(
        &self,
        players: &[String],
        mode: GameMode,
    ) -> Result<GameSession, StoreError>;

    fn session(&self, id: Uuid) -> Result<Option<GameSession>, StoreError>;

    /// Mark a session ended and record the winner, if any.
    fn end_session(&self, id: Uuid, winner_id: Option<&str>) -> Result<(), StoreError>;

    /// Create the next round of a session with its letter pool.
    fn create_round(
        &self,
        game_id: Uuid,
        round_number: u32,
        letters: &str,
    ) -> Result<Round, StoreError>;

    fn append_submission(&self, round_id: Uuid, submission: Submission) -> Result<(), StoreError>;

    /// All rounds of a session, ordered by round number.
    fn rounds_for_session(&self, game_id: Uuid) -> Result<Vec<Round>, StoreError>;
}

/// Dictionary port: word membership plus random word-set lookups.
pub trait Dictionary: Send + Sync {
    /// Whether the (already normalized) word exists in the dictionary.
    fn contains(&self, word: &str) -> bool;

    /// Up to `count` random dictionary words of the given length.
    fn random_words(&self, length: usize, count: usize) -> Vec<String>;
}

/// Identity port: profile lookup for verified player ids.
pub trait Identity: Send + Sync {
    /// Create or refresh the profile for a verified player id.
    fn register(&self, player_id: &str, username: &str) -> PlayerProfile;

    fn profile(&self, player_id: &str) -> Option<PlayerProfile>;
}
