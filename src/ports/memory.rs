use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use rand::seq::IteratorRandom;
use uuid::Uuid;

use super::{Dictionary, GameStore, Identity, StoreError};
use crate::config::game::MIN_WORD_LENGTH;
use crate::game::types::{GameMode, GameSession, PlayerProfile, Round, Submission, epoch_seconds};

/// In-memory implementation of [`GameStore`]. One process owns all state, so
/// a single mutex around the tables is enough; every method is a short
/// critical section.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<StoreInner>,
}

#[derive(Default)]
struct StoreInner {
    sessions: HashMap<Uuid, GameSession>,
    rounds: HashMap<Uuid, Round>,
    rounds_by_game: HashMap<Uuid, Vec<Uuid>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, StoreInner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Unavailable("store mutex poisoned".to_string()))
    }
}

impl GameStore for MemoryStore {
    fn create_session(
        &self,
        players: &[String],
        mode: GameMode,
    ) -> Result<GameSession, StoreError> {
        if players.len() < 2 {
            return Err(StoreError::Unavailable(
                "a session needs at least two players".to_string(),
            ));
        }

        let session = GameSession {
            id: Uuid::new_v4(),
            players: players.to_vec(),
            game_mode: mode,
            created_at: epoch_seconds(),
            ended_at: None,
            winner_id: None,
            is_active: true,
        };

        let mut inner = self.lock()?;
        inner.sessions.insert(session.id, session.clone());
        Ok(session)
    }

    fn session(&self, id: Uuid) -> Result<Option<GameSession>, StoreError> {
        Ok(self.lock()?.sessions.get(&id).cloned())
    }

    fn end_session(&self, id: Uuid, winner_id: Option<&str>) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        let session = inner.sessions.get_mut(&id).ok_or(StoreError::NotFound)?;
        if session.is_active {
            session.is_active = false;
            session.ended_at = Some(epoch_seconds());
            session.winner_id = winner_id.map(str::to_string);
        }
        Ok(())
    }

    fn create_round(
        &self,
        game_id: Uuid,
        round_number: u32,
        letters: &str,
    ) -> Result<Round, StoreError> {
        let mut inner = self.lock()?;
        if !inner.sessions.contains_key(&game_id) {
            return Err(StoreError::NotFound);
        }

        let round = Round {
            id: Uuid::new_v4(),
            game_id,
            round_number,
            letters: letters.to_string(),
            submissions: Vec::new(),
        };
        inner.rounds.insert(round.id, round.clone());
        inner.rounds_by_game.entry(game_id).or_default().push(round.id);
        Ok(round)
    }

    fn append_submission(&self, round_id: Uuid, submission: Submission) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        let round = inner.rounds.get_mut(&round_id).ok_or(StoreError::NotFound)?;
        round.submissions.push(submission);
        Ok(())
    }

    fn rounds_for_session(&self, game_id: Uuid) -> Result<Vec<Round>, StoreError> {
        let inner = self.lock()?;
        let ids = match inner.rounds_by_game.get(&game_id) {
            Some(ids) => ids,
            None => return Ok(Vec::new()),
        };
        let mut rounds: Vec<Round> = ids
            .iter()
            .filter_map(|id| inner.rounds.get(id).cloned())
            .collect();
        rounds.sort_by_key(|r| r.round_number);
        Ok(rounds)
    }
}

/// In-memory word list. The set is immutable after construction, so lookups
/// need no locking.
pub struct MemoryDictionary {
    words: HashSet<String>,
}

impl MemoryDictionary {
    /// Build a dictionary from any word source; entries are normalized and
    /// short or non-alphabetic ones are dropped.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| w.chars().count() >= MIN_WORD_LENGTH && w.chars().all(char::is_alphabetic))
            .collect();
        MemoryDictionary { words }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Dictionary for MemoryDictionary {
    fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    fn random_words(&self, length: usize, count: usize) -> Vec<String> {
        self.words
            .iter()
            .filter(|w| w.chars().count() == length)
            .cloned()
            .choose_multiple(&mut rand::rng(), count)
    }
}

/// In-memory profile table for the identity port.
#[derive(Default)]
pub struct MemoryIdentity {
    profiles: Mutex<HashMap<String, PlayerProfile>>,
}

impl MemoryIdentity {
    pub fn new() -> Self {
        MemoryIdentity::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, PlayerProfile>> {
        self.profiles
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Identity for MemoryIdentity {
    fn register(&self, player_id: &str, username: &str) -> PlayerProfile {
        let profile = PlayerProfile {
            id: player_id.to_string(),
            username: username.to_string(),
        };
        self.lock().insert(player_id.to_string(), profile.clone());
        profile
    }

    fn profile(&self, player_id: &str) -> Option<PlayerProfile> {
        self.lock().get(player_id).cloned()
    }
}
