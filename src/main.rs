//! Main entry point for the word game backend.
//!
//! Initializes the actor system, wires the collaborator ports, and launches
//! the HTTP server with the WebSocket endpoint players connect through.

use actix::Actor;
use actix_web::{App, HttpServer, web};
use std::sync::Arc;

use log::{info, warn};

use crate::game::letters::LetterGenerator;
use crate::game::scoring::ScoringSystem;
use crate::game::validator::WordValidator;
use crate::ports::memory::{MemoryDictionary, MemoryIdentity, MemoryStore};
use crate::ports::{GameStore, Identity};
use crate::server::matchmaking::server::MatchmakingServer;
use crate::server::registry::SessionRegistry;
use crate::server::room::registry::RoomRegistry;
use crate::server::room::{RoomConfig, RoomServices};

pub mod config;
mod game;
mod ports;
mod protocol;
mod server;

// Fallback word list for running without a dictionary file.
const DEFAULT_WORDS: &[&str] = &[
    "ant", "art", "ate", "ear", "eat", "era", "net", "not", "note", "oat", "one", "ore",
    "rat", "rate", "rent", "rose", "rot", "rote", "sat", "sea", "seat", "set", "son",
    "star", "stare", "stone", "store", "tan", "tar", "tea", "tear", "ten", "tie", "tier",
    "toe", "ton", "tone", "tore", "torn", "tarn", "snare", "stern", "notes", "tones",
    "stores", "reason", "senior", "nearest",
];

fn load_dictionary() -> MemoryDictionary {
    let path = std::env::var("DICTIONARY_FILE").unwrap_or_else(|_| "words.txt".to_string());
    match std::fs::read_to_string(&path) {
        Ok(contents) => {
            let dictionary = MemoryDictionary::from_words(contents.lines());
            info!(
                "[Server] Dictionary loaded from {}: {} words",
                path,
                dictionary.len()
            );
            dictionary
        }
        Err(_) => {
            warn!(
                "[Server] Dictionary file '{}' not readable, using the built-in word list",
                path
            );
            MemoryDictionary::from_words(DEFAULT_WORDS.iter().copied())
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logger from environment variable (default to info level).
    env_logger::init();

    // Collaborator ports; all in-memory in this deployment.
    let dictionary = Arc::new(load_dictionary());
    let store: Arc<dyn GameStore> = Arc::new(MemoryStore::new());
    let identity: Arc<dyn Identity> = Arc::new(MemoryIdentity::new());

    let services = RoomServices {
        store: store.clone(),
        identity: identity.clone(),
        validator: WordValidator::new(dictionary),
        scoring: ScoringSystem::new(),
        letters: LetterGenerator::new(),
    };

    // Start the session registry actor (per-player connection handles).
    let registry = SessionRegistry::new().start();

    // Start the room registry actor (owns all game rooms and the stale sweep).
    let rooms = RoomRegistry::new(registry.clone(), services, RoomConfig::default()).start();

    // Start the matchmaking server actor (per-mode queues and match ticks).
    let matchmaking =
        MatchmakingServer::new(registry.clone(), rooms.clone(), store, identity.clone()).start();

    // Shared application state for HTTP/WebSocket handlers.
    let state = web::Data::new(server::state::AppState::new(
        registry,
        matchmaking,
        rooms,
        identity,
    ));

    // Start the HTTP server with the WebSocket endpoint.
    HttpServer::new(move || {
        App::new()
            .wrap(
                actix_web::middleware::DefaultHeaders::new()
                    .add(("Access-Control-Allow-Origin", "*"))
                    .add(("Access-Control-Allow-Headers", "*")),
            )
            .app_data(state.clone())
            .configure(server::router::config)
    })
    .bind(("127.0.0.1", 8080))?
    .run()
    .await
}
