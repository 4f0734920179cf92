// src/server/state.rs

//! Application state for the backend server.
//!
//! Holds the addresses of the core actors plus the identity port, and is
//! injected into the HTTP/WebSocket handlers. Built once by the composition
//! root so tests can assemble their own, independent instances.

use actix::Addr;
use std::sync::Arc;

use crate::ports::Identity;
use crate::server::matchmaking::server::MatchmakingServer;
use crate::server::registry::SessionRegistry;
use crate::server::room::registry::RoomRegistry;

/// Shared application state, injected into HTTP/WebSocket handlers.
pub struct AppState {
    /// Address of the session registry actor (per-player connection handles).
    pub registry: Addr<SessionRegistry>,
    /// Address of the matchmaking server actor (per-mode queues).
    pub matchmaking: Addr<MatchmakingServer>,
    /// Address of the room registry actor (live game rooms).
    pub rooms: Addr<RoomRegistry>,
    /// Identity port used to verify player ids at connect time.
    pub identity: Arc<dyn Identity>,
}

impl AppState {
    pub fn new(
        registry: Addr<SessionRegistry>,
        matchmaking: Addr<MatchmakingServer>,
        rooms: Addr<RoomRegistry>,
        identity: Arc<dyn Identity>,
    ) -> Self {
        AppState {
            registry,
            matchmaking,
            rooms,
            identity,
        }
    }
}
