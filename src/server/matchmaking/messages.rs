use actix::prelude::*;

use crate::game::types::GameMode;

/// Message: player joins a mode's matchmaking queue.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Enqueue {
    pub player_id: String,
    pub mode: GameMode,
}

/// Message: player leaves every matchmaking queue.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Dequeue {
    pub player_id: String,
}

/// Message: current queue length for a mode.
#[derive(Message)]
#[rtype(result = "usize")]
pub struct QueueSize {
    pub mode: GameMode,
}
