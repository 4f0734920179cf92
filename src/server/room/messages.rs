use actix::prelude::*;
use uuid::Uuid;

/// Message: a player submits a word for the current round.
#[derive(Message)]
#[rtype(result = "SubmissionOutcome")]
pub struct SubmitWord {
    pub player_id: String,
    pub round_id: Uuid,
    pub word: String,
}

/// Result of a submission attempt. `success` is false for anything the room
/// rejected before validation (closed round, duplicate, persistence failure).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionOutcome {
    pub success: bool,
    pub is_valid: bool,
    pub score: i32,
}

impl SubmissionOutcome {
    pub fn rejected() -> Self {
        SubmissionOutcome {
            success: false,
            is_valid: false,
            score: 0,
        }
    }
}

/// Message: a player asks to end the current round early.
#[derive(Message)]
#[rtype(result = "()")]
pub struct EndRoundRequest {
    pub player_id: String,
    pub round_id: Uuid,
}

/// Message: a chat line for the room's participants.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Chat {
    pub player_id: String,
    pub message: String,
}

/// Message: a participant's connection is gone (or they left the game).
#[derive(Message)]
#[rtype(result = "()")]
pub struct PlayerDisconnected {
    pub player_id: String,
}

/// Message: close the room if it has been inactive past its threshold.
#[derive(Message)]
#[rtype(result = "()")]
pub struct CheckStale;

/// Message: force the room closed with the given reason.
#[derive(Message)]
#[rtype(result = "()")]
pub struct CloseRoom {
    pub reason: String,
}
