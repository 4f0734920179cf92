// src/protocol.rs

//! Wire protocol shared with clients.
//!
//! Every frame is a JSON envelope `{type, command?, event?}`. Clients send
//! `COMMAND` (and `PING`) frames; the server sends `EVENT` (and `PONG`)
//! frames. Commands and events are closed, internally-tagged enums so a
//! malformed or unknown frame fails at decode time instead of deep inside the
//! game logic.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::game::types::{GameMode, PlayerProfile, Round};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageType {
    Command,
    Event,
    Ping,
    Pong,
}

/// The envelope around every frame in both directions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireMessage {
    #[serde(rename = "type")]
    pub kind: MessageType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<GameCommand>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<GameEvent>,
}

impl WireMessage {
    pub fn event(event: GameEvent) -> Self {
        WireMessage {
            kind: MessageType::Event,
            command: None,
            event: Some(event),
        }
    }

    pub fn pong() -> Self {
        WireMessage {
            kind: MessageType::Pong,
            command: None,
            event: None,
        }
    }

    pub fn error(code: ErrorCode, message: &str) -> Self {
        WireMessage::event(GameEvent::Error {
            message: message.to_string(),
            code,
        })
    }
}

/// Commands sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum GameCommand {
    /// Join the matchmaking queue for a game mode.
    JoinQueue {
        player_id: String,
        #[serde(default)]
        game_mode: GameMode,
    },
    /// Leave every matchmaking queue.
    LeaveQueue { player_id: String },
    /// Submit a word during a round.
    SubmitWord {
        player_id: String,
        game_id: Uuid,
        round_id: Uuid,
        word: String,
    },
    /// Request to end the current round early.
    EndRound {
        player_id: String,
        game_id: Uuid,
        round_id: Uuid,
    },
    /// Send a chat message to the other players of a game.
    ChatMessage {
        player_id: String,
        game_id: Uuid,
        message: String,
    },
    /// Leave one game, or disconnect entirely when no game is given.
    LeaveGame {
        player_id: String,
        #[serde(default)]
        game_id: Option<Uuid>,
    },
}

impl GameCommand {
    /// The player id the sender claims; the dispatcher checks it against the
    /// authenticated session.
    pub fn player_id(&self) -> &str {
        match self {
            GameCommand::JoinQueue { player_id, .. }
            | GameCommand::LeaveQueue { player_id }
            | GameCommand::SubmitWord { player_id, .. }
            | GameCommand::EndRound { player_id, .. }
            | GameCommand::ChatMessage { player_id, .. }
            | GameCommand::LeaveGame { player_id, .. } => player_id,
        }
    }
}

/// Events sent from server to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum GameEvent {
    QueueJoined {
        player_id: String,
        position: usize,
        estimated_wait_time: u64,
    },
    GameCreated {
        game_id: Uuid,
        players: Vec<PlayerProfile>,
        game_mode: GameMode,
    },
    RoundStarted {
        game_id: Uuid,
        round: Round,
        time_limit: u64,
    },
    WordResult {
        player_id: String,
        game_id: Uuid,
        word: String,
        is_valid: bool,
        score: i32,
    },
    RoundEnded {
        game_id: Uuid,
        round_id: Uuid,
        results: HashMap<String, i32>,
        winning_word: String,
        winning_player_id: Option<String>,
    },
    GameEnded {
        game_id: Uuid,
        results: HashMap<String, i32>,
        winner_id: Option<String>,
        reason: String,
    },
    ChatReceived {
        player_id: String,
        username: String,
        message: String,
        timestamp: u64,
    },
    Error {
        message: String,
        code: ErrorCode,
    },
}

/// Stable error codes carried by `Error` events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidMessage,
    GameNotFound,
    NotAuthorized,
    SessionSuperseded,
    InternalError,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_envelope_round_trips() {
        let text = r#"{"type":"COMMAND","command":{"type":"JoinQueue","playerId":"p1","gameMode":"CLASSIC"}}"#;
        let msg: WireMessage = serde_json::from_str(text).unwrap();
        assert_eq!(msg.kind, MessageType::Command);
        match msg.command {
            Some(GameCommand::JoinQueue {
                ref player_id,
                game_mode,
            }) => {
                assert_eq!(player_id, "p1");
                assert_eq!(game_mode, GameMode::Classic);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn join_queue_mode_defaults_to_classic() {
        let text = r#"{"type":"COMMAND","command":{"type":"JoinQueue","playerId":"p1"}}"#;
        let msg: WireMessage = serde_json::from_str(text).unwrap();
        match msg.command {
            Some(GameCommand::JoinQueue { game_mode, .. }) => {
                assert_eq!(game_mode, GameMode::Classic)
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn events_serialize_with_camel_case_fields() {
        let event = GameEvent::QueueJoined {
            player_id: "p1".to_string(),
            position: 2,
            estimated_wait_time: 20,
        };
        let json = serde_json::to_string(&WireMessage::event(event)).unwrap();
        assert!(json.contains(r#""type":"EVENT""#));
        assert!(json.contains(r#""playerId":"p1""#));
        assert!(json.contains(r#""estimatedWaitTime":20"#));
        assert!(!json.contains("command"));
    }

    #[test]
    fn unknown_command_fails_to_decode() {
        let text = r#"{"type":"COMMAND","command":{"type":"Teleport","playerId":"p1"}}"#;
        assert!(serde_json::from_str::<WireMessage>(text).is_err());
    }

    #[test]
    fn error_codes_are_screaming_snake() {
        let json = serde_json::to_string(&ErrorCode::InvalidMessage).unwrap();
        assert_eq!(json, r#""INVALID_MESSAGE""#);
    }
}
