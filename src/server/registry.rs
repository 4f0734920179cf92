/// Session registry actor.
///
/// Tracks the one live connection handle per player id and fans events out to
/// them. Registering a new handle for an id supersedes the previous one; the
/// superseded session is told to close. Delivery is best-effort: a failure for
/// one recipient is logged and never affects the others.
use actix::prelude::*;
use std::collections::HashMap;
use uuid::Uuid;

use log::{info, warn};

use crate::protocol::GameEvent;

/// Message delivered to a registered session handle.
#[derive(Message, Clone, Debug)]
#[rtype(result = "()")]
pub enum SessionMessage {
    /// A game event to forward to the client.
    Event(GameEvent),
    /// The player id was re-registered from another connection; this session
    /// must close.
    Superseded { reason: String },
}

struct RegisteredSession {
    conn_id: Uuid,
    handle: Recipient<SessionMessage>,
}

#[derive(Default)]
pub struct SessionRegistry {
    sessions: HashMap<String, RegisteredSession>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        SessionRegistry::default()
    }

    fn deliver(&self, player_id: &str, event: GameEvent) {
        let Some(session) = self.sessions.get(player_id) else {
            return;
        };
        if let Err(e) = session.handle.try_send(SessionMessage::Event(event)) {
            warn!(
                "[SessionRegistry] Failed to deliver event to player {}: {}",
                player_id, e
            );
        }
    }
}

impl Actor for SessionRegistry {
    type Context = Context<Self>;
}

/// Message: register the connection handle for a player id.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Register {
    pub player_id: String,
    pub conn_id: Uuid,
    pub handle: Recipient<SessionMessage>,
}

/// Message: remove a player's handle, but only if it is still the one given.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Deregister {
    pub player_id: String,
    pub conn_id: Uuid,
}

/// Message: send an event to a single player.
#[derive(Message)]
#[rtype(result = "()")]
pub struct SendTo {
    pub player_id: String,
    pub event: GameEvent,
}

/// Message: send one event to several players independently.
#[derive(Message)]
#[rtype(result = "()")]
pub struct SendToMany {
    pub player_ids: Vec<String>,
    pub event: GameEvent,
}

impl Handler<Register> for SessionRegistry {
    type Result = ();

    /// Handles a new connection for a player. Last writer wins: any previous
    /// handle for the same id is told to close before being replaced.
    fn handle(&mut self, msg: Register, _ctx: &mut Self::Context) -> Self::Result {
        let replaced = self.sessions.insert(
            msg.player_id.clone(),
            RegisteredSession {
                conn_id: msg.conn_id,
                handle: msg.handle,
            },
        );

        if let Some(previous) = replaced {
            if previous.conn_id != msg.conn_id {
                info!(
                    "[SessionRegistry] Player {} reconnected, superseding old session",
                    msg.player_id
                );
                let _ = previous.handle.try_send(SessionMessage::Superseded {
                    reason: "Another connection was opened for this player".to_string(),
                });
            }
        } else {
            info!(
                "[SessionRegistry] Player {} connected. Active sessions: {}",
                msg.player_id,
                self.sessions.len()
            );
        }
    }
}

impl Handler<Deregister> for SessionRegistry {
    type Result = ();

    /// Handles a connection going away. A superseded session's cleanup must
    /// not evict its replacement, so the stored connection id has to match.
    fn handle(&mut self, msg: Deregister, _ctx: &mut Self::Context) -> Self::Result {
        let matches = self
            .sessions
            .get(&msg.player_id)
            .is_some_and(|s| s.conn_id == msg.conn_id);
        if matches {
            self.sessions.remove(&msg.player_id);
            info!(
                "[SessionRegistry] Player {} disconnected. Active sessions: {}",
                msg.player_id,
                self.sessions.len()
            );
        }
    }
}

impl Handler<SendTo> for SessionRegistry {
    type Result = ();

    fn handle(&mut self, msg: SendTo, _ctx: &mut Self::Context) -> Self::Result {
        self.deliver(&msg.player_id, msg.event);
    }
}

impl Handler<SendToMany> for SessionRegistry {
    type Result = ();

    fn handle(&mut self, msg: SendToMany, _ctx: &mut Self::Context) -> Self::Result {
        for player_id in &msg.player_ids {
            self.deliver(player_id, msg.event.clone());
        }
    }
}
