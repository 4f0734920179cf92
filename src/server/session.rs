/// WebSocket session actor: one per player connection.
///
/// This actor is the protocol dispatcher. It decodes inbound envelopes into
/// commands and routes them with `do_send`, so the connection task never
/// blocks on game logic. A malformed frame earns an `Error` event and the
/// connection stays open. When the connection ends, by any cause, `stopped`
/// runs exactly one cleanup: leave matchmaking, notify the room layer, and
/// deregister the session.
use actix::prelude::*;
use actix_web::{Error, HttpRequest, HttpResponse, web};
use actix_web_actors::ws;
use std::borrow::Cow;
use std::sync::Arc;
use uuid::Uuid;

use log::{info, warn};

use crate::ports::Identity;
use crate::protocol::{ErrorCode, GameCommand, MessageType, WireMessage};
use crate::server::matchmaking::messages::{Dequeue, Enqueue};
use crate::server::matchmaking::server::MatchmakingServer;
use crate::server::registry::{Deregister, Register, SessionMessage, SessionRegistry};
use crate::server::room::registry::{ConnectionLost, RoomAction, RoomCommand, RoomRegistry};
use crate::server::state::AppState;

pub struct PlayerSession {
    player_id: String,
    claimed_username: Option<String>,
    conn_id: Uuid,
    registered: bool,
    superseded: bool,
    registry: Addr<SessionRegistry>,
    matchmaking: Addr<MatchmakingServer>,
    rooms: Addr<RoomRegistry>,
    identity: Arc<dyn Identity>,
}

impl PlayerSession {
    fn new(player_id: String, claimed_username: Option<String>, state: &AppState) -> Self {
        PlayerSession {
            player_id,
            claimed_username,
            conn_id: Uuid::new_v4(),
            registered: false,
            superseded: false,
            registry: state.registry.clone(),
            matchmaking: state.matchmaking.clone(),
            rooms: state.rooms.clone(),
            identity: state.identity.clone(),
        }
    }

    fn send_frame(&self, ctx: &mut ws::WebsocketContext<Self>, frame: WireMessage) {
        match serde_json::to_string(&frame) {
            Ok(text) => ctx.text(text),
            Err(e) => {
                warn!(
                    "[Session] Failed to serialize frame for player {}: {}",
                    self.player_id, e
                );
                let fallback =
                    WireMessage::error(ErrorCode::InternalError, "Internal server error");
                if let Ok(text) = serde_json::to_string(&fallback) {
                    ctx.text(text);
                }
            }
        }
    }

    fn send_error(&self, ctx: &mut ws::WebsocketContext<Self>, code: ErrorCode, message: &str) {
        self.send_frame(ctx, WireMessage::error(code, message));
    }

    fn handle_command(&mut self, command: GameCommand, ctx: &mut ws::WebsocketContext<Self>) {
        if command.player_id() != self.player_id {
            warn!(
                "[Session] Player {} sent a command for {}",
                self.player_id,
                command.player_id()
            );
            self.send_error(
                ctx,
                ErrorCode::NotAuthorized,
                "Command player id does not match this session",
            );
            return;
        }

        match command {
            GameCommand::JoinQueue { game_mode, .. } => self.matchmaking.do_send(Enqueue {
                player_id: self.player_id.clone(),
                mode: game_mode,
            }),
            GameCommand::LeaveQueue { .. } => self.matchmaking.do_send(Dequeue {
                player_id: self.player_id.clone(),
            }),
            GameCommand::SubmitWord {
                game_id,
                round_id,
                word,
                ..
            } => self.rooms.do_send(RoomCommand {
                game_id,
                player_id: self.player_id.clone(),
                action: RoomAction::Submit { round_id, word },
            }),
            GameCommand::EndRound {
                game_id, round_id, ..
            } => self.rooms.do_send(RoomCommand {
                game_id,
                player_id: self.player_id.clone(),
                action: RoomAction::EndRound { round_id },
            }),
            GameCommand::ChatMessage {
                game_id, message, ..
            } => self.rooms.do_send(RoomCommand {
                game_id,
                player_id: self.player_id.clone(),
                action: RoomAction::Chat { message },
            }),
            GameCommand::LeaveGame {
                game_id: Some(game_id),
                ..
            } => self.rooms.do_send(RoomCommand {
                game_id,
                player_id: self.player_id.clone(),
                action: RoomAction::Leave,
            }),
            GameCommand::LeaveGame { game_id: None, .. } => {
                info!("[Session] Player {} requested disconnect", self.player_id);
                ctx.close(None);
                ctx.stop();
            }
        }
    }
}

impl Actor for PlayerSession {
    type Context = ws::WebsocketContext<Self>;

    /// Called when the connection is established. Verifies the player id
    /// through the identity port and registers the session; an unverified id
    /// is closed with a policy violation before any command is processed.
    fn started(&mut self, ctx: &mut Self::Context) {
        let profile = match &self.claimed_username {
            Some(username) => Some(self.identity.register(&self.player_id, username)),
            None => self.identity.profile(&self.player_id),
        };

        match profile {
            Some(profile) => {
                self.registered = true;
                self.registry.do_send(Register {
                    player_id: self.player_id.clone(),
                    conn_id: self.conn_id,
                    handle: ctx.address().recipient(),
                });
                info!(
                    "[Session] Player {} ({}) connected",
                    profile.username, self.player_id
                );
            }
            None => {
                warn!(
                    "[Session] Rejected connection for unknown player id {}",
                    self.player_id
                );
                ctx.close(Some(ws::CloseReason {
                    code: ws::CloseCode::Policy,
                    description: Some("Unknown player id".into()),
                }));
                ctx.stop();
            }
        }
    }

    /// Called once when the connection ends, whatever the cause. A session
    /// that was superseded by a newer connection must not tear down the
    /// player's queue entries or games.
    fn stopped(&mut self, _ctx: &mut Self::Context) {
        if !self.registered {
            return;
        }
        if !self.superseded {
            self.matchmaking.do_send(Dequeue {
                player_id: self.player_id.clone(),
            });
            self.rooms.do_send(ConnectionLost {
                player_id: self.player_id.clone(),
            });
        }
        self.registry.do_send(Deregister {
            player_id: self.player_id.clone(),
            conn_id: self.conn_id,
        });
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for PlayerSession {
    /// Handles incoming WebSocket frames from the client.
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Text(text)) => match serde_json::from_str::<WireMessage>(&text) {
                Ok(frame) => match frame.kind {
                    MessageType::Command => match frame.command {
                        Some(command) => self.handle_command(command, ctx),
                        None => self.send_error(
                            ctx,
                            ErrorCode::InvalidMessage,
                            "Missing command payload",
                        ),
                    },
                    MessageType::Ping => self.send_frame(ctx, WireMessage::pong()),
                    MessageType::Pong => {}
                    MessageType::Event => self.send_error(
                        ctx,
                        ErrorCode::InvalidMessage,
                        "Clients cannot send events",
                    ),
                },
                Err(e) => {
                    warn!(
                        "[Session] Invalid frame from player {}: {}",
                        self.player_id, e
                    );
                    self.send_error(ctx, ErrorCode::InvalidMessage, "Invalid message format");
                }
            },
            Ok(ws::Message::Ping(payload)) => ctx.pong(&payload),
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Err(e) => {
                warn!(
                    "[Session] Transport error for player {}: {}",
                    self.player_id, e
                );
                ctx.stop();
            }
            _ => (),
        }
    }
}

impl Handler<SessionMessage> for PlayerSession {
    type Result = ();

    /// Handles messages from the registry: outbound events, or the notice
    /// that a newer connection took over this player id.
    fn handle(&mut self, msg: SessionMessage, ctx: &mut Self::Context) -> Self::Result {
        match msg {
            SessionMessage::Event(event) => self.send_frame(ctx, WireMessage::event(event)),
            SessionMessage::Superseded { reason } => {
                self.superseded = true;
                self.send_frame(ctx, WireMessage::error(ErrorCode::SessionSuperseded, &reason));
                ctx.close(Some(ws::CloseReason {
                    code: ws::CloseCode::Policy,
                    description: Some(reason),
                }));
                ctx.stop();
            }
        }
    }
}

/// WebSocket endpoint for players.
///
/// Expects query parameters: `player_id` (required) and `username`
/// (optional). A connection without a player id is rejected before the
/// upgrade; an id the identity port does not recognize is closed with a
/// policy violation right after it.
pub async fn ws_connect(
    req: HttpRequest,
    stream: web::Payload,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let mut player_id: Option<String> = None;
    let mut username: Option<String> = None;

    for kv in req.query_string().split('&') {
        let mut split = kv.split('=');
        match (split.next(), split.next()) {
            (Some("player_id"), Some(id)) => {
                player_id = Some(
                    urlencoding::decode(id)
                        .unwrap_or_else(|_| Cow::Borrowed(""))
                        .into_owned(),
                );
            }
            (Some("username"), Some(name)) => {
                let decoded = urlencoding::decode(name)
                    .unwrap_or_else(|_| Cow::Borrowed(""))
                    .into_owned();
                if !decoded.is_empty() {
                    username = Some(decoded);
                }
            }
            _ => {}
        }
    }

    let player_id = match player_id {
        Some(id) if !id.is_empty() => id,
        _ => {
            return Ok(HttpResponse::BadRequest().body("Missing player id"));
        }
    };

    ws::start(
        PlayerSession::new(player_id, username, &data),
        &req,
        stream,
    )
}
