/// Room registry actor.
///
/// Owns every live game room: creation from a persisted session, command
/// forwarding, disconnect fan-out, the periodic stale-room sweep, and
/// shutdown. Rooms report back when they close so the table never holds a
/// dead address for long.
use actix::prelude::*;
use std::collections::HashMap;
use uuid::Uuid;

use actix::MessageResult;
use log::{debug, info, warn};

use super::messages::{Chat, CheckStale, CloseRoom, EndRoundRequest, PlayerDisconnected,
    SubmitWord};
use super::room::GameRoom;
use super::{RoomConfig, RoomServices};
use crate::game::types::GameSession;
use crate::protocol::{ErrorCode, GameEvent};
use crate::server::registry::{SendTo, SessionRegistry};

struct RoomEntry {
    addr: Addr<GameRoom>,
    players: Vec<String>,
}

pub struct RoomRegistry {
    rooms: HashMap<Uuid, RoomEntry>,
    registry: Addr<SessionRegistry>,
    services: RoomServices,
    config: RoomConfig,
}

impl RoomRegistry {
    pub fn new(
        registry: Addr<SessionRegistry>,
        services: RoomServices,
        config: RoomConfig,
    ) -> Self {
        Self {
            rooms: HashMap::new(),
            registry,
            services,
            config,
        }
    }
}

impl Actor for RoomRegistry {
    type Context = Context<Self>;

    /// Starts the background sweep that reclaims inactive rooms.
    fn started(&mut self, ctx: &mut Self::Context) {
        ctx.run_interval(self.config.sweep_interval, |act, _ctx| {
            debug!("[RoomRegistry] Sweeping {} rooms", act.rooms.len());
            for entry in act.rooms.values() {
                entry.addr.do_send(CheckStale);
            }
        });
    }
}

/// Message: create a room for a freshly persisted game session.
#[derive(Message)]
#[rtype(result = "()")]
pub struct CreateRoom {
    pub session: GameSession,
}

/// Message: a room finished and can be dropped from the table.
#[derive(Message)]
#[rtype(result = "()")]
pub struct RoomClosed {
    pub game_id: Uuid,
}

/// Message: a player's connection ended; tell every room they were in.
#[derive(Message)]
#[rtype(result = "()")]
pub struct ConnectionLost {
    pub player_id: String,
}

/// Message: a client command aimed at one room.
#[derive(Message)]
#[rtype(result = "()")]
pub struct RoomCommand {
    pub game_id: Uuid,
    pub player_id: String,
    pub action: RoomAction,
}

pub enum RoomAction {
    Submit { round_id: Uuid, word: String },
    EndRound { round_id: Uuid },
    Chat { message: String },
    Leave,
}

/// Message: look up a room's address.
#[derive(Message)]
#[rtype(result = "Option<Addr<GameRoom>>")]
pub struct GetRoom {
    pub game_id: Uuid,
}

/// Message: force every live room closed.
#[derive(Message)]
#[rtype(result = "()")]
pub struct ShutdownRooms {
    pub reason: String,
}

impl Handler<CreateRoom> for RoomRegistry {
    type Result = ();

    fn handle(&mut self, msg: CreateRoom, ctx: &mut Self::Context) -> Self::Result {
        let game_id = msg.session.id;
        if self.rooms.contains_key(&game_id) {
            warn!("[RoomRegistry] Room for game {} already exists", game_id);
            return;
        }

        let players = msg.session.players.clone();
        let room = GameRoom::new(
            &msg.session,
            self.config,
            self.services.clone(),
            self.registry.clone(),
            ctx.address(),
        )
        .start();

        self.rooms.insert(
            game_id,
            RoomEntry {
                addr: room,
                players,
            },
        );
        info!(
            "[RoomRegistry] Created room for game {} ({} active rooms)",
            game_id,
            self.rooms.len()
        );
    }
}

impl Handler<RoomClosed> for RoomRegistry {
    type Result = ();

    fn handle(&mut self, msg: RoomClosed, _ctx: &mut Self::Context) -> Self::Result {
        if self.rooms.remove(&msg.game_id).is_some() {
            info!(
                "[RoomRegistry] Room for game {} removed ({} active rooms)",
                msg.game_id,
                self.rooms.len()
            );
        }
    }
}

impl Handler<ConnectionLost> for RoomRegistry {
    type Result = ();

    fn handle(&mut self, msg: ConnectionLost, _ctx: &mut Self::Context) -> Self::Result {
        for entry in self
            .rooms
            .values()
            .filter(|e| e.players.contains(&msg.player_id))
        {
            entry.addr.do_send(PlayerDisconnected {
                player_id: msg.player_id.clone(),
            });
        }
    }
}

impl Handler<RoomCommand> for RoomRegistry {
    type Result = ();

    /// Routes a client command to its room, or reports `GAME_NOT_FOUND` back
    /// to the sender.
    fn handle(&mut self, msg: RoomCommand, _ctx: &mut Self::Context) -> Self::Result {
        let Some(entry) = self.rooms.get(&msg.game_id) else {
            self.registry.do_send(SendTo {
                player_id: msg.player_id,
                event: GameEvent::Error {
                    message: "Game not found".to_string(),
                    code: ErrorCode::GameNotFound,
                },
            });
            return;
        };

        match msg.action {
            RoomAction::Submit { round_id, word } => entry.addr.do_send(SubmitWord {
                player_id: msg.player_id,
                round_id,
                word,
            }),
            RoomAction::EndRound { round_id } => entry.addr.do_send(EndRoundRequest {
                player_id: msg.player_id,
                round_id,
            }),
            RoomAction::Chat { message } => entry.addr.do_send(Chat {
                player_id: msg.player_id,
                message,
            }),
            RoomAction::Leave => entry.addr.do_send(PlayerDisconnected {
                player_id: msg.player_id,
            }),
        }
    }
}

impl Handler<GetRoom> for RoomRegistry {
    type Result = MessageResult<GetRoom>;

    fn handle(&mut self, msg: GetRoom, _ctx: &mut Self::Context) -> Self::Result {
        MessageResult(self.rooms.get(&msg.game_id).map(|e| e.addr.clone()))
    }
}

impl Handler<ShutdownRooms> for RoomRegistry {
    type Result = ();

    fn handle(&mut self, msg: ShutdownRooms, _ctx: &mut Self::Context) -> Self::Result {
        info!(
            "[RoomRegistry] Shutting down {} active rooms: {}",
            self.rooms.len(),
            msg.reason
        );
        for entry in self.rooms.values() {
            entry.addr.do_send(CloseRoom {
                reason: msg.reason.clone(),
            });
        }
    }
}
