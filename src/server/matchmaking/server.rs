/// Matchmaking server actor.
///
/// Owns the per-mode FIFO queues, forms matches on every enqueue and on a
/// periodic tick, and hands matched groups to session creation and the room
/// registry. All queue mutation runs inside this actor, so pops and session
/// creation for a mode never race each other.
use actix::prelude::*;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};

use super::messages::{Dequeue, Enqueue, QueueSize};
use super::queues::MatchQueues;
use crate::config::matchmaking::{MATCH_TICK_SECS, WAIT_ESTIMATE_PER_POSITION_SECS};
use crate::game::types::{GameMode, PlayerProfile};
use crate::ports::{GameStore, Identity};
use crate::protocol::GameEvent;
use crate::server::registry::{SendTo, SendToMany, SessionRegistry};
use crate::server::room::registry::{CreateRoom, RoomRegistry};

pub struct MatchmakingServer {
    queues: MatchQueues,
    registry: Addr<SessionRegistry>,
    rooms: Addr<RoomRegistry>,
    store: Arc<dyn GameStore>,
    identity: Arc<dyn Identity>,
}

impl MatchmakingServer {
    pub fn new(
        registry: Addr<SessionRegistry>,
        rooms: Addr<RoomRegistry>,
        store: Arc<dyn GameStore>,
        identity: Arc<dyn Identity>,
    ) -> Self {
        Self {
            queues: MatchQueues::new(),
            registry,
            rooms,
            store,
            identity,
        }
    }

    /// Form as many matches as the mode's queue allows. A popped group whose
    /// session creation fails goes back to the front of the queue, in its
    /// original order, and is retried on a later tick.
    fn try_match(&mut self, mode: GameMode) {
        let required = mode.required_players();

        while self.queues.len(mode) >= required {
            let group = match self.queues.pop_group(mode, required) {
                Some(group) => group,
                None => break,
            };
            let player_ids: Vec<String> =
                group.iter().map(|r| r.player_id.clone()).collect();

            match self.store.create_session(&player_ids, mode) {
                Ok(session) => {
                    let longest_wait = group
                        .iter()
                        .map(|r| r.enqueued_at.elapsed())
                        .max()
                        .unwrap_or_default();
                    info!(
                        "[Matchmaking] Game {} created for {:?} in mode {:?} (longest wait {:?})",
                        session.id, player_ids, mode, longest_wait
                    );
                    let players: Vec<PlayerProfile> = player_ids
                        .iter()
                        .filter_map(|id| self.identity.profile(id))
                        .collect();
                    self.registry.do_send(SendToMany {
                        player_ids,
                        event: GameEvent::GameCreated {
                            game_id: session.id,
                            players,
                            game_mode: mode,
                        },
                    });
                    self.rooms.do_send(CreateRoom { session });
                }
                Err(e) => {
                    warn!(
                        "[Matchmaking] Session creation failed for {:?}, requeueing at front: {}",
                        player_ids, e
                    );
                    self.queues.requeue_front(mode, group);
                    break;
                }
            }
        }
    }
}

impl Actor for MatchmakingServer {
    type Context = Context<Self>;

    /// Starts the periodic match tick that retries modes whose last session
    /// creation failed and catches anything an enqueue-time check missed.
    fn started(&mut self, ctx: &mut Self::Context) {
        ctx.run_interval(Duration::from_secs(MATCH_TICK_SECS), |act, _ctx| {
            for mode in GameMode::all() {
                act.try_match(mode);
            }
        });
    }
}

impl Handler<Enqueue> for MatchmakingServer {
    type Result = ();

    /// Handles a player joining a queue: reports the position, then
    /// re-evaluates matching for that mode.
    fn handle(&mut self, msg: Enqueue, _ctx: &mut Self::Context) -> Self::Result {
        let position = self.queues.enqueue(&msg.player_id, msg.mode);
        debug!(
            "[Matchmaking] Player {} queued for {:?} at position {}",
            msg.player_id, msg.mode, position
        );

        self.registry.do_send(SendTo {
            player_id: msg.player_id.clone(),
            event: GameEvent::QueueJoined {
                player_id: msg.player_id,
                position,
                estimated_wait_time: position as u64 * WAIT_ESTIMATE_PER_POSITION_SECS,
            },
        });

        self.try_match(msg.mode);
    }
}

impl Handler<Dequeue> for MatchmakingServer {
    type Result = ();

    fn handle(&mut self, msg: Dequeue, _ctx: &mut Self::Context) -> Self::Result {
        if self.queues.remove(&msg.player_id) {
            debug!("[Matchmaking] Player {} left the queues", msg.player_id);
        }
    }
}

impl Handler<QueueSize> for MatchmakingServer {
    type Result = usize;

    fn handle(&mut self, msg: QueueSize, _ctx: &mut Self::Context) -> Self::Result {
        self.queues.len(msg.mode)
    }
}
