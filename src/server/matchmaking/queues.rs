use std::collections::{HashMap, VecDeque};
use std::time::Instant;

use crate::game::types::GameMode;

/// A player waiting in a mode's queue.
#[derive(Debug, Clone)]
pub struct MatchRequest {
    pub player_id: String,
    pub mode: GameMode,
    pub enqueued_at: Instant,
}

/// Per-mode FIFO matchmaking queues.
///
/// All mutation happens from the owning matchmaking actor, so the structure
/// itself carries no locking. Each player id appears at most once per mode.
#[derive(Debug, Default)]
pub struct MatchQueues {
    queues: HashMap<GameMode, VecDeque<MatchRequest>>,
}

impl MatchQueues {
    pub fn new() -> Self {
        MatchQueues::default()
    }

    /// Add a player to a mode's queue. Re-adding an already queued id moves
    /// it to the back. Returns the 1-based position in the queue.
    pub fn enqueue(&mut self, player_id: &str, mode: GameMode) -> usize {
        let queue = self.queues.entry(mode).or_default();
        queue.retain(|r| r.player_id != player_id);
        queue.push_back(MatchRequest {
            player_id: player_id.to_string(),
            mode,
            enqueued_at: Instant::now(),
        });
        queue.len()
    }

    /// Remove a player from every mode's queue. Returns whether anything was
    /// removed.
    pub fn remove(&mut self, player_id: &str) -> bool {
        let mut removed = false;
        for queue in self.queues.values_mut() {
            let before = queue.len();
            queue.retain(|r| r.player_id != player_id);
            removed |= queue.len() != before;
        }
        removed
    }

    /// Pop exactly `count` requests from the front of a mode's queue, in FIFO
    /// order, or nothing when the queue is shorter than `count`.
    pub fn pop_group(&mut self, mode: GameMode, count: usize) -> Option<Vec<MatchRequest>> {
        let queue = self.queues.get_mut(&mode)?;
        if queue.len() < count {
            return None;
        }
        Some(queue.drain(..count).collect())
    }

    /// Put a popped group back at the front of its mode's queue, preserving
    /// the group's relative order, ahead of anyone enqueued since.
    pub fn requeue_front(&mut self, mode: GameMode, group: Vec<MatchRequest>) {
        debug_assert!(group.iter().all(|r| r.mode == mode));
        let queue = self.queues.entry(mode).or_default();
        for request in group.into_iter().rev() {
            queue.push_front(request);
        }
    }

    pub fn len(&self, mode: GameMode) -> usize {
        self.queues.get(&mode).map_or(0, VecDeque::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(queues: &MatchQueues, mode: GameMode) -> Vec<String> {
        queues
            .queues
            .get(&mode)
            .map(|q| q.iter().map(|r| r.player_id.clone()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn position_is_one_plus_players_ahead() {
        let mut queues = MatchQueues::new();
        assert_eq!(queues.enqueue("p1", GameMode::Classic), 1);
        assert_eq!(queues.enqueue("p2", GameMode::Classic), 2);
        assert_eq!(queues.enqueue("p3", GameMode::Classic), 3);
    }

    #[test]
    fn re_enqueue_moves_to_back_without_duplicating() {
        let mut queues = MatchQueues::new();
        queues.enqueue("p1", GameMode::Classic);
        queues.enqueue("p2", GameMode::Classic);
        assert_eq!(queues.enqueue("p1", GameMode::Classic), 2);
        assert_eq!(queues.len(GameMode::Classic), 2);
        assert_eq!(ids(&queues, GameMode::Classic), vec!["p2", "p1"]);
    }

    #[test]
    fn queues_are_independent_per_mode() {
        let mut queues = MatchQueues::new();
        queues.enqueue("p1", GameMode::Classic);
        assert_eq!(queues.enqueue("p1", GameMode::TimeAttack), 1);
        assert_eq!(queues.len(GameMode::Classic), 1);
        assert_eq!(queues.len(GameMode::TimeAttack), 1);
    }

    #[test]
    fn remove_clears_every_mode() {
        let mut queues = MatchQueues::new();
        queues.enqueue("p1", GameMode::Classic);
        queues.enqueue("p1", GameMode::TimeAttack);
        assert!(queues.remove("p1"));
        assert!(!queues.remove("p1"));
        assert_eq!(queues.len(GameMode::Classic), 0);
        assert_eq!(queues.len(GameMode::TimeAttack), 0);
    }

    #[test]
    fn pop_group_is_fifo_and_all_or_nothing() {
        let mut queues = MatchQueues::new();
        queues.enqueue("p1", GameMode::Classic);
        assert!(queues.pop_group(GameMode::Classic, 2).is_none());
        assert_eq!(queues.len(GameMode::Classic), 1);

        queues.enqueue("p2", GameMode::Classic);
        queues.enqueue("p3", GameMode::Classic);
        let group = queues.pop_group(GameMode::Classic, 2).unwrap();
        let popped: Vec<&str> = group.iter().map(|r| r.player_id.as_str()).collect();
        assert_eq!(popped, vec!["p1", "p2"]);
        assert_eq!(ids(&queues, GameMode::Classic), vec!["p3"]);
    }

    #[test]
    fn requeue_front_restores_order_ahead_of_later_arrivals() {
        let mut queues = MatchQueues::new();
        queues.enqueue("p1", GameMode::Classic);
        queues.enqueue("p2", GameMode::Classic);
        let group = queues.pop_group(GameMode::Classic, 2).unwrap();

        queues.enqueue("p3", GameMode::Classic);
        queues.requeue_front(GameMode::Classic, group);

        assert_eq!(ids(&queues, GameMode::Classic), vec!["p1", "p2", "p3"]);
    }
}
