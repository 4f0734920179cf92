/// Matchmaking module: per-mode FIFO queues and match formation.

pub mod messages;
pub mod queues;
pub mod server;
