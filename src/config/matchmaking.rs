/// Matchmaking configuration constants.
///
/// This module defines parameters for the matchmaking queues, such as the
/// periodic match tick and the wait-time estimate reported to clients.
pub const MATCH_TICK_SECS: u64 = 5; // Interval between periodic match checks (in seconds).

/// Rough wait-time estimate (in seconds) per queue position, reported in
/// `QueueJoined` events.
pub const WAIT_ESTIMATE_PER_POSITION_SECS: u64 = 10;
