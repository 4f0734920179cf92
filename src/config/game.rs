/// Game configuration constants.
///
/// This module defines the main gameplay parameters such as round duration,
/// round count, and letter pool size.
pub const ROUND_DURATION_SECS: u64 = 60; // Duration of a round in seconds.

/// Break (in seconds) between the end of a round and the start of the next one.
pub const ROUND_BREAK_SECS: u64 = 5;

/// Delay (in seconds) between game creation and the first round, so players
/// can see who they were matched with.
pub const GAME_START_DELAY_SECS: u64 = 5;

/// Number of rounds in a game.
pub const MAX_ROUNDS: u32 = 5;

/// Number of letters generated for each round's pool.
pub const LETTERS_PER_ROUND: usize = 8;

/// Minimum length of an acceptable word.
pub const MIN_WORD_LENGTH: usize = 3;

/// Time (in seconds) of inactivity after which a room is considered stale.
pub const ROOM_STALE_AFTER_SECS: u64 = 2 * 60 * 60;

/// Interval (in seconds) between background sweeps for stale rooms.
pub const ROOM_SWEEP_INTERVAL_SECS: u64 = 5 * 60;
