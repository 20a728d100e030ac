//! Game configuration constants.
//!
//! This module defines the main gameplay parameters such as tick interval,
//! settle delay after a correct answer, and the starting clock of each player.

use std::time::Duration;

pub const TICK_INTERVAL_MS: u64 = 1000; // One countdown step per second.

/// Pause after a confirmed answer, during which the answer is revealed and no speech is processed.
pub const SETTLE_DELAY_MS: u64 = 1000;

/// Starting clock of the first player, in seconds.
pub const PLAYER_ONE_START_SECS: u32 = 15;

/// Starting clock of the second player, in seconds.
/// Larger than the first player's clock by default (handicap).
pub const PLAYER_TWO_START_SECS: u32 = 45;

pub const PLAYER_ONE_DEFAULT_NAME: &str = "Player 1";
pub const PLAYER_TWO_DEFAULT_NAME: &str = "Player 2";

/// Below this many seconds a clock is shown as a warning.
pub const TIMER_WARNING_SECS: u32 = 30;

/// Below this many seconds a clock is shown as critical.
pub const TIMER_CRITICAL_SECS: u32 = 15;

/// A session with no clients and no game in progress is closed after this long.
pub const UNJOINED_SESSION_TIMEOUT_SECS: u64 = 300;

/// Per-session settings. Defaults come from the constants above.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub player_names: [String; 2],
    pub start_secs: [u32; 2],
    pub tick_interval: Duration,
    pub settle_delay: Duration,
    pub shuffle_prompts: bool,
    pub unjoined_timeout: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player_names: [
                PLAYER_ONE_DEFAULT_NAME.to_string(),
                PLAYER_TWO_DEFAULT_NAME.to_string(),
            ],
            start_secs: [PLAYER_ONE_START_SECS, PLAYER_TWO_START_SECS],
            tick_interval: Duration::from_millis(TICK_INTERVAL_MS),
            settle_delay: Duration::from_millis(SETTLE_DELAY_MS),
            shuffle_prompts: false,
            unjoined_timeout: Duration::from_secs(UNJOINED_SESSION_TIMEOUT_SECS),
        }
    }
}
