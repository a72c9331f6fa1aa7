//! Durations the timer runs with

use std::time::Duration;

pub const DEFAULT_SESSION_MS: i64 = 20 * 60 * 1000;
pub const DEFAULT_COOLDOWN_MS: i64 = 50 * 1000;
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerSettings {
    /// Full countdown restored whenever the timer goes idle
    pub session_ms: i64,
    /// Mandatory wait after the alarm is acknowledged
    pub cooldown_ms: i64,
    pub poll_interval: Duration,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            session_ms: DEFAULT_SESSION_MS,
            cooldown_ms: DEFAULT_COOLDOWN_MS,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}
