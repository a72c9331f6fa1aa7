//! Observable timer state for readers outside the driver task

use serde::{Deserialize, Serialize};

use super::{Marker, Phase};

/// Point-in-time view of the timer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    /// `None` until the controller has booted
    pub phase: Option<Phase>,
    pub remaining_ms: i64,
    pub display: String,
    pub label: Option<String>,
    pub marker: Option<Marker>,
    pub control_enabled: bool,
    pub alarm_playing: bool,
    pub cooldown_playing: bool,
    pub polling: bool,
}

impl TimerSnapshot {
    /// Snapshot of a controller that has not booted yet
    pub fn new() -> Self {
        Self {
            phase: None,
            remaining_ms: 0,
            display: "0:00".to_string(),
            label: None,
            marker: None,
            control_enabled: true,
            alarm_playing: false,
            cooldown_playing: false,
            polling: false,
        }
    }
}

impl Default for TimerSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of handing a control press to the controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlOutcome {
    /// Whether the press caused a transition
    pub accepted: bool,
    pub snapshot: TimerSnapshot,
}
