//! Timer phases and their transition tables
//!
//! ```text
//!          control             control
//!  Idle ─────────► Running ◄─────────► Paused
//!   ▲                 │ expiry
//!   │                 ▼
//!   │ expiry        Alarm
//!   │                 │ control
//!   │                 ▼
//!   └──────────── Cooldown
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Running,
    Paused,
    Alarm,
    Cooldown,
}

/// Styling tag shown on the display while a phase is current
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Marker {
    Pause,
    Alarm,
}

impl Phase {
    pub const ALL: [Phase; 5] = [
        Phase::Idle,
        Phase::Running,
        Phase::Paused,
        Phase::Alarm,
        Phase::Cooldown,
    ];

    /// Action offered to the user while in this phase
    pub fn label(self) -> &'static str {
        match self {
            Phase::Idle => "Start",
            Phase::Running => "Pause",
            Phase::Paused => "Continue",
            Phase::Alarm => "Snooze",
            Phase::Cooldown => "Come back soon!",
        }
    }

    pub fn marker(self) -> Option<Marker> {
        match self {
            Phase::Paused => Some(Marker::Pause),
            Phase::Alarm => Some(Marker::Alarm),
            _ => None,
        }
    }

    /// Next phase for the control trigger
    ///
    /// Cooldown cannot be skipped, so it maps to itself.
    pub fn on_control(self) -> Phase {
        match self {
            Phase::Idle => Phase::Running,
            Phase::Running => Phase::Paused,
            Phase::Paused => Phase::Running,
            Phase::Alarm => Phase::Cooldown,
            Phase::Cooldown => Phase::Cooldown,
        }
    }

    /// Next phase when the countdown runs out
    pub fn on_expiry(self) -> Phase {
        match self {
            Phase::Cooldown => Phase::Idle,
            _ => Phase::Alarm,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Running => "running",
            Phase::Paused => "paused",
            Phase::Alarm => "alarm",
            Phase::Cooldown => "cooldown",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Marker {
    pub fn as_str(self) -> &'static str {
        match self {
            Marker::Pause => "pause",
            Marker::Alarm => "alarm",
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_table() {
        assert_eq!(Phase::Idle.on_control(), Phase::Running);
        assert_eq!(Phase::Running.on_control(), Phase::Paused);
        assert_eq!(Phase::Paused.on_control(), Phase::Running);
        assert_eq!(Phase::Alarm.on_control(), Phase::Cooldown);
        assert_eq!(Phase::Cooldown.on_control(), Phase::Cooldown);
    }

    #[test]
    fn expiry_leads_to_alarm_except_from_cooldown() {
        assert_eq!(Phase::Running.on_expiry(), Phase::Alarm);
        assert_eq!(Phase::Cooldown.on_expiry(), Phase::Idle);
    }

    #[test]
    fn every_phase_has_a_label() {
        for phase in Phase::ALL {
            assert!(!phase.label().is_empty());
        }
        assert_eq!(Phase::Alarm.marker(), Some(Marker::Alarm));
        assert_eq!(Phase::Running.marker(), None);
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&Phase::Cooldown).expect("serialize");
        assert_eq!(json, "\"cooldown\"");
        assert_eq!(Phase::Paused.to_string(), "paused");
    }
}
