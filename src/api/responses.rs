//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{ControlOutcome, ControlPress, InputSource, TimerSnapshot};

/// Optional body of POST /control
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ControlRequest {
    #[serde(default)]
    pub source: InputSource,
    /// Set by clients forwarding auto-repeated key events
    #[serde(default)]
    pub repeat: bool,
}

impl From<ControlRequest> for ControlPress {
    fn from(request: ControlRequest) -> Self {
        Self {
            source: request.source,
            repeat: request.repeat,
        }
    }
}

/// Response of POST /control
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlResponse {
    pub accepted: bool,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub snapshot: TimerSnapshot,
}

impl From<ControlOutcome> for ControlResponse {
    fn from(outcome: ControlOutcome) -> Self {
        let message = match (outcome.accepted, outcome.snapshot.phase) {
            (true, Some(phase)) => format!("Timer is now {}", phase),
            (false, Some(phase)) => format!("Control ignored while {}", phase),
            (_, None) => "Timer has not started".to_string(),
        };
        Self {
            accepted: outcome.accepted,
            message,
            timestamp: Utc::now(),
            snapshot: outcome.snapshot,
        }
    }
}

/// Status response with server metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerSnapshot,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
