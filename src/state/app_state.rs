//! Shared state for the HTTP adapter

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, warn};

use super::{ControlOutcome, ControlPress, TimerSnapshot};
use crate::{error::Error, tasks::Command};

/// State handed to the HTTP handlers
///
/// The controller itself lives on the driver task; handlers only talk to it
/// through the command channel and read the latest published snapshot.
#[derive(Debug)]
pub struct AppState {
    /// Commands for the driver task
    pub commands: mpsc::Sender<Command>,
    /// Latest snapshot published by the driver task
    pub snapshots: watch::Receiver<TimerSnapshot>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last accepted press
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl AppState {
    pub fn new(
        port: u16,
        host: String,
        commands: mpsc::Sender<Command>,
        snapshots: watch::Receiver<TimerSnapshot>,
    ) -> Self {
        Self {
            commands,
            snapshots,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
        }
    }

    /// Send a control press to the driver and wait for its outcome
    pub async fn press(&self, press: ControlPress) -> Result<ControlOutcome, Error> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.commands
            .send(Command::Press {
                press,
                reply: Some(reply_tx),
            })
            .await
            .map_err(|_| Error::DriverUnavailable)?;

        let outcome = reply_rx.await.map_err(|_| Error::DriverUnavailable)?;

        if outcome.accepted {
            if let Some(phase) = outcome.snapshot.phase {
                self.record_action(phase.as_str());
            }
        } else {
            debug!("Press {:?} had no effect", press);
        }

        Ok(outcome)
    }

    /// Latest snapshot published by the driver
    pub fn snapshot(&self) -> TimerSnapshot {
        self.snapshots.borrow().clone()
    }

    fn record_action(&self, action: &str) {
        match self.last_action.lock() {
            Ok(mut last_action) => *last_action = Some(action.to_string()),
            Err(e) => warn!("Failed to lock last action: {}", e),
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
