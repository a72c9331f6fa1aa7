//! Configuration and CLI argument handling

use std::time::Duration;

use clap::Parser;
use tracing::warn;

use crate::{error::Error, state::TimerSettings};

/// Poll intervals above this make the display visibly stutter
const SMOOTH_POLL_LIMIT_MS: u64 = 150;
const MAX_POLL_INTERVAL_MS: u64 = 1_000;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "cooldown-timer")]
#[command(about = "A countdown timer with an alarm and a mandatory cooldown")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Countdown duration in minutes
    #[arg(short, long, default_value = "20")]
    pub timer: u64,

    /// Cooldown duration in seconds
    #[arg(short, long, default_value = "50")]
    pub cooldown: u64,

    /// Poll interval in milliseconds
    #[arg(long, default_value = "100")]
    pub poll_interval: u64,

    /// Space presses closer together than this many milliseconds count as a
    /// held key, on terminals that cannot report key repeats
    #[arg(long, default_value = "50")]
    pub repeat_window: u64,

    /// Do not read control key presses from the terminal
    #[arg(long)]
    pub no_keyboard: bool,

    /// Draw the countdown on stderr
    #[arg(long)]
    pub render: bool,

    /// Ring the terminal bell for the alarm and cooldown cues
    #[arg(long)]
    pub bell: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn repeat_window(&self) -> Duration {
        Duration::from_millis(self.repeat_window)
    }

    /// Validate durations and build the timer settings
    pub fn settings(&self) -> Result<TimerSettings, Error> {
        if self.timer == 0 {
            return Err(Error::InvalidConfig("timer must be at least 1 minute".to_string()));
        }
        if self.cooldown == 0 {
            return Err(Error::InvalidConfig("cooldown must be at least 1 second".to_string()));
        }
        if self.poll_interval == 0 || self.poll_interval > MAX_POLL_INTERVAL_MS {
            return Err(Error::InvalidConfig(format!(
                "poll interval must be between 1 and {}ms, got {}ms",
                MAX_POLL_INTERVAL_MS, self.poll_interval
            )));
        }
        if self.poll_interval > SMOOTH_POLL_LIMIT_MS {
            warn!(
                "Poll interval of {}ms is above {}ms, the display will update unevenly",
                self.poll_interval, SMOOTH_POLL_LIMIT_MS
            );
        }

        let session_ms = i64::try_from(self.timer.saturating_mul(60_000))
            .map_err(|_| Error::InvalidConfig(format!("timer of {} minutes is too long", self.timer)))?;
        let cooldown_ms = i64::try_from(self.cooldown.saturating_mul(1_000))
            .map_err(|_| Error::InvalidConfig(format!("cooldown of {} seconds is too long", self.cooldown)))?;

        Ok(TimerSettings {
            session_ms,
            cooldown_ms,
            poll_interval: Duration::from_millis(self.poll_interval),
        })
    }
}
