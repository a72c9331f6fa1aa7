//! Cooldown Timer - a countdown timer with an alarm and a mandatory cooldown
//!
//! A five-phase state machine (idle, running, paused, alarm, cooldown) driven
//! by a single control trigger and a polling countdown engine. The HTTP API
//! and the space bar act as the control trigger; display and audio are
//! collaborators called from the phase hooks.

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use error::Error;
pub use state::{AppState, Controller, Phase};
pub use utils::signals::shutdown_signal;
