//! State management module
//!
//! Phases, the controller that moves between them, and the shared state the
//! HTTP adapter reads.

pub mod app_state;
pub mod controller;
pub mod hooks;
pub mod input;
pub mod phase;
pub mod settings;
pub mod snapshot;

// Re-export main types
pub use app_state::AppState;
pub use controller::Controller;
pub use input::{ControlPress, InputSource};
pub use phase::{Marker, Phase};
pub use settings::TimerSettings;
pub use snapshot::{ControlOutcome, TimerSnapshot};
