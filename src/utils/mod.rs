//! Utility functions module
//!
//! Clock sources, countdown formatting and signal handling used throughout
//! the application.

pub mod clock;
pub mod format;
pub mod signals;

// Re-export main items
pub use clock::{Clock, ManualClock, SystemClock};
pub use format::format_countdown;
pub use signals::shutdown_signal;
