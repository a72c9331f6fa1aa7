//! Background tasks module
//!
//! The driver task that owns the timer, and the keyboard task feeding it
//! space bar presses from the terminal.

pub mod driver;
pub mod keyboard;

// Re-export main items
pub use driver::{timer_driver_task, Command};
pub use keyboard::{keyboard_task, terminal_keyboard_task, KeyboardExit, RawModeGuard, RepeatFilter};
