//! Countdown engine
//!
//! The engine owns the countdown value and the repeating poll that drives
//! it. It never changes phases itself: expiry is reported back to the
//! caller, which decides what happens next.

pub mod scheduler;
pub mod timer;

// Re-export main types
pub use scheduler::{ManualScheduler, PollId, RepeatingTask, Scheduler, TokioScheduler};
pub use timer::{Tick, TimerEngine};
