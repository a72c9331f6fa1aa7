//! Timer engine: countdown value, elapsed-time tracking and the active poll

use std::time::Duration;

use tracing::{debug, trace, warn};

use super::scheduler::{PollId, RepeatingTask, Scheduler};
use crate::utils::Clock;

/// Result of one poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Milliseconds measured since the previous poll
    pub elapsed_ms: u64,
    pub remaining_ms: i64,
    /// Remaining time reached zero or below
    pub expired: bool,
}

struct ActivePoll {
    id: PollId,
    task: Box<dyn RepeatingTask>,
}

/// Countdown driven by a repeating poll
///
/// Operates on clock deltas: every tick subtracts the time measured since
/// the previous tick, so a late poll does not make the countdown drift.
pub struct TimerEngine {
    remaining_ms: i64,
    last_poll_ms: u64,
    poll: Option<ActivePoll>,
    poll_counter: u64,
    interval: Duration,
    clock: Box<dyn Clock>,
    scheduler: Box<dyn Scheduler>,
}

impl TimerEngine {
    pub fn new(interval: Duration, clock: Box<dyn Clock>, scheduler: Box<dyn Scheduler>) -> Self {
        let last_poll_ms = clock.now();
        Self {
            remaining_ms: 0,
            last_poll_ms,
            poll: None,
            poll_counter: 0,
            interval,
            clock,
            scheduler,
        }
    }

    pub fn remaining_ms(&self) -> i64 {
        self.remaining_ms
    }

    /// Replace the countdown value without touching the poll
    pub fn set_remaining(&mut self, remaining_ms: i64) {
        self.remaining_ms = remaining_ms;
    }

    /// Id of the poll currently driving the countdown, if any
    pub fn active_poll(&self) -> Option<PollId> {
        self.poll.as_ref().map(|p| p.id)
    }

    pub fn is_polling(&self) -> bool {
        self.poll.is_some()
    }

    /// Begin counting down from `duration_ms`
    ///
    /// A poll that is still active is stopped first, so at most one poll
    /// ever drives the countdown.
    pub fn start(&mut self, duration_ms: i64) {
        if let Some(active) = &self.poll {
            warn!("Poll {} still active on start, stopping it first", active.id.0);
            self.stop();
        }

        self.remaining_ms = duration_ms;
        self.last_poll_ms = self.clock.now();
        self.poll_counter += 1;

        let id = PollId(self.poll_counter);
        let task = self.scheduler.schedule(self.interval, id);
        self.poll = Some(ActivePoll { id, task });

        debug!(
            "Started poll {} every {}ms from {}ms",
            id.0,
            self.interval.as_millis(),
            duration_ms
        );
    }

    /// Subtract the time elapsed since the previous poll
    pub fn tick(&mut self) -> Tick {
        let now = self.clock.now();
        let elapsed_ms = now.saturating_sub(self.last_poll_ms);
        self.remaining_ms = self
            .remaining_ms
            .saturating_sub(i64::try_from(elapsed_ms).unwrap_or(i64::MAX));
        self.last_poll_ms = now;

        trace!("Tick: -{}ms, {}ms remaining", elapsed_ms, self.remaining_ms);

        Tick {
            elapsed_ms,
            remaining_ms: self.remaining_ms,
            expired: self.remaining_ms <= 0,
        }
    }

    /// Cancel the active poll; does nothing when none is active
    pub fn stop(&mut self) {
        if let Some(mut active) = self.poll.take() {
            active.task.cancel();
            debug!("Stopped poll {} with {}ms remaining", active.id.0, self.remaining_ms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{engine::ManualScheduler, utils::ManualClock};

    fn engine() -> (TimerEngine, ManualClock, ManualScheduler) {
        let clock = ManualClock::new();
        let scheduler = ManualScheduler::new();
        let engine = TimerEngine::new(
            Duration::from_millis(100),
            Box::new(clock.clone()),
            Box::new(scheduler.clone()),
        );
        (engine, clock, scheduler)
    }

    #[test]
    fn new_engine_is_idle_at_zero() {
        let (engine, _, scheduler) = engine();
        assert_eq!(engine.remaining_ms(), 0);
        assert!(!engine.is_polling());
        assert!(scheduler.live().is_empty());
    }

    #[test]
    fn tick_subtracts_measured_delta() {
        let (mut engine, clock, _) = engine();
        clock.set(5_000);
        engine.start(1_000);

        clock.advance(120);
        let tick = engine.tick();
        assert_eq!(tick.elapsed_ms, 120);
        assert_eq!(tick.remaining_ms, 880);
        assert!(!tick.expired);

        // A late poll still accounts for the full gap
        clock.advance(450);
        assert_eq!(engine.tick().remaining_ms, 430);
    }

    #[test]
    fn expiry_at_zero_and_below() {
        let (mut engine, clock, _) = engine();
        engine.start(200);

        clock.advance(200);
        let tick = engine.tick();
        assert_eq!(tick.remaining_ms, 0);
        assert!(tick.expired);

        engine.start(200);
        clock.advance(260);
        let tick = engine.tick();
        assert_eq!(tick.remaining_ms, -60);
        assert!(tick.expired);
    }

    #[test]
    fn stop_is_idempotent() {
        let (mut engine, _, scheduler) = engine();
        engine.start(1_000);
        assert_eq!(scheduler.live().len(), 1);

        engine.stop();
        engine.stop();
        assert!(scheduler.live().is_empty());
        assert!(!engine.is_polling());
        assert_eq!(engine.remaining_ms(), 1_000);
    }

    #[test]
    fn double_start_keeps_a_single_poll() {
        let (mut engine, _, scheduler) = engine();
        engine.start(1_000);
        let first = engine.active_poll();
        engine.start(2_000);

        assert_eq!(scheduler.scheduled(), 2);
        assert_eq!(scheduler.live(), vec![engine.active_poll().expect("active")]);
        assert_ne!(engine.active_poll(), first);
        assert_eq!(engine.remaining_ms(), 2_000);
    }

    #[test]
    fn restart_measures_from_start_not_previous_tick() {
        let (mut engine, clock, _) = engine();
        engine.start(1_000);
        clock.advance(300);
        engine.tick();
        engine.stop();

        // Time spent stopped is not counted
        clock.advance(10_000);
        engine.start(engine.remaining_ms());
        clock.advance(100);
        assert_eq!(engine.tick().remaining_ms, 600);
    }
}
