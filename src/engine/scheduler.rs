//! Repeating poll scheduling

use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex, PoisonError,
    },
    time::Duration,
};

use serde::{Deserialize, Serialize};
use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::trace;

/// Identifier of one scheduled repeating poll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PollId(pub u64);

/// Handle to a scheduled repeating poll
pub trait RepeatingTask: Send {
    /// Stop further deliveries. Calling it again is a no-op.
    fn cancel(&mut self);
}

/// Something that can deliver a poll id at a fixed period until cancelled
pub trait Scheduler: Send {
    fn schedule(&mut self, every: Duration, poll: PollId) -> Box<dyn RepeatingTask>;
}

/// Scheduler backed by tokio intervals
///
/// Each poll is a spawned task sending its id into the driver's channel, so
/// ticks are handled on the driver task and never overlap. Must be used from
/// within a tokio runtime.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    polls: mpsc::UnboundedSender<PollId>,
}

impl TokioScheduler {
    pub fn new(polls: mpsc::UnboundedSender<PollId>) -> Self {
        Self { polls }
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&mut self, every: Duration, poll: PollId) -> Box<dyn RepeatingTask> {
        let polls = self.polls.clone();
        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + every, every);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                if polls.send(poll).is_err() {
                    trace!("Poll receiver closed, ending poll {}", poll.0);
                    break;
                }
            }
        });

        Box::new(TokioTask { handle })
    }
}

struct TokioTask {
    handle: JoinHandle<()>,
}

impl RepeatingTask for TokioTask {
    fn cancel(&mut self) {
        self.handle.abort();
    }
}

/// Scheduler that records polls instead of running them
///
/// The caller delivers ticks itself. Clones share the same record, which
/// lets tests check how many polls are live at any moment.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    live: Arc<Mutex<Vec<PollId>>>,
    scheduled: Arc<AtomicUsize>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Polls scheduled and not yet cancelled, oldest first
    pub fn live(&self) -> Vec<PollId> {
        self.live
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Total number of polls ever scheduled
    pub fn scheduled(&self) -> usize {
        self.scheduled.load(Ordering::SeqCst)
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, _every: Duration, poll: PollId) -> Box<dyn RepeatingTask> {
        self.scheduled.fetch_add(1, Ordering::SeqCst);
        self.live
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(poll);

        Box::new(ManualTask {
            poll,
            live: Arc::clone(&self.live),
        })
    }
}

struct ManualTask {
    poll: PollId,
    live: Arc<Mutex<Vec<PollId>>>,
}

impl RepeatingTask for ManualTask {
    fn cancel(&mut self) {
        self.live
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|p| *p != self.poll);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_scheduler_tracks_live_polls() {
        let mut scheduler = ManualScheduler::new();
        let observer = scheduler.clone();

        let mut first = scheduler.schedule(Duration::from_millis(100), PollId(1));
        let _second = scheduler.schedule(Duration::from_millis(100), PollId(2));
        assert_eq!(observer.live(), vec![PollId(1), PollId(2)]);

        first.cancel();
        first.cancel();
        assert_eq!(observer.live(), vec![PollId(2)]);
        assert_eq!(observer.scheduled(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_scheduler_delivers_until_cancelled() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = TokioScheduler::new(tx);
        let mut task = scheduler.schedule(Duration::from_millis(100), PollId(7));

        // Nothing is delivered before the first period elapses
        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(350)).await;
        let mut delivered = Vec::new();
        while let Ok(poll) = rx.try_recv() {
            delivered.push(poll);
        }
        assert_eq!(delivered, vec![PollId(7); 3]);

        task.cancel();
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(rx.try_recv().is_err());
    }
}
