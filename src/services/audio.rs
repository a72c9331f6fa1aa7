//! Audio cues played from phase hooks

use std::{
    io::Write,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use tokio::{task::JoinHandle, time::interval};
use tracing::{debug, info, trace};

/// A loopable sound
pub trait Cue: Send {
    fn play(&mut self);
    fn stop(&mut self);
}

/// Wraps a cue so repeated `play` or `stop` calls reach it only once
pub struct CuePlayer {
    name: &'static str,
    cue: Box<dyn Cue>,
    playing: bool,
}

impl CuePlayer {
    pub fn new(name: &'static str, cue: Box<dyn Cue>) -> Self {
        Self {
            name,
            cue,
            playing: false,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn play(&mut self) {
        if self.playing {
            debug!("{} cue already playing", self.name);
            return;
        }
        self.cue.play();
        self.playing = true;
    }

    pub fn stop(&mut self) {
        if !self.playing {
            return;
        }
        self.cue.stop();
        self.playing = false;
    }
}

/// Cue that logs instead of making a sound
#[derive(Debug)]
pub struct LogCue {
    name: &'static str,
}

impl LogCue {
    pub fn new(name: &'static str) -> Self {
        Self { name }
    }
}

impl Cue for LogCue {
    fn play(&mut self) {
        info!("Playing {} cue (looping)", self.name);
    }

    fn stop(&mut self) {
        info!("Stopped {} cue", self.name);
    }
}

/// Cue that rings the terminal bell at a fixed period until stopped
///
/// Must be played from within a tokio runtime.
#[derive(Debug)]
pub struct BellCue {
    period: Duration,
    task: Option<JoinHandle<()>>,
}

impl BellCue {
    pub fn new(period: Duration) -> Self {
        Self { period, task: None }
    }
}

impl Cue for BellCue {
    fn play(&mut self) {
        if self.task.is_some() {
            return;
        }
        let period = self.period;
        self.task = Some(tokio::spawn(async move {
            let mut ticker = interval(period);
            loop {
                ticker.tick().await;
                let mut stderr = std::io::stderr().lock();
                if let Err(e) = stderr.write_all(b"\x07").and_then(|()| stderr.flush()) {
                    trace!("Failed to ring terminal bell: {}", e);
                }
            }
        }));
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for BellCue {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Cue counting how often it was played and stopped; clones share counts
#[derive(Debug, Clone, Default)]
pub struct MemoryCue {
    plays: Arc<AtomicUsize>,
    stops: Arc<AtomicUsize>,
}

impl MemoryCue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plays(&self) -> usize {
        self.plays.load(Ordering::SeqCst)
    }

    pub fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

impl Cue for MemoryCue {
    fn play(&mut self) {
        self.plays.fetch_add(1, Ordering::SeqCst);
    }

    fn stop(&mut self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
    }
}
