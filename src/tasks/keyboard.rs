//! Keyboard task: the space bar as the designated control key
//!
//! Key events come from crossterm in raw mode. When the terminal reports
//! event kinds, auto-repeats arrive as [`KeyEventKind::Repeat`] and are
//! forwarded flagged as repeats. Otherwise every event looks like a fresh
//! press, and [`RepeatFilter`] flags presses that follow each other faster
//! than any person can tap.

use std::{io, time::Duration};

use crossterm::{
    event::{
        Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement},
};
use futures::{Stream, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::Command;
use crate::{state::ControlPress, utils::Clock};

/// Why the keyboard task returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyboardExit {
    /// Ctrl+C was pressed; raw mode swallows SIGINT so the caller must shut down
    Interrupted,
    /// The event stream ended or failed
    Closed,
    /// The driver went away
    DriverGone,
}

/// Flags presses that follow each other faster than a person can tap
///
/// Only used when the terminal cannot tell repeats from presses. Every press
/// within `window` of the previous one counts as a repeat, so a held key
/// fires once.
#[derive(Debug, Clone)]
pub struct RepeatFilter {
    window_ms: u64,
    last_ms: Option<u64>,
}

impl RepeatFilter {
    pub fn new(window: Duration) -> Self {
        Self {
            window_ms: u64::try_from(window.as_millis()).unwrap_or(u64::MAX),
            last_ms: None,
        }
    }

    /// Record a press at `now_ms` and report whether it is a repeat
    pub fn observe(&mut self, now_ms: u64) -> bool {
        let repeat = self
            .last_ms
            .is_some_and(|last| now_ms.saturating_sub(last) < self.window_ms);
        self.last_ms = Some(now_ms);
        repeat
    }
}

/// Restores the terminal when dropped
pub struct RawModeGuard {
    enhanced: bool,
}

impl RawModeGuard {
    /// Enter raw mode, asking the terminal to report key event kinds
    pub fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        let enhanced = supports_keyboard_enhancement().unwrap_or(false);
        if enhanced {
            execute!(
                io::stdout(),
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }
        Ok(Self { enhanced })
    }

    /// Whether auto-repeats are reported as [`KeyEventKind::Repeat`]
    pub fn reports_repeats(&self) -> bool {
        self.enhanced
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if self.enhanced {
            if let Err(e) = execute!(io::stdout(), PopKeyboardEnhancementFlags) {
                warn!("Failed to restore keyboard flags: {}", e);
            }
        }
        if let Err(e) = disable_raw_mode() {
            warn!("Failed to leave raw mode: {}", e);
        }
    }
}

enum KeyAction {
    Control { repeat: bool },
    Interrupt,
}

fn key_action(key: &KeyEvent) -> Option<KeyAction> {
    match (key.code, key.kind) {
        (KeyCode::Char('c'), KeyEventKind::Press) if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(KeyAction::Interrupt)
        }
        (KeyCode::Char(' '), KeyEventKind::Press) => Some(KeyAction::Control { repeat: false }),
        (KeyCode::Char(' '), KeyEventKind::Repeat) => Some(KeyAction::Control { repeat: true }),
        _ => None,
    }
}

/// Open the terminal's key events and forward space bar presses
///
/// Returns `Closed` straight away when stdin is not a terminal.
pub async fn terminal_keyboard_task<C: Clock>(
    clock: C,
    fallback_window: Duration,
    commands: mpsc::Sender<Command>,
) -> KeyboardExit {
    let guard = match RawModeGuard::enable() {
        Ok(guard) => guard,
        Err(e) => {
            warn!("Keyboard control unavailable: {}", e);
            return KeyboardExit::Closed;
        }
    };
    let fallback = (!guard.reports_repeats()).then_some(fallback_window);

    keyboard_task(EventStream::new(), clock, fallback, commands).await
}

/// Forward control key presses from `events` until it ends
///
/// With `fallback_window` set, repeats are detected by timing instead of by
/// event kind.
pub async fn keyboard_task<S, C>(
    mut events: S,
    clock: C,
    fallback_window: Option<Duration>,
    commands: mpsc::Sender<Command>,
) -> KeyboardExit
where
    S: Stream<Item = io::Result<Event>> + Unpin,
    C: Clock,
{
    info!("Starting keyboard task, press space to control the timer");

    let mut filter = fallback_window.map(RepeatFilter::new);

    while let Some(event) = events.next().await {
        let key = match event {
            Ok(Event::Key(key)) => key,
            Ok(_) => continue,
            Err(e) => {
                warn!("Failed to read keyboard input: {}", e);
                return KeyboardExit::Closed;
            }
        };

        let repeat = match key_action(&key) {
            Some(KeyAction::Interrupt) => {
                info!("Ctrl+C pressed");
                return KeyboardExit::Interrupted;
            }
            Some(KeyAction::Control { repeat }) => match filter.as_mut() {
                Some(filter) => filter.observe(clock.now()) || repeat,
                None => repeat,
            },
            None => {
                debug!("Ignoring key {:?}", key.code);
                continue;
            }
        };

        let press = ControlPress::key(repeat);
        if commands.send(Command::Press { press, reply: None }).await.is_err() {
            debug!("Driver gone, stopping keyboard task");
            return KeyboardExit::DriverGone;
        }
    }

    info!("Keyboard input closed");
    KeyboardExit::Closed
}
