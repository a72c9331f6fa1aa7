//! Phase controller
//!
//! Owns the current phase and the [`TimerContext`] the phase hooks act on.
//! Both control presses and countdown expiry funnel through
//! [`Controller::transition`], so there is never more than one current phase
//! and the old phase always exits before the new one enters.

use tracing::{debug, info};

use super::{
    hooks::{hooks, TimerContext},
    ControlPress, Phase, TimerSettings, TimerSnapshot,
};
use crate::{
    engine::{PollId, TimerEngine},
    services::{Cue, CuePlayer, Surface},
    utils::format_countdown,
};

pub struct Controller {
    phase: Option<Phase>,
    ctx: TimerContext,
}

impl Controller {
    /// Create a controller with no current phase; call [`boot`](Self::boot)
    /// to enter Idle
    pub fn new(
        settings: TimerSettings,
        engine: TimerEngine,
        surface: Box<dyn Surface>,
        alarm: Box<dyn Cue>,
        cooldown: Box<dyn Cue>,
    ) -> Self {
        Self {
            phase: None,
            ctx: TimerContext {
                engine,
                surface,
                alarm: CuePlayer::new("alarm", alarm),
                cooldown: CuePlayer::new("cooldown", cooldown),
                control_enabled: true,
                settings,
            },
        }
    }

    /// Enter Idle if no phase is current yet
    pub fn boot(&mut self) {
        if self.phase.is_none() {
            self.transition(Phase::Idle);
        }
    }

    pub fn phase(&self) -> Option<Phase> {
        self.phase
    }

    pub fn remaining_ms(&self) -> i64 {
        self.ctx.engine.remaining_ms()
    }

    pub fn is_polling(&self) -> bool {
        self.ctx.engine.is_polling()
    }

    pub fn control_enabled(&self) -> bool {
        self.ctx.control_enabled
    }

    /// Exit the current phase, enter `next`, then make it current
    pub fn transition(&mut self, next: Phase) {
        let previous = self.phase;

        if let Some(current) = previous {
            if let Some(marker) = current.marker() {
                self.ctx.surface.remove_marker(marker);
            }
            if let Some(exit) = hooks(current).exit {
                exit(&mut self.ctx);
            }
        }

        if let Some(marker) = next.marker() {
            self.ctx.surface.add_marker(marker);
        }
        self.ctx.surface.set_label(next.label());
        if let Some(enter) = hooks(next).enter {
            enter(&mut self.ctx);
        }

        self.phase = Some(next);

        match previous {
            Some(from) => info!(
                "Phase {} -> {} ({})",
                from,
                next,
                format_countdown(self.ctx.engine.remaining_ms())
            ),
            None => info!("Phase {} ({})", next, format_countdown(self.ctx.engine.remaining_ms())),
        }
    }

    /// Advance on the control trigger
    ///
    /// Returns the new phase, or `None` when the trigger has no effect in
    /// the current phase.
    pub fn control(&mut self) -> Option<Phase> {
        let Some(current) = self.phase else {
            debug!("Control before boot ignored");
            return None;
        };

        let next = current.on_control();
        if next == current {
            debug!("Control has no effect in {}", current);
            return None;
        }

        self.transition(next);
        Some(next)
    }

    /// Handle a press from an input source
    ///
    /// Auto-repeated presses and presses while the control is disabled are
    /// dropped. Returns whether the press caused a transition.
    pub fn press(&mut self, press: ControlPress) -> bool {
        if press.repeat {
            debug!("Ignoring repeated {:?} press", press.source);
            return false;
        }
        if !self.ctx.control_enabled {
            debug!("Ignoring {:?} press while control is disabled", press.source);
            return false;
        }
        self.control().is_some()
    }

    /// Handle a delivery from the repeating poll
    ///
    /// Deliveries from a poll that is no longer active are ignored.
    pub fn poll(&mut self, poll: PollId) {
        if self.ctx.engine.active_poll() != Some(poll) {
            debug!("Ignoring stale poll {}", poll.0);
            return;
        }

        let tick = self.ctx.engine.tick();
        if tick.expired {
            self.expire();
        }
        self.ctx.publish();
    }

    /// The countdown ran out: Cooldown returns to Idle, anything else alarms
    pub fn expire(&mut self) {
        let Some(current) = self.phase else {
            return;
        };
        info!("Countdown expired in {}", current);
        self.transition(current.on_expiry());
    }

    /// Stop the poll and any playing cue
    pub fn shutdown(&mut self) {
        self.ctx.engine.stop();
        self.ctx.alarm.stop();
        self.ctx.cooldown.stop();
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        let remaining_ms = self.ctx.engine.remaining_ms();
        TimerSnapshot {
            phase: self.phase,
            remaining_ms,
            display: format_countdown(remaining_ms),
            label: self.phase.map(|p| p.label().to_string()),
            marker: self.phase.and_then(Phase::marker),
            control_enabled: self.ctx.control_enabled,
            alarm_playing: self.ctx.alarm.is_playing(),
            cooldown_playing: self.ctx.cooldown.is_playing(),
            polling: self.ctx.engine.is_polling(),
        }
    }
}
