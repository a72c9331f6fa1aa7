//! Phase enter/exit side effects
//!
//! Each phase maps to a pair of optional plain functions over the
//! [`TimerContext`]. Markers and labels are applied by the controller around
//! these hooks, so the hooks only deal with the countdown, the cues and the
//! control affordance.

use super::{Phase, TimerSettings};
use crate::{
    engine::TimerEngine,
    services::{CuePlayer, Surface},
    utils::format_countdown,
};

/// Everything the phase hooks act on
pub struct TimerContext {
    pub engine: TimerEngine,
    pub surface: Box<dyn Surface>,
    pub alarm: CuePlayer,
    pub cooldown: CuePlayer,
    pub control_enabled: bool,
    pub settings: TimerSettings,
}

impl TimerContext {
    /// Write the formatted remaining time to the surface
    pub fn publish(&mut self) {
        let text = format_countdown(self.engine.remaining_ms());
        self.surface.publish(&text);
    }

    pub fn set_control_enabled(&mut self, enabled: bool) {
        self.control_enabled = enabled;
        self.surface.set_control_enabled(enabled);
    }
}

pub type Hook = fn(&mut TimerContext);

#[derive(Clone, Copy)]
pub struct PhaseHooks {
    pub enter: Option<Hook>,
    pub exit: Option<Hook>,
}

/// Hook table keyed by phase
pub fn hooks(phase: Phase) -> PhaseHooks {
    match phase {
        Phase::Idle => PhaseHooks {
            enter: Some(idle_enter),
            exit: None,
        },
        Phase::Running => PhaseHooks {
            enter: Some(running_enter),
            exit: Some(running_exit),
        },
        Phase::Paused => PhaseHooks {
            enter: None,
            exit: None,
        },
        Phase::Alarm => PhaseHooks {
            enter: Some(alarm_enter),
            exit: Some(alarm_exit),
        },
        Phase::Cooldown => PhaseHooks {
            enter: Some(cooldown_enter),
            exit: Some(cooldown_exit),
        },
    }
}

fn idle_enter(ctx: &mut TimerContext) {
    ctx.engine.set_remaining(ctx.settings.session_ms);
    ctx.publish();
}

// Resumes from whatever was left, which is the full session coming from Idle
fn running_enter(ctx: &mut TimerContext) {
    let remaining = ctx.engine.remaining_ms();
    ctx.engine.start(remaining);
}

fn running_exit(ctx: &mut TimerContext) {
    ctx.engine.stop();
}

fn alarm_enter(ctx: &mut TimerContext) {
    ctx.engine.set_remaining(0);
    ctx.publish();
    ctx.alarm.play();
}

fn alarm_exit(ctx: &mut TimerContext) {
    ctx.alarm.stop();
}

fn cooldown_enter(ctx: &mut TimerContext) {
    ctx.set_control_enabled(false);
    ctx.cooldown.play();
    ctx.engine.start(ctx.settings.cooldown_ms);
    ctx.publish();
}

fn cooldown_exit(ctx: &mut TimerContext) {
    ctx.engine.stop();
    ctx.cooldown.stop();
    ctx.set_control_enabled(true);
}
