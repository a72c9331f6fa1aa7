//! Display surfaces

use std::{
    collections::BTreeSet,
    io::Write,
    sync::{Arc, Mutex, PoisonError},
};

use tracing::{debug, info, trace};

use crate::state::Marker;

/// Where the countdown, the control label and the markers are shown
pub trait Surface: Send {
    /// Show the formatted remaining time
    fn publish(&mut self, text: &str);
    fn set_label(&mut self, label: &str);
    fn add_marker(&mut self, marker: Marker);
    fn remove_marker(&mut self, marker: Marker);
    /// Enable or disable the control trigger's affordance
    fn set_control_enabled(&mut self, enabled: bool);
}

/// Surface that only logs
#[derive(Debug, Default)]
pub struct LogSurface;

impl Surface for LogSurface {
    fn publish(&mut self, text: &str) {
        trace!("Display: {}", text);
    }

    fn set_label(&mut self, label: &str) {
        debug!("Control label: {}", label);
    }

    fn add_marker(&mut self, marker: Marker) {
        debug!("Marker on: {}", marker);
    }

    fn remove_marker(&mut self, marker: Marker) {
        debug!("Marker off: {}", marker);
    }

    fn set_control_enabled(&mut self, enabled: bool) {
        info!("Control {}", if enabled { "enabled" } else { "disabled" });
    }
}

/// Surface that redraws a single status line on stderr
#[derive(Debug, Default)]
pub struct TerminalSurface {
    text: String,
    label: String,
    markers: BTreeSet<Marker>,
    control_enabled: bool,
}

impl TerminalSurface {
    pub fn new() -> Self {
        Self {
            control_enabled: true,
            ..Self::default()
        }
    }

    fn redraw(&self) {
        let markers: Vec<&str> = self.markers.iter().map(|m| m.as_str()).collect();
        let button = if self.control_enabled {
            format!("[{}]", self.label)
        } else {
            format!("({})", self.label)
        };

        let mut stderr = std::io::stderr().lock();
        // A failed redraw only loses one frame
        let _ = write!(stderr, "\r\x1b[2K{:>6}  {}", self.text, button);
        if !markers.is_empty() {
            let _ = write!(stderr, "  {}", markers.join(" "));
        }
        let _ = stderr.flush();
    }
}

impl Surface for TerminalSurface {
    fn publish(&mut self, text: &str) {
        if self.text != text {
            self.text = text.to_string();
            self.redraw();
        }
    }

    fn set_label(&mut self, label: &str) {
        self.label = label.to_string();
        self.redraw();
    }

    fn add_marker(&mut self, marker: Marker) {
        if self.markers.insert(marker) {
            self.redraw();
        }
    }

    fn remove_marker(&mut self, marker: Marker) {
        if self.markers.remove(&marker) {
            self.redraw();
        }
    }

    fn set_control_enabled(&mut self, enabled: bool) {
        self.control_enabled = enabled;
        self.redraw();
    }
}

/// Everything a [`MemorySurface`] has been told
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurfaceRecord {
    /// Every published text, in order
    pub published: Vec<String>,
    pub label: Option<String>,
    pub markers: BTreeSet<Marker>,
    pub control_enabled: Option<bool>,
}

impl SurfaceRecord {
    pub fn last_published(&self) -> Option<&str> {
        self.published.last().map(String::as_str)
    }
}

/// Surface recording into shared memory; clones share the record
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    record: Arc<Mutex<SurfaceRecord>>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self) -> SurfaceRecord {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SurfaceRecord> {
        self.record.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Surface for MemorySurface {
    fn publish(&mut self, text: &str) {
        self.lock().published.push(text.to_string());
    }

    fn set_label(&mut self, label: &str) {
        self.lock().label = Some(label.to_string());
    }

    fn add_marker(&mut self, marker: Marker) {
        self.lock().markers.insert(marker);
    }

    fn remove_marker(&mut self, marker: Marker) {
        self.lock().markers.remove(&marker);
    }

    fn set_control_enabled(&mut self, enabled: bool) {
        self.lock().control_enabled = Some(enabled);
    }
}
