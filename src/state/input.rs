//! Control trigger input

use serde::{Deserialize, Serialize};

/// Physical origin of a control press
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputSource {
    #[default]
    Pointer,
    Key,
}

/// One control trigger event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlPress {
    pub source: InputSource,
    /// Auto-repeat from held input rather than a new user action
    #[serde(default)]
    pub repeat: bool,
}

impl ControlPress {
    pub fn pointer() -> Self {
        Self {
            source: InputSource::Pointer,
            repeat: false,
        }
    }

    pub fn key(repeat: bool) -> Self {
        Self {
            source: InputSource::Key,
            repeat,
        }
    }
}
