//! Output collaborators module
//!
//! The display surface and audio cues the controller drives from its phase
//! hooks. The core only calls into these traits; what they render to is up
//! to the implementation.

pub mod audio;
pub mod surface;

// Re-export main types
pub use audio::{BellCue, Cue, CuePlayer, LogCue, MemoryCue};
pub use surface::{LogSurface, MemorySurface, Surface, SurfaceRecord, TerminalSurface};
