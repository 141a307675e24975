//! Parameter definitions with physical units and documented semantics.
//!
//! All magic numbers are extracted here with:
//! - Physical units (pixels, frames, Hz, etc.)
//! - Documented ranges and meanings
//! - Type safety where possible

mod audio;
mod controls;
mod recording;
mod tracking;

// Re-export all types
pub use audio::{audio_constants, PitchRange, SynthConfig};
pub use controls::ControlRanges;
pub use recording::RecordingConfig;
pub use tracking::{BackgroundConfig, Roi, TrackerConfig};
