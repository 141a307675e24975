//! Wavetable synthesis and audio device output.
//!
//! A precomputed sine table is marched through at a rate derived from the
//! current pitch and scaled by the current volume; both come from the
//! parameter bridge once per block.

mod synthesis;
mod system;
mod wavetable;

// Re-export public types
pub use synthesis::{Oscillator, SynthState, WavetableSynth};
pub use system::AudioSystem;
pub use wavetable::Wavetable;
