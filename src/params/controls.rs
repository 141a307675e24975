//! Ranges of the externally adjustable frequency / amplitude controls.

use std::ops::RangeInclusive;

/// Control surface ranges and defaults
#[derive(Debug, Clone)]
pub struct ControlRanges {
    /// Frequency override range (Hz)
    pub frequency_hz: RangeInclusive<f32>,

    /// Frequency before any tracker or user input (Hz)
    pub default_frequency_hz: f32,

    /// Amplitude override range (linear gain)
    pub amplitude: RangeInclusive<f32>,

    /// Amplitude before any tracker or user input
    pub default_amplitude: f32,
}

impl Default for ControlRanges {
    fn default() -> Self {
        Self {
            frequency_hz: 220.0..=880.0,
            default_frequency_hz: 440.0,
            amplitude: 0.0..=1.0,
            default_amplitude: 0.25,
        }
    }
}

impl ControlRanges {
    pub fn clamp_frequency(&self, hz: f32) -> f32 {
        hz.clamp(*self.frequency_hz.start(), *self.frequency_hz.end())
    }

    pub fn clamp_amplitude(&self, amplitude: f32) -> f32 {
        amplitude.clamp(*self.amplitude.start(), *self.amplitude.end())
    }
}
