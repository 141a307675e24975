//! Synthesis configuration and pitch band.

/// Wavetable synthesizer configuration
#[derive(Debug, Clone)]
pub struct SynthConfig {
    /// Number of entries in the sine lookup table
    pub table_size: usize,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            table_size: audio_constants::TABLE_SIZE,
        }
    }
}

impl SynthConfig {
    /// Validate configuration (table must hold at least one sample)
    pub fn validate(&self) -> Result<(), String> {
        if self.table_size == 0 {
            return Err("Wavetable size must be > 0".to_string());
        }
        Ok(())
    }
}

/// Playable pitch band mapped across the ROI width
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchRange {
    /// Pitch at the left edge of the ROI (Hz), A3
    pub min_hz: f32,

    /// Pitch at the right edge of the ROI (Hz), A5
    pub max_hz: f32,
}

impl Default for PitchRange {
    fn default() -> Self {
        Self {
            min_hz: 220.0,
            max_hz: 880.0,
        }
    }
}

impl PitchRange {
    /// Width of the band in equal-tempered semitones (24 for A3..A5)
    pub fn semitone_range(&self) -> f32 {
        12.0 * (self.max_hz / self.min_hz).log2()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.min_hz.is_nan() || self.max_hz.is_nan() || self.min_hz <= 0.0 || self.max_hz < self.min_hz {
            return Err(format!(
                "Pitch range must satisfy 0 < min <= max, got {}..{}",
                self.min_hz, self.max_hz
            ));
        }
        Ok(())
    }
}

/// Audio constants
pub mod audio_constants {
    /// Sine table length (samples per cycle)
    pub const TABLE_SIZE: usize = 1024;

    /// Default offline render sample rate (Hz); live audio uses the device rate
    pub const DEFAULT_SAMPLE_RATE_HZ: f64 = 44_100.0;

    /// Offline render block size (samples per buffer)
    /// 128 = 2.9ms @ 44.1kHz
    pub const BLOCK_SIZE: usize = 128;
}
