//! Headless recording configuration.

use std::path::PathBuf;

use super::audio::audio_constants::DEFAULT_SAMPLE_RATE_HZ;

/// Recording mode configuration
#[derive(Debug, Clone)]
pub struct RecordingConfig {
    /// Duration to record (seconds)
    pub duration_secs: f32,

    /// Output directory for frames and audio
    pub output_dir: PathBuf,

    /// Tracker tick rate (frames per second)
    pub fps: u32,

    /// Audio sample rate (Hz)
    pub sample_rate_hz: u32,

    /// Write annotated PNG frames alongside the WAV
    pub save_frames: bool,
}

impl RecordingConfig {
    pub fn new(duration_secs: f32) -> Self {
        Self {
            duration_secs,
            output_dir: PathBuf::from("recording"),
            fps: 30,
            sample_rate_hz: DEFAULT_SAMPLE_RATE_HZ as u32,
            save_frames: true,
        }
    }

    /// Total number of tracker ticks to run
    pub fn total_ticks(&self) -> usize {
        (self.duration_secs * self.fps as f32).ceil() as usize
    }

    /// Audio frames rendered after tracker tick `tick`
    ///
    /// Tick boundaries are rounded to the nearest sample, so the fractional
    /// part carries over and `n` ticks always cover `n * sample_rate / fps`
    /// frames.
    pub fn samples_for_tick(&self, tick: usize) -> usize {
        let boundary = |t: u64| {
            let fps = self.fps.max(1) as u64;
            (t * self.sample_rate_hz as u64 + fps / 2) / fps
        };
        let tick = tick as u64;
        (boundary(tick + 1) - boundary(tick)) as usize
    }

    /// Frame directory path
    pub fn frames_dir(&self) -> PathBuf {
        self.output_dir.join("frames")
    }

    /// Audio file path
    pub fn audio_path(&self) -> PathBuf {
        self.output_dir.join("audio.wav")
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.fps == 0 {
            return Err("Recording fps must be > 0".to_string());
        }
        if self.sample_rate_hz == 0 {
            return Err("Sample rate must be > 0".to_string());
        }
        if self.duration_secs.is_nan() || self.duration_secs < 0.0 {
            return Err(format!("Duration must be >= 0, got {}", self.duration_secs));
        }
        Ok(())
    }
}
