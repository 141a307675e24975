//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::bridge::GestureParameters;
use crate::params::{BackgroundConfig, ControlRanges, RecordingConfig, Roi, TrackerConfig};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "air-theremin")]
#[command(about = "Play a sine theremin by moving a finger in front of the camera", long_about = None)]
pub struct Args {
    /// Directory of recorded camera frames (PNG/JPEG); synthetic hand if omitted
    #[arg(long, value_name = "DIR")]
    pub frames: Option<PathBuf>,

    /// Loop the frame directory instead of stopping at its end
    #[arg(long)]
    pub loop_frames: bool,

    /// Render headless to WAV + PNG frames instead of the audio device (seconds)
    #[arg(long, value_name = "SECONDS")]
    pub record: Option<f32>,

    /// Output directory for --record
    #[arg(long, value_name = "DIR", default_value = "recording")]
    pub output_dir: PathBuf,

    /// Stop a live session after this many seconds (runs until killed otherwise)
    #[arg(long, value_name = "SECONDS")]
    pub duration: Option<f32>,

    /// Region of interest in the mirrored frame as x,y,width,height
    #[arg(long, value_name = "X,Y,W,H", value_parser = parse_roi, default_value = "300,50,300,300")]
    pub roi: Roi,

    /// Gaussian blur kernel size (odd)
    #[arg(long, value_name = "PIXELS", default_value = "23")]
    pub blur_kernel: u32,

    /// Background model history length (frames)
    #[arg(long, value_name = "FRAMES", default_value = "2500")]
    pub history: u32,

    /// Background variance threshold
    #[arg(long, value_name = "SIGMA2", default_value = "10")]
    pub var_threshold: f32,

    /// Frames to learn the background before gestures count
    #[arg(long, value_name = "FRAMES", default_value = "0")]
    pub warmup_frames: u32,

    /// Tracker tick rate
    #[arg(long, value_name = "HZ", default_value = "30")]
    pub fps: u32,

    /// Initial frequency control (Hz, 220-880)
    #[arg(long, value_name = "HZ", default_value = "440")]
    pub frequency: f32,

    /// Initial amplitude control (0-1)
    #[arg(long, value_name = "GAIN", default_value = "0.25")]
    pub amplitude: f32,

    /// Play a steady tone from the controls without tracking
    #[arg(long)]
    pub no_tracker: bool,

    /// Default log level (RUST_LOG overrides)
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Tracker configuration assembled from the flags
    pub fn tracker_config(&self) -> TrackerConfig {
        TrackerConfig {
            roi: self.roi,
            blur_kernel_size: self.blur_kernel,
            background: BackgroundConfig {
                history_frames: self.history,
                var_threshold: self.var_threshold,
                ..BackgroundConfig::default()
            },
            warmup_frames: self.warmup_frames,
            tick_interval_ms: 1000 / u64::from(self.fps.max(1)),
        }
    }

    /// Control values clamped to their ranges
    pub fn initial_parameters(&self, ranges: &ControlRanges) -> GestureParameters {
        GestureParameters {
            pitch_hz: ranges.clamp_frequency(self.frequency),
            volume: ranges.clamp_amplitude(self.amplitude),
        }
    }

    /// Create recording configuration if recording mode is enabled
    pub fn recording_config(&self) -> Option<RecordingConfig> {
        self.record.map(|duration| {
            let mut config = RecordingConfig::new(duration);
            config.output_dir = self.output_dir.clone();
            config.fps = self.fps.max(1);
            config
        })
    }
}

/// Parse `x,y,width,height`
pub fn parse_roi(value: &str) -> Result<Roi, String> {
    let parts: Vec<u32> = value
        .split(',')
        .map(|p| p.trim().parse::<u32>())
        .collect::<Result<_, _>>()
        .map_err(|e| format!("ROI must be x,y,width,height: {}", e))?;

    match parts.as_slice() {
        [x, y, width, height] if *width > 0 && *height > 0 => Ok(Roi::new(*x, *y, *width, *height)),
        [_, _, _, _] => Err("ROI width and height must be > 0".to_string()),
        _ => Err(format!("ROI needs 4 values, got {}", parts.len())),
    }
}
