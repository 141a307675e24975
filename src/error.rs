//! Error types for the theremin core.

use thiserror::Error;

/// Theremin errors
#[derive(Error, Debug)]
pub enum ThereminError {
    /// Frame source could not deliver a frame this tick
    #[error("Frame unavailable: {0}")]
    FrameUnavailable(String),

    /// Region of interest does not fit inside the frame
    #[error("ROI {roi_width}x{roi_height}+{roi_x}+{roi_y} exceeds frame {frame_width}x{frame_height}")]
    RoiOutOfBounds {
        roi_x: u32,
        roi_y: u32,
        roi_width: u32,
        roi_height: u32,
        frame_width: u32,
        frame_height: u32,
    },

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Sample rate must be positive and finite
    #[error("Invalid sample rate: {0}")]
    InvalidSampleRate(f64),

    /// No audio output device
    #[error("No audio output device found")]
    NoOutputDevice,

    /// Audio device / stream error
    #[error("Audio error: {0}")]
    Audio(String),

    /// Image decode/encode error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// WAV writer error
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for theremin operations
pub type Result<T> = std::result::Result<T, ThereminError>;
