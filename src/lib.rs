//! Air theremin library - webcam fingertip tracking driving a wavetable synth

pub mod audio;
pub mod bridge;
pub mod cli;
pub mod error;
pub mod frame;
pub mod logging;
pub mod params;
pub mod pitch;
pub mod session;
pub mod tracking;

pub use bridge::{BridgeReader, ControlSurface, GestureParameters, ParameterBridge};
pub use error::{Result, ThereminError};
