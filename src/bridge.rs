//! Parameter bridge: the (pitch, volume) cell shared by the tracker tick
//! and the audio callback, plus the control surface that overrides it.
//!
//! Last writer wins. The audio side reads through [`BridgeReader`], which
//! never blocks: if the tracker holds the lock at that instant the previous
//! value is reused for one more block.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::params::ControlRanges;

/// The only state shared across the tracker/synthesizer boundary
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureParameters {
    /// Oscillator pitch (Hz)
    pub pitch_hz: f32,

    /// Linear output gain in [0, 1]
    pub volume: f32,
}

impl Default for GestureParameters {
    fn default() -> Self {
        let ranges = ControlRanges::default();
        Self {
            pitch_hz: ranges.default_frequency_hz,
            volume: ranges.default_amplitude,
        }
    }
}

/// Cloneable handle to the shared parameter cell
#[derive(Debug, Clone, Default)]
pub struct ParameterBridge {
    cell: Arc<Mutex<GestureParameters>>,
}

impl ParameterBridge {
    pub fn new(initial: GestureParameters) -> Self {
        Self {
            cell: Arc::new(Mutex::new(initial)),
        }
    }

    /// Replace both values in one write
    pub fn set(&self, params: GestureParameters) {
        *self.cell.lock() = params;
    }

    pub fn set_pitch(&self, pitch_hz: f32) {
        self.cell.lock().pitch_hz = pitch_hz;
    }

    pub fn set_volume(&self, volume: f32) {
        self.cell.lock().volume = volume;
    }

    pub fn get(&self) -> GestureParameters {
        *self.cell.lock()
    }

    /// Non-blocking read; `None` while a writer holds the lock
    pub fn try_get(&self) -> Option<GestureParameters> {
        self.cell.try_lock().map(|guard| *guard)
    }

    /// Reader for the real-time audio callback
    pub fn reader(&self) -> BridgeReader {
        BridgeReader {
            bridge: self.clone(),
            last: self.get(),
        }
    }
}

/// Audio-side reader that caches the last value it saw
#[derive(Debug, Clone)]
pub struct BridgeReader {
    bridge: ParameterBridge,
    last: GestureParameters,
}

impl BridgeReader {
    /// Latest parameters, or the previously read ones if the cell is busy
    pub fn snapshot(&mut self) -> GestureParameters {
        if let Some(params) = self.bridge.try_get() {
            self.last = params;
        }
        self.last
    }
}

/// Frequency / amplitude controls acting as an alternate bridge writer
///
/// Replaces widget listeners with explicit setter calls from whichever UI
/// layer drives the session.
#[derive(Debug, Clone)]
pub struct ControlSurface {
    bridge: ParameterBridge,
    ranges: ControlRanges,
}

impl ControlSurface {
    pub fn new(bridge: ParameterBridge, ranges: ControlRanges) -> Self {
        Self { bridge, ranges }
    }

    /// Set the frequency control; clamped to its range
    pub fn set_frequency(&self, hz: f32) -> f32 {
        let hz = self.ranges.clamp_frequency(hz);
        self.bridge.set_pitch(hz);
        hz
    }

    /// Set the amplitude control; clamped to its range
    pub fn set_amplitude(&self, amplitude: f32) -> f32 {
        let amplitude = self.ranges.clamp_amplitude(amplitude);
        self.bridge.set_volume(amplitude);
        amplitude
    }

    /// Restore both controls to their defaults
    pub fn reset(&self) {
        self.bridge.set(GestureParameters {
            pitch_hz: self.ranges.default_frequency_hz,
            volume: self.ranges.default_amplitude,
        });
    }

    /// Values the controls should display (whatever was written last)
    pub fn displayed(&self) -> GestureParameters {
        self.bridge.get()
    }

    pub fn ranges(&self) -> &ControlRanges {
        &self.ranges
    }
}
