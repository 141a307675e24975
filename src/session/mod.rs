//! Session wiring: the tracker tick and the audio tick as two independently
//! scheduled units of work whose only link is the parameter bridge.

mod offline;
mod tick;
mod tracker_loop;

pub use offline::{render_offline, OfflineSummary};
pub use tick::{TrackerStats, TrackerTick};
pub use tracker_loop::TrackerLoop;

use tracing::info;

use crate::audio::AudioSystem;
use crate::bridge::{ControlSurface, GestureParameters, ParameterBridge};
use crate::error::Result;
use crate::params::{ControlRanges, SynthConfig};
use crate::tracking::Segmenter;

/// Everything a live session needs besides its frame source and display
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    pub synth: SynthConfig,
    pub controls: ControlRanges,

    /// Parameters before the first gesture
    pub initial: GestureParameters,
}

/// Live session: tracker thread + audio device
///
/// Field order matters: the tracker loop is declared (and dropped) before
/// the audio system.
pub struct Session {
    tracker: Option<TrackerLoop>,
    audio: Option<AudioSystem>,
    bridge: ParameterBridge,
    controls: ControlSurface,
}

impl Session {
    /// Open the audio device, then start the tracker tick if one is given
    ///
    /// Audio configuration failures abort here, before any tick runs.
    pub fn start<S: Segmenter + 'static>(
        options: SessionOptions,
        tracker: Option<(TrackerTick<S>, std::time::Duration)>,
        bridge: ParameterBridge,
    ) -> Result<Self> {
        bridge.set(options.initial);
        let controls = ControlSurface::new(bridge.clone(), options.controls.clone());
        let audio = AudioSystem::new(&options.synth, &bridge)?;

        let tracker = match tracker {
            Some((tick, interval)) => Some(TrackerLoop::start(tick, interval)?),
            None => {
                info!("Tracker disabled; controls drive the synth");
                None
            }
        };

        Ok(Self {
            tracker,
            audio: Some(audio),
            bridge,
            controls,
        })
    }

    pub fn bridge(&self) -> &ParameterBridge {
        &self.bridge
    }

    pub fn controls(&self) -> &ControlSurface {
        &self.controls
    }

    pub fn tracker_stats(&self) -> Option<TrackerStats> {
        self.tracker.as_ref().map(TrackerLoop::stats)
    }

    /// Stop the tracker tick first, then release the audio device
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(mut tracker) = self.tracker.take() {
            tracker.stop();
        }
        if let Some(audio) = self.audio.take() {
            audio.shutdown();
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.shutdown();
    }
}
