//! One tracker tick: poll the source, track, publish, display.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{error, info, warn};

use crate::bridge::{GestureParameters, ParameterBridge};
use crate::error::ThereminError;
use crate::frame::{DisplaySink, FrameSource};
use crate::tracking::{GestureTracker, Segmenter};

/// Tracker tick statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackerStats {
    /// Ticks that ran the full pipeline
    pub frames_processed: u64,

    /// Ticks skipped because no usable frame was available
    pub frames_missing: u64,

    /// Ticks that wrote new parameters
    pub gestures_detected: u64,

    /// Processed ticks with no contour (or still warming up)
    pub empty_frames: u64,

    /// Frames too small for the configured ROI
    pub roi_mismatches: u64,
}

/// Tracker state driven once per tick, by a thread or an offline loop
pub struct TrackerTick<S: Segmenter> {
    tracker: GestureTracker<S>,
    source: Box<dyn FrameSource>,
    sink: Box<dyn DisplaySink>,
    bridge: ParameterBridge,
    stats: Arc<RwLock<TrackerStats>>,
    source_fault: bool,
    roi_fault: bool,
    display_fault: bool,
}

impl<S: Segmenter> TrackerTick<S> {
    pub fn new(
        tracker: GestureTracker<S>,
        source: Box<dyn FrameSource>,
        sink: Box<dyn DisplaySink>,
        bridge: ParameterBridge,
    ) -> Self {
        Self {
            tracker,
            source,
            sink,
            bridge,
            stats: Arc::new(RwLock::new(TrackerStats::default())),
            source_fault: false,
            roi_fault: false,
            display_fault: false,
        }
    }

    /// Run one tick; returns the parameters written to the bridge, if any
    ///
    /// Every failure is absorbed here. Faults are logged when they start and
    /// when they clear, not on every tick in between.
    pub fn tick(&mut self) -> Option<GestureParameters> {
        let frame = match self.source.next_frame() {
            Ok(frame) => frame,
            Err(e) => {
                self.stats.write().frames_missing += 1;
                if !self.source_fault {
                    warn!("Frame source unavailable, keeping last parameters: {}", e);
                    self.source_fault = true;
                }
                return None;
            }
        };

        if self.source_fault {
            info!("Frame source recovered");
            self.source_fault = false;
        }

        let outcome = match self.tracker.process(&frame) {
            Ok(outcome) => outcome,
            Err(e @ ThereminError::RoiOutOfBounds { .. }) => {
                self.stats.write().roi_mismatches += 1;
                if !self.roi_fault {
                    error!("ROI does not fit the incoming frames, tracking paused: {}", e);
                    self.roi_fault = true;
                }
                return None;
            }
            Err(e) => {
                self.stats.write().frames_missing += 1;
                warn!("Tracker failed on frame: {}", e);
                return None;
            }
        };

        if self.roi_fault {
            info!("ROI fits the frames again, tracking resumed");
            self.roi_fault = false;
        }

        {
            let mut stats = self.stats.write();
            stats.frames_processed += 1;
            match outcome.parameters {
                Some(_) => stats.gestures_detected += 1,
                None => stats.empty_frames += 1,
            }
        }

        if let Some(params) = outcome.parameters {
            self.bridge.set(params);
        }

        match self.sink.present(&outcome.display) {
            Ok(()) if self.display_fault => {
                info!("Display sink recovered");
                self.display_fault = false;
            }
            Ok(()) => {}
            Err(e) if !self.display_fault => {
                warn!("Display sink failed: {}", e);
                self.display_fault = true;
            }
            Err(_) => {}
        }

        outcome.parameters
    }

    pub fn stats(&self) -> TrackerStats {
        *self.stats.read()
    }

    pub(crate) fn stats_handle(&self) -> Arc<RwLock<TrackerStats>> {
        Arc::clone(&self.stats)
    }

    pub fn bridge(&self) -> &ParameterBridge {
        &self.bridge
    }

    pub fn tracker_mut(&mut self) -> &mut GestureTracker<S> {
        &mut self.tracker
    }
}
