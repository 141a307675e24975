//! Periodic tracker tick on its own thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tracing::{info, warn};

use super::tick::{TrackerStats, TrackerTick};
use crate::error::Result;
use crate::tracking::Segmenter;

/// Handle to the running tracker thread
pub struct TrackerLoop {
    running: Arc<AtomicBool>,
    stats: Arc<RwLock<TrackerStats>>,
    thread: Option<JoinHandle<()>>,
}

impl TrackerLoop {
    /// Spawn the `tracker-tick` thread, ticking once per `interval`
    pub fn start<S: Segmenter + 'static>(mut tick: TrackerTick<S>, interval: Duration) -> Result<Self> {
        let running = Arc::new(AtomicBool::new(true));
        let stats = tick.stats_handle();
        let thread_running = Arc::clone(&running);

        let thread = thread::Builder::new()
            .name("tracker-tick".to_string())
            .spawn(move || {
                info!("Tracker thread started ({} ms tick)", interval.as_millis());

                while thread_running.load(Ordering::Relaxed) {
                    let start = Instant::now();
                    tick.tick();

                    // Sleep off the rest of the period; overruns start the next tick at once
                    let elapsed = start.elapsed();
                    if elapsed < interval {
                        thread::sleep(interval - elapsed);
                    }
                }

                info!("Tracker thread stopped");
            })?;

        Ok(Self {
            running,
            stats,
            thread: Some(thread),
        })
    }

    pub fn stats(&self) -> TrackerStats {
        *self.stats.read()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Stop ticking and wait for the in-flight tick to finish
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("Tracker thread panicked");
            }
        }
    }
}

impl Drop for TrackerLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::ParameterBridge;
    use crate::frame::{NullSink, SyntheticHandSource, SyntheticScript};
    use crate::params::{PitchRange, Roi, TrackerConfig};
    use crate::tracking::GestureTracker;

    #[test]
    fn test_loop_ticks_and_stops() {
        let roi = Roi::new(20, 10, 40, 40);
        let config = TrackerConfig {
            roi,
            blur_kernel_size: 3,
            ..TrackerConfig::default()
        };
        let tracker = GestureTracker::with_default_segmenter(config, PitchRange::default()).unwrap();
        let source = SyntheticHandSource::new(80, 60, roi, SyntheticScript::Empty);
        let tick = TrackerTick::new(tracker, Box::new(source), Box::new(NullSink), ParameterBridge::default());

        let mut tracker_loop = TrackerLoop::start(tick, Duration::from_millis(1)).unwrap();
        thread::sleep(Duration::from_millis(50));
        tracker_loop.stop();

        assert!(!tracker_loop.is_running());
        let ticks = tracker_loop.stats().frames_processed;
        assert!(ticks > 0);
        thread::sleep(Duration::from_millis(10));
        assert_eq!(tracker_loop.stats().frames_processed, ticks);
    }
}
