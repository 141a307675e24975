//! Air theremin - play pitch and volume with a fingertip in front of a camera.
//!
//! Horizontal finger position inside the region of interest picks the pitch
//! (A3..A5, equal tempered), height picks the volume.

use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use air_theremin::cli::Args;
use air_theremin::frame::{
    DisplaySink, FrameSource, ImageSequenceSource, NullSink, PngSequenceSink,
    SyntheticHandSource, SyntheticScript,
};
use air_theremin::params::{ControlRanges, PitchRange, SynthConfig, TrackerConfig};
use air_theremin::session::{render_offline, Session, SessionOptions, TrackerTick};
use air_theremin::tracking::{GestureTracker, RunningGaussianSegmenter};
use air_theremin::{logging, ParameterBridge};

/// Synthetic camera frame size (pixels)
const SYNTHETIC_FRAME: (u32, u32) = (640, 480);

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(&args.log_level).context("Failed to initialise logging")?;

    info!("Air theremin starting");

    let tracker_config = args.tracker_config();
    let controls = ControlRanges::default();
    let bridge = ParameterBridge::new(args.initial_parameters(&controls));

    if let Some(recording) = args.recording_config() {
        let sink: Box<dyn DisplaySink> = if recording.save_frames {
            Box::new(PngSequenceSink::new(recording.frames_dir())?)
        } else {
            Box::new(NullSink)
        };
        let mut tick = build_tick(&args, &tracker_config, sink, bridge)?;
        let summary = render_offline(&recording, &SynthConfig::default(), &mut tick)
            .context("Offline render failed")?;

        println!(
            "Wrote {} ({} audio frames, {} gestures over {} ticks)",
            recording.audio_path().display(),
            summary.audio_frames,
            summary.stats.gestures_detected,
            summary.ticks
        );
        return Ok(());
    }

    let options = SessionOptions {
        synth: SynthConfig::default(),
        controls,
        initial: bridge.get(),
    };

    let started = if args.no_tracker {
        Session::start::<RunningGaussianSegmenter>(options, None, bridge)
    } else {
        let tick = build_tick(&args, &tracker_config, Box::new(NullSink), bridge.clone())?;
        let interval = Duration::from_millis(tracker_config.tick_interval_ms);
        Session::start(options, Some((tick, interval)), bridge)
    };
    let session = started.context("Failed to start session")?;

    println!("Air theremin is running. Move a finger inside the region of interest.");

    let start_time = Instant::now();
    let limit = args.duration.map(Duration::from_secs_f32);
    loop {
        thread::sleep(Duration::from_secs(1));

        let params = session.controls().displayed();
        match session.tracker_stats() {
            Some(stats) => info!(
                "pitch {:.1} Hz  volume {:.2}  ({} frames, {} gestures, {} missing, {} ROI mismatches)",
                params.pitch_hz,
                params.volume,
                stats.frames_processed,
                stats.gestures_detected,
                stats.frames_missing,
                stats.roi_mismatches
            ),
            None => info!("pitch {:.1} Hz  volume {:.2}", params.pitch_hz, params.volume),
        }

        if limit.is_some_and(|limit| start_time.elapsed() >= limit) {
            break;
        }
    }

    session.stop();
    info!("Air theremin stopped");
    Ok(())
}

/// Frame source from the flags: a frame directory or the synthetic hand
fn frame_source(args: &Args, config: &TrackerConfig) -> Result<Box<dyn FrameSource>> {
    match &args.frames {
        Some(dir) => {
            let source = ImageSequenceSource::open(dir, args.loop_frames)
                .with_context(|| format!("Failed to open frame directory {:?}", dir))?;
            Ok(Box::new(source))
        }
        None => {
            let (width, height) = SYNTHETIC_FRAME;
            let source = SyntheticHandSource::new(
                width,
                height,
                config.roi,
                SyntheticScript::Sweep {
                    period_frames: args.fps.max(1) * 4,
                },
            )
            .with_warmup(args.fps.max(1));
            Ok(Box::new(source))
        }
    }
}

fn build_tick(
    args: &Args,
    config: &TrackerConfig,
    sink: Box<dyn DisplaySink>,
    bridge: ParameterBridge,
) -> Result<TrackerTick<RunningGaussianSegmenter>> {
    let source = frame_source(args, config)?;
    if let Some((width, height)) = source.dimensions() {
        anyhow::ensure!(
            config.roi.fits_within(width, height),
            "ROI {:?} does not fit {}x{} frames",
            config.roi,
            width,
            height
        );
    }

    let tracker = GestureTracker::with_default_segmenter(config.clone(), PitchRange::default())
        .context("Invalid tracker configuration")?;
    Ok(TrackerTick::new(tracker, source, sink, bridge))
}
