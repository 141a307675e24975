//! End-to-end: synthetic camera -> tracker -> bridge -> synthesizer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use air_theremin::audio::WavetableSynth;
use air_theremin::frame::{FrameSource, NullSink, SyntheticHandSource, SyntheticScript};
use air_theremin::pitch::pitch_for_x;
use air_theremin::params::{PitchRange, RecordingConfig, Roi, SynthConfig, TrackerConfig};
use air_theremin::session::{render_offline, TrackerTick};
use air_theremin::tracking::GestureTracker;
use air_theremin::{GestureParameters, ParameterBridge};

const FRAME: (u32, u32) = (320, 240);

fn roi() -> Roi {
    Roi::new(150, 20, 150, 150)
}

fn tracker_config() -> TrackerConfig {
    TrackerConfig {
        roi: roi(),
        blur_kernel_size: 9,
        ..TrackerConfig::default()
    }
}

fn tick_for(source: SyntheticHandSource, bridge: ParameterBridge) -> TrackerTick<air_theremin::tracking::RunningGaussianSegmenter> {
    let tracker = GestureTracker::with_default_segmenter(tracker_config(), PitchRange::default()).unwrap();
    TrackerTick::new(tracker, Box::new(source), Box::new(NullSink), bridge)
}

#[test]
fn held_finger_maps_to_expected_pitch_and_volume() {
    let bridge = ParameterBridge::default();
    let source = SyntheticHandSource::new(FRAME.0, FRAME.1, roi(), SyntheticScript::Hold { tip: (75, 75) })
        .with_warmup(20);
    let mut tick = tick_for(source, bridge.clone());

    for _ in 0..20 {
        assert!(tick.tick().is_none());
    }
    let params = tick.tick().expect("finger should be detected");

    // The tip is the first topmost mask pixel: somewhere across the 13 px
    // finger, lifted by at most the blur radius
    let range = PitchRange::default();
    let lowest = pitch_for_x(75.0 - 6.0 - 4.0, 150, &range);
    let highest = pitch_for_x(75.0 + 6.0 + 4.0, 150, &range);
    assert!(
        (lowest..=highest).contains(&params.pitch_hz),
        "pitch {}",
        params.pitch_hz
    );
    assert!((0.5..=0.53).contains(&params.volume), "volume {}", params.volume);
    assert_eq!(bridge.get(), params);
}

#[test]
fn finger_further_right_sounds_higher() {
    let mut pitches = Vec::new();
    for x in [20, 75, 130] {
        let bridge = ParameterBridge::default();
        let source = SyntheticHandSource::new(FRAME.0, FRAME.1, roi(), SyntheticScript::Hold { tip: (x, 60) })
            .with_warmup(10);
        let mut tick = tick_for(source, bridge);
        let params = (0..11).filter_map(|_| tick.tick()).last().unwrap();
        pitches.push(params.pitch_hz);
    }
    assert!(pitches[0] < pitches[1] && pitches[1] < pitches[2], "{:?}", pitches);
}

#[test]
fn parameters_survive_dropouts_and_empty_scenes() {
    let bridge = ParameterBridge::default();
    let initial = bridge.get();
    let source = SyntheticHandSource::new(FRAME.0, FRAME.1, roi(), SyntheticScript::Empty).with_dropouts(4);
    let mut tick = tick_for(source, bridge.clone());

    for _ in 0..40 {
        tick.tick();
    }
    assert_eq!(bridge.get(), initial);
    assert_eq!(tick.stats().frames_missing, 10);
    assert_eq!(tick.stats().frames_processed, 30);
}

#[test]
fn offline_render_writes_stereo_wav() {
    let dir = tempfile::tempdir().unwrap();
    let bridge = ParameterBridge::default();
    let source = SyntheticHandSource::new(FRAME.0, FRAME.1, roi(), SyntheticScript::Sweep { period_frames: 30 })
        .with_warmup(5);
    let mut tick = tick_for(source, bridge);

    let mut config = RecordingConfig::new(1.0);
    config.output_dir = dir.path().to_path_buf();
    config.save_frames = false;

    let summary = render_offline(&config, &SynthConfig::default(), &mut tick).unwrap();
    assert_eq!(summary.ticks, 30);
    assert_eq!(summary.audio_frames, 30 * 1470);
    assert!(summary.stats.gestures_detected > 0);

    let reader = hound::WavReader::open(config.audio_path()).unwrap();
    assert_eq!(reader.spec().channels, 2);
    assert_eq!(reader.spec().sample_rate, 44_100);
    let samples: Vec<f32> = reader.into_samples::<f32>().map(|s| s.unwrap()).collect();
    assert_eq!(samples.len(), 2 * 30 * 1470);
    for pair in samples.chunks(2) {
        assert_eq!(pair[0], pair[1]);
        assert!(pair[0].abs() <= 1.0);
    }
}

#[test]
fn offline_render_at_uneven_tick_rate_covers_full_duration() {
    let dir = tempfile::tempdir().unwrap();
    let source = SyntheticHandSource::new(FRAME.0, FRAME.1, roi(), SyntheticScript::Empty);
    let mut tick = tick_for(source, ParameterBridge::default());

    let mut config = RecordingConfig::new(1.0);
    config.output_dir = dir.path().to_path_buf();
    config.save_frames = false;
    config.fps = 31;

    let summary = render_offline(&config, &SynthConfig::default(), &mut tick).unwrap();
    assert_eq!(summary.ticks, 31);
    assert_eq!(summary.audio_frames, 44_100);

    let reader = hound::WavReader::open(config.audio_path()).unwrap();
    assert_eq!(reader.duration(), 44_100);
}

#[test]
fn offline_render_runs_at_recording_sample_rate() {
    let dir = tempfile::tempdir().unwrap();
    let source = SyntheticHandSource::new(FRAME.0, FRAME.1, roi(), SyntheticScript::Empty);
    let mut tick = tick_for(source, ParameterBridge::default());

    let mut config = RecordingConfig::new(0.5);
    config.output_dir = dir.path().to_path_buf();
    config.save_frames = false;
    config.sample_rate_hz = 48_000;

    let summary = render_offline(&config, &SynthConfig::default(), &mut tick).unwrap();
    assert_eq!(summary.audio_frames, 24_000);

    let reader = hound::WavReader::open(config.audio_path()).unwrap();
    assert_eq!(reader.spec().sample_rate, 48_000);
}

#[test]
fn synthetic_source_reports_dimensions() {
    let source = SyntheticHandSource::new(FRAME.0, FRAME.1, roi(), SyntheticScript::Empty);
    assert_eq!(source.dimensions(), Some(FRAME));
}

#[test]
fn concurrent_writes_never_jump_the_phase() {
    let bridge = ParameterBridge::default();
    let done = Arc::new(AtomicBool::new(false));

    let writer_bridge = bridge.clone();
    let writer_done = Arc::clone(&done);
    let writer = thread::spawn(move || {
        let mut i = 0u32;
        while !writer_done.load(Ordering::Relaxed) {
            let pitch_hz = 220.0 + (i % 661) as f32;
            writer_bridge.set(GestureParameters {
                pitch_hz,
                volume: (i % 100) as f32 / 100.0,
            });
            i = i.wrapping_add(1);
        }
    });

    let sample_rate = 48_000.0;
    let mut synth = WavetableSynth::new(1024);
    synth.prepare(sample_rate, bridge.get()).unwrap();
    let mut reader = bridge.reader();
    let mut left = [0.0f32; 64];
    let mut right = [0.0f32; 64];

    for _ in 0..2000 {
        let params = reader.snapshot();
        let before = synth.oscillator().phase;
        synth.fill_block(params, &mut left, &mut right);
        let after = synth.oscillator().phase;

        // The whole block advanced by exactly the increment of the pitch it read
        let increment = params.pitch_hz as f64 * 1024.0 / sample_rate;
        let expected = (before + 64.0 * increment).rem_euclid(1024.0);
        let drift = (after - expected).abs();
        assert!(drift.min(1024.0 - drift) < 1e-6, "drift {}", drift);
        assert!((0.0..1024.0).contains(&after));
    }

    done.store(true, Ordering::Relaxed);
    writer.join().unwrap();
}
