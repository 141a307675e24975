//! Headless lockstep rendering: tracker ticks interleaved with audio blocks,
//! written to a WAV file.

use std::fs;

use tracing::info;

use super::tick::{TrackerStats, TrackerTick};
use crate::audio::WavetableSynth;
use crate::error::{Result, ThereminError};
use crate::params::{audio_constants::BLOCK_SIZE, RecordingConfig, SynthConfig};
use crate::tracking::Segmenter;

/// What an offline render produced
#[derive(Debug, Clone, PartialEq)]
pub struct OfflineSummary {
    /// Tracker ticks run
    pub ticks: usize,

    /// Stereo frames written to the WAV
    pub audio_frames: usize,

    pub stats: TrackerStats,
}

/// Render `config.duration_secs` of audio driven by `tick`
///
/// Each tracker tick is followed by `samples_for_tick` audio frames rendered
/// from whatever the bridge holds at that point.
pub fn render_offline<S: Segmenter>(
    config: &RecordingConfig,
    synth_config: &SynthConfig,
    tick: &mut TrackerTick<S>,
) -> Result<OfflineSummary> {
    config.validate().map_err(ThereminError::InvalidConfig)?;
    synth_config.validate().map_err(ThereminError::InvalidConfig)?;
    fs::create_dir_all(&config.output_dir)?;

    let mut synth = WavetableSynth::new(synth_config.table_size);
    synth.prepare(config.sample_rate_hz as f64, tick.bridge().get())?;

    let spec = hound::WavSpec {
        channels: 2,
        sample_rate: config.sample_rate_hz,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(config.audio_path(), spec)?;

    let total_ticks = config.total_ticks();
    let mut left = vec![0.0f32; BLOCK_SIZE];
    let mut right = vec![0.0f32; BLOCK_SIZE];
    let mut audio_frames = 0;

    info!(
        "Rendering {} ticks ({:.1} frames/tick) to {:?}",
        total_ticks,
        config.sample_rate_hz as f64 / config.fps as f64,
        config.audio_path()
    );

    for index in 0..total_ticks {
        tick.tick();
        let params = tick.bridge().get();

        let mut remaining = config.samples_for_tick(index);
        while remaining > 0 {
            let n = remaining.min(BLOCK_SIZE);
            synth.fill_block(params, &mut left[..n], &mut right[..n]);
            for i in 0..n {
                writer.write_sample(left[i])?;
                writer.write_sample(right[i])?;
            }
            remaining -= n;
            audio_frames += n;
        }
    }

    writer.finalize()?;
    synth.release();

    let stats = tick.stats();
    info!(
        "Offline render done: {} audio frames, {} gestures in {} processed frames",
        audio_frames, stats.gestures_detected, stats.frames_processed
    );

    Ok(OfflineSummary {
        ticks: total_ticks,
        audio_frames,
        stats,
    })
}
