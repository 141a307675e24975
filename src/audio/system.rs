//! Audio device output driving the wavetable synthesizer.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};
use tracing::{error, info};

use super::synthesis::WavetableSynth;
use crate::bridge::{GestureParameters, ParameterBridge};
use crate::error::{Result, ThereminError};
use crate::params::SynthConfig;

/// Frames rendered per conversion pass in the stream callback
const SCRATCH_FRAMES: usize = 1024;

/// Audio system owning the output stream
pub struct AudioSystem {
    /// Audio output stream (kept alive)
    stream: cpal::Stream,

    /// Device sample rate the synth was prepared with (Hz)
    sample_rate_hz: u32,

    /// Output channel count
    channels: u16,
}

impl AudioSystem {
    /// Open the default output device and start rendering from `bridge`
    pub fn new(config: &SynthConfig, bridge: &ParameterBridge) -> Result<Self> {
        config.validate().map_err(ThereminError::InvalidConfig)?;

        // Setup audio output device
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(ThereminError::NoOutputDevice)?;

        let supported = device
            .default_output_config()
            .map_err(|e| ThereminError::Audio(format!("Failed to get audio config: {}", e)))?;

        let sample_format = supported.sample_format();
        let sample_rate_hz = supported.sample_rate().0;
        let channels = supported.channels();

        info!(
            "Audio: {} @ {}Hz, {} channels, {:?}",
            device.name().unwrap_or_else(|_| "Unknown".to_string()),
            sample_rate_hz,
            channels,
            sample_format
        );

        // Preparation happens here so an invalid rate aborts startup, not rendering
        let mut synth = WavetableSynth::new(config.table_size);
        synth.prepare(sample_rate_hz as f64, bridge.get())?;

        let stream_config: cpal::StreamConfig = supported.into();
        let stream = match sample_format {
            cpal::SampleFormat::F32 => build_stream::<f32>(&device, &stream_config, synth, bridge),
            cpal::SampleFormat::I16 => build_stream::<i16>(&device, &stream_config, synth, bridge),
            cpal::SampleFormat::U16 => build_stream::<u16>(&device, &stream_config, synth, bridge),
            other => {
                return Err(ThereminError::Audio(format!(
                    "Unsupported sample format {:?}",
                    other
                )))
            }
        }?;

        stream
            .play()
            .map_err(|e| ThereminError::Audio(format!("Failed to start audio stream: {}", e)))?;

        Ok(Self {
            stream,
            sample_rate_hz,
            channels,
        })
    }

    pub fn sample_rate_hz(&self) -> u32 {
        self.sample_rate_hz
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Pause and close the device; the stream is dropped on return
    pub fn shutdown(self) {
        if let Err(e) = self.stream.pause() {
            error!("Failed to pause audio stream: {}", e);
        }
        info!("Audio stream closed");
    }
}

/// Output stream in sample type `T`, fed by `synth` through a scratch buffer
fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut synth: WavetableSynth,
    bridge: &ParameterBridge,
) -> Result<cpal::Stream>
where
    T: SizedSample + FromSample<f32>,
{
    let mut reader = bridge.reader();
    let channels = config.channels.max(1) as usize;
    let mut scratch = vec![0.0f32; SCRATCH_FRAMES * channels];

    // The callback only reads the bridge and fills samples: no logging, no allocation
    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                let params = reader.snapshot();
                render_converted(&mut synth, params, &mut scratch, data, channels);
            },
            |err| error!("Audio stream error: {}", err),
            None,
        )
        .map_err(|e| ThereminError::Audio(format!("Failed to build audio stream: {}", e)))
}

/// Fill `data` in scratch-sized passes, converting each f32 sample to `T`
///
/// `scratch.len()` must be a whole number of frames.
fn render_converted<T>(
    synth: &mut WavetableSynth,
    params: GestureParameters,
    scratch: &mut [f32],
    data: &mut [T],
    channels: usize,
) where
    T: Sample + FromSample<f32>,
{
    for chunk in data.chunks_mut(scratch.len().max(1)) {
        let block = &mut scratch[..chunk.len()];
        synth.fill_interleaved(params, block, channels);
        for (out, &sample) in chunk.iter_mut().zip(block.iter()) {
            *out = T::from_sample(sample);
        }
    }
}
