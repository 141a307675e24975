//! Wavetable oscillator and the synthesizer lifecycle around it.

use std::sync::Arc;

use super::wavetable::Wavetable;
use crate::bridge::GestureParameters;
use crate::error::{Result, ThereminError};

/// Phase accumulator over a table of `table_len` entries
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oscillator {
    /// Read position, always in `[0, table_len)`
    pub phase: f64,

    /// Table entries advanced per output sample
    pub increment: f64,

    table_len: f64,
}

impl Oscillator {
    pub fn new(table_len: usize) -> Self {
        Self {
            phase: 0.0,
            increment: 0.0,
            table_len: table_len as f64,
        }
    }

    /// Derive the increment from pitch; a non-positive sample rate leaves it at 0
    pub fn set_increment(&mut self, pitch_hz: f64, sample_rate_hz: f64) {
        self.increment = if sample_rate_hz > 0.0 && pitch_hz.is_finite() {
            pitch_hz * self.table_len / sample_rate_hz
        } else {
            0.0
        };
    }

    /// Table index for the current phase, then advance one step
    #[inline]
    pub fn next_index(&mut self) -> usize {
        if self.table_len <= 0.0 {
            return 0;
        }
        let last = self.table_len as usize - 1;
        let index = (self.phase.floor() as usize).min(last);
        self.phase = (self.phase + self.increment).rem_euclid(self.table_len);
        // rem_euclid can round up to exactly table_len
        if self.phase >= self.table_len {
            self.phase = 0.0;
        }
        index
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}

/// Synthesizer lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthState {
    Uninitialized,
    Prepared,
    Rendering,
    Released,
}

/// Monophonic wavetable synthesizer writing identical left/right samples
#[derive(Debug, Clone)]
pub struct WavetableSynth {
    table_size: usize,
    table: Option<Arc<Wavetable>>,
    oscillator: Oscillator,
    sample_rate_hz: f64,
    state: SynthState,
}

impl WavetableSynth {
    pub fn new(table_size: usize) -> Self {
        Self {
            table_size,
            table: None,
            oscillator: Oscillator::new(table_size),
            sample_rate_hz: 0.0,
            state: SynthState::Uninitialized,
        }
    }

    /// Build the table for `sample_rate_hz`, reset phase and derive the first increment
    ///
    /// Allowed from any state; re-preparing after `release` restarts the session.
    pub fn prepare(&mut self, sample_rate_hz: f64, initial: GestureParameters) -> Result<()> {
        if !sample_rate_hz.is_finite() || sample_rate_hz <= 0.0 {
            return Err(ThereminError::InvalidSampleRate(sample_rate_hz));
        }
        if self.table_size == 0 {
            return Err(ThereminError::InvalidConfig(
                "Wavetable size must be > 0".to_string(),
            ));
        }

        // Rebuild only when the table is missing or its size changed
        let rebuild = self
            .table
            .as_ref()
            .map_or(true, |table| table.len() != self.table_size);
        if rebuild {
            self.table = Some(Arc::new(Wavetable::sine(self.table_size)));
        }

        self.sample_rate_hz = sample_rate_hz;
        self.oscillator = Oscillator::new(self.table_size);
        self.oscillator
            .set_increment(initial.pitch_hz as f64, self.sample_rate_hz);
        self.state = SynthState::Prepared;
        Ok(())
    }

    /// Render one block into separate channel buffers
    ///
    /// Writes `min(left.len(), right.len())` frames; silence unless prepared.
    pub fn fill_block(&mut self, params: GestureParameters, left: &mut [f32], right: &mut [f32]) {
        let frames = left.len().min(right.len());
        let Some(table) = self.active_table() else {
            left[..frames].fill(0.0);
            right[..frames].fill(0.0);
            return;
        };

        for (l, r) in left[..frames].iter_mut().zip(right[..frames].iter_mut()) {
            let sample = self.next_sample(&table, params);
            *l = sample;
            *r = sample;
        }
    }

    /// Render one block into an interleaved buffer with `channels` channels
    pub fn fill_interleaved(&mut self, params: GestureParameters, data: &mut [f32], channels: usize) {
        let Some(table) = self.active_table() else {
            data.fill(0.0);
            return;
        };
        let channels = channels.max(1);

        for frame in data.chunks_mut(channels) {
            let sample = self.next_sample(&table, params);
            frame.fill(sample);
        }
    }

    /// Stop rendering; `prepare` may be called again afterwards
    pub fn release(&mut self) {
        self.oscillator.reset();
        self.state = SynthState::Released;
    }

    pub fn state(&self) -> SynthState {
        self.state
    }

    pub fn sample_rate_hz(&self) -> f64 {
        self.sample_rate_hz
    }

    pub fn oscillator(&self) -> &Oscillator {
        &self.oscillator
    }

    pub fn wavetable(&self) -> Option<&Arc<Wavetable>> {
        self.table.as_ref()
    }

    fn active_table(&mut self) -> Option<Arc<Wavetable>> {
        match self.state {
            SynthState::Prepared | SynthState::Rendering => {
                self.state = SynthState::Rendering;
                self.table.clone()
            }
            SynthState::Uninitialized | SynthState::Released => None,
        }
    }

    #[inline]
    fn next_sample(&mut self, table: &Wavetable, params: GestureParameters) -> f32 {
        // Per-sample increment keeps the phase continuous across pitch changes
        self.oscillator
            .set_increment(params.pitch_hz as f64, self.sample_rate_hz);
        table.at(self.oscillator.next_index()) * params.volume
    }
}
