//! Precomputed single-cycle lookup table.

use std::f64::consts::PI;

/// Immutable single-cycle waveform
#[derive(Debug, Clone, PartialEq)]
pub struct Wavetable {
    samples: Vec<f32>,
}

impl Wavetable {
    /// One cycle of a sine wave over `len` entries
    pub fn sine(len: usize) -> Self {
        let samples = (0..len)
            .map(|i| (2.0 * PI * i as f64 / len as f64).sin() as f32)
            .collect();
        Self { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample at `index`, clamped to the last entry
    #[inline]
    pub fn at(&self, index: usize) -> f32 {
        match self.samples.get(index) {
            Some(sample) => *sample,
            None => self.samples.last().copied().unwrap_or(0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sine_quadrants() {
        let table = Wavetable::sine(1024);
        assert_eq!(table.len(), 1024);
        assert!(table.at(0).abs() < 1e-6);
        assert!((table.at(256) - 1.0).abs() < 1e-6);
        assert!(table.at(512).abs() < 1e-6);
        assert!((table.at(768) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_out_of_range_index_clamps() {
        let table = Wavetable::sine(8);
        assert_eq!(table.at(100), table.at(7));
        assert_eq!(Wavetable::sine(0).at(3), 0.0);
    }
}
