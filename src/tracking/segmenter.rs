//! Background subtraction.

use image::GrayImage;

use super::mask::ForegroundMask;
use crate::params::BackgroundConfig;

/// Turns a preprocessed grayscale ROI into a foreground mask
///
/// Implementations carry their own background state; the tracker owns the
/// segmenter exclusively, so no synchronisation is needed.
pub trait Segmenter: Send {
    /// Classify `gray` against the model, then fold it into the model
    fn apply(&mut self, gray: &GrayImage) -> ForegroundMask;

    /// Forget everything learned (session end or ROI change)
    fn reset(&mut self);
}

/// Single adaptive Gaussian per pixel
///
/// The first frame seeds the mean. Afterwards each pixel is foreground when
/// its squared distance from the mean exceeds `var_threshold * variance`,
/// and mean/variance move toward the new sample at rate
/// `1 / min(2 * frames_seen, history_frames)`.
#[derive(Debug, Clone)]
pub struct RunningGaussianSegmenter {
    config: BackgroundConfig,
    width: u32,
    height: u32,
    mean: Vec<f32>,
    variance: Vec<f32>,
    frames_seen: u32,
}

impl RunningGaussianSegmenter {
    pub fn new(config: BackgroundConfig) -> Self {
        Self {
            config,
            width: 0,
            height: 0,
            mean: Vec::new(),
            variance: Vec::new(),
            frames_seen: 0,
        }
    }

    /// Frames folded into the model since the last reset
    pub fn frames_seen(&self) -> u32 {
        self.frames_seen
    }

    pub fn learning_rate(&self) -> f32 {
        let n = self
            .frames_seen
            .saturating_mul(2)
            .min(self.config.history_frames)
            .max(1);
        1.0 / n as f32
    }

    fn seed(&mut self, gray: &GrayImage) {
        self.width = gray.width();
        self.height = gray.height();
        self.mean = gray.pixels().map(|p| p[0] as f32).collect();
        self.variance = vec![self.config.var_init; self.mean.len()];
        self.frames_seen = 1;
    }
}

impl Segmenter for RunningGaussianSegmenter {
    fn apply(&mut self, gray: &GrayImage) -> ForegroundMask {
        let (width, height) = gray.dimensions();

        // A size change means a new ROI: start over
        if self.frames_seen == 0 || width != self.width || height != self.height {
            self.seed(gray);
            return ForegroundMask::new(width, height);
        }

        let alpha = self.learning_rate();
        let BackgroundConfig {
            var_threshold,
            var_min,
            var_max,
            ..
        } = self.config;

        let mut mask = ForegroundMask::new(width, height);
        for (i, pixel) in gray.pixels().enumerate() {
            let value = pixel[0] as f32;
            let diff = value - self.mean[i];
            let dist2 = diff * diff;

            if dist2 > var_threshold * self.variance[i] {
                mask.set(i as u32 % width, i as u32 / width, true);
            }

            self.mean[i] += alpha * diff;
            self.variance[i] = (self.variance[i] + alpha * (dist2 - self.variance[i]))
                .clamp(var_min, var_max);
        }

        self.frames_seen = self.frames_seen.saturating_add(1);
        mask
    }

    fn reset(&mut self) {
        self.mean.clear();
        self.variance.clear();
        self.frames_seen = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn scene() -> GrayImage {
        GrayImage::from_fn(32, 32, |x, y| Luma([60 + ((x + 3 * y) % 9) as u8]))
    }

    fn with_blob(base: &GrayImage) -> GrayImage {
        let mut img = base.clone();
        for y in 10..20 {
            for x in 12..18 {
                img.put_pixel(x, y, Luma([220]));
            }
        }
        img
    }

    #[test]
    fn test_static_scene_has_empty_mask() {
        let mut seg = RunningGaussianSegmenter::new(BackgroundConfig::default());
        let frame = scene();
        for _ in 0..200 {
            assert!(seg.apply(&frame).is_empty());
        }
        assert_eq!(seg.frames_seen(), 200);
    }

    #[test]
    fn test_new_object_is_foreground() {
        let mut seg = RunningGaussianSegmenter::new(BackgroundConfig::default());
        let frame = scene();
        for _ in 0..50 {
            seg.apply(&frame);
        }
        let mask = seg.apply(&with_blob(&frame));
        assert_eq!(mask.count(), 60);
        assert!(mask.get(12, 10) && mask.get(17, 19));
        assert!(!mask.get(11, 10));
    }

    #[test]
    fn test_learning_rate_schedule() {
        let config = BackgroundConfig {
            history_frames: 100,
            ..BackgroundConfig::default()
        };
        let mut seg = RunningGaussianSegmenter::new(config);
        let frame = scene();
        seg.apply(&frame);
        assert!((seg.learning_rate() - 0.5).abs() < 1e-6);
        for _ in 0..99 {
            seg.apply(&frame);
        }
        assert!((seg.learning_rate() - 0.01).abs() < 1e-6);
    }

    #[test]
    fn test_object_left_in_place_is_absorbed() {
        let config = BackgroundConfig {
            history_frames: 20,
            ..BackgroundConfig::default()
        };
        let mut seg = RunningGaussianSegmenter::new(config);
        let frame = scene();
        for _ in 0..20 {
            seg.apply(&frame);
        }
        let moved = with_blob(&frame);
        assert!(!seg.apply(&moved).is_empty());
        for _ in 0..500 {
            seg.apply(&moved);
        }
        assert!(seg.apply(&moved).is_empty());
    }

    #[test]
    fn test_reset_and_resize_reseed() {
        let mut seg = RunningGaussianSegmenter::new(BackgroundConfig::default());
        seg.apply(&scene());
        seg.reset();
        assert_eq!(seg.frames_seen(), 0);
        assert!(seg.apply(&with_blob(&scene())).is_empty());

        let small = GrayImage::from_pixel(8, 8, Luma([10]));
        let mask = seg.apply(&small);
        assert_eq!((mask.width(), mask.height()), (8, 8));
        assert!(mask.is_empty());
    }
}
