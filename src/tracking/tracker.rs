//! Gesture tracker: one raw frame in, optional (pitch, volume) out.

use image::RgbImage;
use tracing::debug;

use super::annotate::annotate;
use super::contour::{find_external_contours, largest_contour, Point};
use super::preprocess::{crop_roi, gaussian_blur, mirror, to_grayscale};
use super::segmenter::{RunningGaussianSegmenter, Segmenter};
use crate::bridge::GestureParameters;
use crate::error::{Result, ThereminError};
use crate::frame::AnnotatedFrame;
use crate::params::{PitchRange, Roi, TrackerConfig};
use crate::pitch::map_fingertip;

/// Result of one tracker tick
#[derive(Debug, Clone)]
pub struct TrackOutcome {
    /// New parameters, or `None` to leave the bridge untouched
    pub parameters: Option<GestureParameters>,

    /// Fingertip in ROI-local coordinates
    pub fingertip: Option<Point>,

    /// Foreground pixel count in the mask
    pub foreground_pixels: usize,

    /// External contours found this tick
    pub contour_count: usize,

    /// Mirrored frame with overlays
    pub display: AnnotatedFrame,
}

/// Background-subtraction fingertip tracker
pub struct GestureTracker<S: Segmenter = RunningGaussianSegmenter> {
    config: TrackerConfig,
    pitch_range: PitchRange,
    segmenter: S,
    frames_processed: u64,
}

impl GestureTracker<RunningGaussianSegmenter> {
    /// Tracker with the adaptive Gaussian background model from `config`
    pub fn with_default_segmenter(config: TrackerConfig, pitch_range: PitchRange) -> Result<Self> {
        let segmenter = RunningGaussianSegmenter::new(config.background.clone());
        Self::new(config, pitch_range, segmenter)
    }
}

impl<S: Segmenter> GestureTracker<S> {
    pub fn new(config: TrackerConfig, pitch_range: PitchRange, segmenter: S) -> Result<Self> {
        config.validate().map_err(ThereminError::InvalidConfig)?;
        pitch_range.validate().map_err(ThereminError::InvalidConfig)?;
        Ok(Self {
            config,
            pitch_range,
            segmenter,
            frames_processed: 0,
        })
    }

    /// Run the full pipeline on one raw camera frame
    ///
    /// An ROI that does not fit the frame is reported before the background
    /// model is touched.
    pub fn process(&mut self, raw: &RgbImage) -> Result<TrackOutcome> {
        let roi = self.config.roi;
        let mirrored = mirror(raw);
        let region = crop_roi(&mirrored, &roi)?;

        let gray = to_grayscale(&region);
        let blurred = gaussian_blur(&gray, self.config.blur_kernel_size);
        let mask = self.segmenter.apply(&blurred);
        self.frames_processed += 1;

        let contours = find_external_contours(&mask);
        let largest = largest_contour(&contours);
        let fingertip = largest.and_then(|c| c.topmost());

        let parameters = match fingertip {
            Some((x, y)) if !self.in_warmup() => Some(map_fingertip(
                (x.max(0) as u32, y.max(0) as u32),
                &roi,
                &self.pitch_range,
            )),
            _ => None,
        };

        if let (Some(tip), Some(params)) = (fingertip, parameters) {
            debug!(
                "Fingertip at {:?} (frame {:?}) -> {:.1} Hz, volume {:.2}",
                tip,
                roi.to_frame((tip.0.max(0) as u32, tip.1.max(0) as u32)),
                params.pitch_hz,
                params.volume
            );
        }

        let display = annotate(mirrored, &roi, Some(&mask), largest, fingertip, parameters);

        Ok(TrackOutcome {
            parameters,
            fingertip,
            foreground_pixels: mask.count(),
            contour_count: contours.len(),
            display,
        })
    }

    /// Move the ROI; the background model starts over
    pub fn set_roi(&mut self, roi: Roi) -> Result<()> {
        let mut config = self.config.clone();
        config.roi = roi;
        config.validate().map_err(ThereminError::InvalidConfig)?;
        self.config = config;
        self.reset();
        Ok(())
    }

    /// Drop the background model and warm-up progress
    pub fn reset(&mut self) {
        self.segmenter.reset();
        self.frames_processed = 0;
    }

    /// Still feeding the background model without emitting gestures
    pub fn in_warmup(&self) -> bool {
        self.frames_processed <= self.config.warmup_frames as u64
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn segmenter(&self) -> &S {
        &self.segmenter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::ForegroundMask;
    use image::{GrayImage, Rgb};
    use std::collections::VecDeque;

    /// Returns scripted masks regardless of input
    struct ScriptedSegmenter {
        masks: VecDeque<ForegroundMask>,
        resets: usize,
    }

    impl Segmenter for ScriptedSegmenter {
        fn apply(&mut self, gray: &GrayImage) -> ForegroundMask {
            self.masks
                .pop_front()
                .unwrap_or_else(|| ForegroundMask::new(gray.width(), gray.height()))
        }

        fn reset(&mut self) {
            self.resets += 1;
        }
    }

    fn config(roi: Roi) -> TrackerConfig {
        TrackerConfig {
            roi,
            blur_kernel_size: 3,
            ..TrackerConfig::default()
        }
    }

    fn finger_mask(width: u32, height: u32, tip: (u32, u32)) -> ForegroundMask {
        ForegroundMask::from_fn(width, height, |x, y| {
            x >= tip.0 && x < tip.0 + 5 && y >= tip.1
        })
    }

    fn tracker_with(roi: Roi, masks: Vec<ForegroundMask>) -> GestureTracker<ScriptedSegmenter> {
        let segmenter = ScriptedSegmenter {
            masks: masks.into(),
            resets: 0,
        };
        GestureTracker::new(config(roi), PitchRange::default(), segmenter).unwrap()
    }

    #[test]
    fn test_centre_fingertip_maps_to_one_octave() {
        let roi = Roi::new(0, 0, 300, 300);
        let mut tracker = tracker_with(roi, vec![finger_mask(300, 300, (150, 150))]);

        let outcome = tracker.process(&RgbImage::new(300, 300)).unwrap();

        assert_eq!(outcome.fingertip, Some((150, 150)));
        let params = outcome.parameters.unwrap();
        assert!((params.pitch_hz - 440.0).abs() < 1e-2);
        assert!((params.volume - 0.5).abs() < 1e-6);
        assert_eq!(outcome.contour_count, 1);
    }

    #[test]
    fn test_empty_mask_yields_no_parameters() {
        let roi = Roi::new(10, 10, 50, 50);
        let mut tracker = tracker_with(roi, vec![]);
        let outcome = tracker.process(&RgbImage::new(100, 100)).unwrap();
        assert!(outcome.parameters.is_none());
        assert!(outcome.fingertip.is_none());
        assert_eq!(outcome.contour_count, 0);
        assert_eq!(outcome.display.caption, "no gesture");
    }

    #[test]
    fn test_largest_contour_wins() {
        let roi = Roi::new(0, 0, 100, 100);
        let mask = ForegroundMask::from_fn(100, 100, |x, y| {
            // small blob high up, big blob lower
            (x < 3 && y < 3) || (x >= 50 && x < 80 && y >= 40)
        });
        let mut tracker = tracker_with(roi, vec![mask]);
        let outcome = tracker.process(&RgbImage::new(100, 100)).unwrap();
        assert_eq!(outcome.fingertip, Some((50, 40)));
        assert_eq!(outcome.contour_count, 2);
    }

    #[test]
    fn test_roi_outside_frame_is_error() {
        let roi = Roi::new(300, 50, 300, 300);
        let mut tracker = tracker_with(roi, vec![]);
        assert!(matches!(
            tracker.process(&RgbImage::new(320, 240)),
            Err(ThereminError::RoiOutOfBounds { .. })
        ));
        assert_eq!(tracker.frames_processed(), 0);
    }

    #[test]
    fn test_warmup_suppresses_parameters() {
        let roi = Roi::new(0, 0, 40, 40);
        let masks = (0..3).map(|_| finger_mask(40, 40, (10, 10))).collect();
        let segmenter = ScriptedSegmenter {
            masks,
            resets: 0,
        };
        let mut cfg = config(roi);
        cfg.warmup_frames = 2;
        let mut tracker = GestureTracker::new(cfg, PitchRange::default(), segmenter).unwrap();

        let frame = RgbImage::new(40, 40);
        assert!(tracker.process(&frame).unwrap().parameters.is_none());
        assert!(tracker.process(&frame).unwrap().parameters.is_none());
        assert!(tracker.process(&frame).unwrap().parameters.is_some());
    }

    #[test]
    fn test_set_roi_resets_model() {
        let mut tracker = tracker_with(Roi::new(0, 0, 40, 40), vec![]);
        tracker.process(&RgbImage::new(40, 40)).unwrap();
        tracker.set_roi(Roi::new(5, 5, 20, 20)).unwrap();
        assert_eq!(tracker.segmenter().resets, 1);
        assert_eq!(tracker.frames_processed(), 0);
        assert!(tracker.set_roi(Roi::new(0, 0, 0, 20)).is_err());
    }

    #[test]
    fn test_real_segmenter_finds_moving_finger() {
        let roi = Roi::new(20, 10, 80, 80);
        let mut tracker =
            GestureTracker::with_default_segmenter(config(roi), PitchRange::default()).unwrap();

        let background = RgbImage::from_pixel(120, 100, Rgb([40, 40, 40]));
        for _ in 0..30 {
            let outcome = tracker.process(&background).unwrap();
            assert!(outcome.parameters.is_none());
        }

        // Bright bar in mirrored ROI column 40..46 from local row 30 down
        let mut frame = background.clone();
        for mirrored_x in 60..66u32 {
            for y in 40..100 {
                frame.put_pixel(119 - mirrored_x, y, Rgb([230, 230, 230]));
            }
        }

        let outcome = tracker.process(&frame).unwrap();
        let (x, y) = outcome.fingertip.unwrap();
        // Blur spreads the edge by at most the kernel radius
        assert!((39..=41).contains(&x), "x = {}", x);
        assert!((29..=31).contains(&y), "y = {}", y);
        assert!(outcome.parameters.is_some());
    }
}
