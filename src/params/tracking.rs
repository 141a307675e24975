//! Gesture tracking parameters: ROI, blur and background model tuning.

/// Fixed axis-aligned region of interest inside the mirrored frame (pixels)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Roi {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Default for Roi {
    fn default() -> Self {
        // Right half of a 640x480 webcam frame, top aligned
        Self {
            x: 300,
            y: 50,
            width: 300,
            height: 300,
        }
    }
}

impl Roi {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether the ROI lies fully inside a frame of the given size
    pub fn fits_within(&self, frame_width: u32, frame_height: u32) -> bool {
        self.width > 0
            && self.height > 0
            && self.x.checked_add(self.width).is_some_and(|r| r <= frame_width)
            && self.y.checked_add(self.height).is_some_and(|b| b <= frame_height)
    }

    /// Map an ROI-local point to full-frame coordinates
    pub fn to_frame(&self, local: (u32, u32)) -> (u32, u32) {
        (local.0 + self.x, local.1 + self.y)
    }
}

/// Adaptive background model constants
///
/// These change convergence time and sensitivity; exposed as configuration
/// rather than baked in.
#[derive(Debug, Clone)]
pub struct BackgroundConfig {
    /// Frames of history; the learning rate settles at 1/history
    pub history_frames: u32,

    /// Squared-distance threshold in units of per-pixel variance
    pub var_threshold: f32,

    /// Variance assigned to a freshly initialised pixel (intensity²)
    pub var_init: f32,

    /// Lower variance clamp (intensity²)
    pub var_min: f32,

    /// Upper variance clamp (intensity²)
    pub var_max: f32,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            history_frames: 2500,
            var_threshold: 10.0,
            var_init: 15.0,
            var_min: 4.0,
            var_max: 75.0,
        }
    }
}

/// Gesture tracker configuration
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Detection region inside the mirrored frame
    pub roi: Roi,

    /// Gaussian blur kernel side length (odd, pixels)
    pub blur_kernel_size: u32,

    /// Background subtraction tuning
    pub background: BackgroundConfig,

    /// Frames fed to the background model before gestures are emitted
    pub warmup_frames: u32,

    /// Tracker tick period (milliseconds), 33 = ~30 Hz
    pub tick_interval_ms: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            roi: Roi::default(),
            blur_kernel_size: 23,
            background: BackgroundConfig::default(),
            warmup_frames: 0,
            tick_interval_ms: 33,
        }
    }
}

impl TrackerConfig {
    /// Validate configuration (kernel odd, ROI non-empty, etc.)
    pub fn validate(&self) -> Result<(), String> {
        if self.blur_kernel_size == 0 || self.blur_kernel_size % 2 == 0 {
            return Err(format!(
                "Blur kernel size must be odd, got {}",
                self.blur_kernel_size
            ));
        }
        if self.roi.width == 0 || self.roi.height == 0 {
            return Err("ROI must have non-zero width and height".to_string());
        }
        if self.background.history_frames == 0 {
            return Err("Background history must be > 0 frames".to_string());
        }
        if self.background.var_threshold.is_nan() || self.background.var_threshold <= 0.0 {
            return Err("Background variance threshold must be > 0".to_string());
        }
        if self.background.var_min > self.background.var_max {
            return Err("Background var_min must not exceed var_max".to_string());
        }
        if self.tick_interval_ms == 0 {
            return Err("Tick interval must be > 0 ms".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roi_fits_within() {
        let roi = Roi::new(300, 50, 300, 300);
        assert!(roi.fits_within(640, 480));
        assert!(roi.fits_within(600, 350));
        assert!(!roi.fits_within(599, 350));
        assert!(!Roi::new(0, 0, 0, 10).fits_within(640, 480));
        assert!(!Roi::new(u32::MAX, 0, 2, 2).fits_within(640, 480));
    }

    #[test]
    fn test_roi_to_frame() {
        let roi = Roi::new(300, 50, 300, 300);
        assert_eq!(roi.to_frame((150, 150)), (450, 200));
    }

    #[test]
    fn test_validate_rejects_even_kernel() {
        let mut config = TrackerConfig::default();
        assert!(config.validate().is_ok());
        config.blur_kernel_size = 22;
        assert!(config.validate().is_err());
    }
}
