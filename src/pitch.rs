//! Fingertip position to (pitch, volume) mapping.
//!
//! Horizontal position is mapped exponentially across the pitch band
//! (equal temperament), vertical position linearly onto volume with
//! "higher on screen" being louder.

use crate::bridge::GestureParameters;
use crate::params::{PitchRange, Roi};

/// Pitch for an ROI-local x coordinate
///
/// # Arguments
/// * `x` - Fingertip x in ROI-local pixels, clamped to `[0, roi_width]`
/// * `roi_width` - ROI width in pixels (must be > 0)
/// * `range` - Pitch band spanning the ROI
pub fn pitch_for_x(x: f32, roi_width: u32, range: &PitchRange) -> f32 {
    if roi_width == 0 {
        return range.min_hz;
    }
    let width = roi_width as f32;
    let semitone_offset = (x.clamp(0.0, width) / width) * range.semitone_range();
    let pitch = range.min_hz * 2f32.powf(semitone_offset / 12.0);
    // x == width lands on max_hz up to rounding; keep it inside the band
    pitch.clamp(range.min_hz, range.max_hz)
}

/// Volume for an ROI-local y coordinate, 1.0 at the top edge and 0.0 at the bottom
pub fn volume_for_y(y: f32, roi_height: u32) -> f32 {
    if roi_height == 0 {
        return 0.0;
    }
    let height = roi_height as f32;
    1.0 - y.clamp(0.0, height) / height
}

/// Map an ROI-local fingertip to gesture parameters
pub fn map_fingertip(fingertip: (u32, u32), roi: &Roi, range: &PitchRange) -> GestureParameters {
    GestureParameters {
        pitch_hz: pitch_for_x(fingertip.0 as f32, roi.width, range),
        volume: volume_for_y(fingertip.1 as f32, roi.height),
    }
}
