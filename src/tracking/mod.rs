//! Per-frame foreground tracking and fingertip estimation.
//!
//! Pipeline: mirror -> crop ROI -> grayscale -> Gaussian blur -> background
//! subtraction -> external contours -> largest contour -> topmost point ->
//! (pitch, volume).

mod annotate;
mod contour;
mod mask;
pub mod preprocess;
mod segmenter;
mod tracker;

pub use annotate::annotate;
pub use contour::{find_external_contours, largest_contour, Contour, Point};
pub use mask::ForegroundMask;
pub use segmenter::{RunningGaussianSegmenter, Segmenter};
pub use tracker::{GestureTracker, TrackOutcome};
