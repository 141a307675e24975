//! Frame sources feeding the tracker and sinks receiving annotated frames.
//!
//! Both ends are external collaborators: the tracker only needs "next raw
//! color frame" and something to hand its annotated copy to.

mod sequence;
mod sink;
mod synthetic;

pub use sequence::ImageSequenceSource;
pub use sink::{AnnotatedFrame, DisplaySink, NullSink, PngSequenceSink};
pub use synthetic::{SyntheticHandSource, SyntheticScript};

use image::RgbImage;

use crate::error::Result;

/// Anything that can deliver color frames on demand
///
/// `Err(ThereminError::FrameUnavailable)` signals "no frame this tick"; the
/// caller retries on its next scheduled tick.
pub trait FrameSource: Send {
    fn next_frame(&mut self) -> Result<RgbImage>;

    /// Frame size if known ahead of the first frame
    fn dimensions(&self) -> Option<(u32, u32)>;
}
