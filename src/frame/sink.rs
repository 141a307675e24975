//! Display sinks for annotated tracker output.

use std::fs;
use std::path::PathBuf;

use image::RgbImage;
use tracing::debug;

use crate::error::Result;

/// Tracker output for display: the mirrored frame with overlays plus a readout
#[derive(Debug, Clone)]
pub struct AnnotatedFrame {
    pub image: RgbImage,

    /// Textual pitch/volume readout, e.g. "pitch 440.0 Hz  volume 0.50"
    pub caption: String,
}

/// Consumer of annotated frames; purely downstream of the core
pub trait DisplaySink: Send {
    fn present(&mut self, frame: &AnnotatedFrame) -> Result<()>;
}

/// Discards frames
#[derive(Debug, Default)]
pub struct NullSink;

impl DisplaySink for NullSink {
    fn present(&mut self, _frame: &AnnotatedFrame) -> Result<()> {
        Ok(())
    }
}

/// Writes each frame as `frame_NNNNN.png` into a directory
#[derive(Debug)]
pub struct PngSequenceSink {
    dir: PathBuf,
    next_index: usize,
}

impl PngSequenceSink {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir, next_index: 0 })
    }

    /// Number of frames written so far
    pub fn frames_written(&self) -> usize {
        self.next_index
    }
}

impl DisplaySink for PngSequenceSink {
    fn present(&mut self, frame: &AnnotatedFrame) -> Result<()> {
        let path = self.dir.join(format!("frame_{:05}.png", self.next_index));
        frame.image.save(&path)?;
        debug!("Saved {:?}: {}", path, frame.caption);
        self.next_index += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_sink_numbers_frames() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = PngSequenceSink::new(dir.path().join("frames")).unwrap();
        let frame = AnnotatedFrame {
            image: RgbImage::new(4, 4),
            caption: String::new(),
        };
        sink.present(&frame).unwrap();
        sink.present(&frame).unwrap();

        assert_eq!(sink.frames_written(), 2);
        assert!(dir.path().join("frames/frame_00001.png").exists());
    }
}
