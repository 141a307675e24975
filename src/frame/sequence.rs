//! Frame source reading a directory of still images in name order.

use std::fs;
use std::path::{Path, PathBuf};

use image::RgbImage;
use tracing::info;

use super::FrameSource;
use crate::error::{Result, ThereminError};

const EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// Replays recorded camera frames from disk
#[derive(Debug)]
pub struct ImageSequenceSource {
    paths: Vec<PathBuf>,
    cursor: usize,
    looping: bool,
    dimensions: Option<(u32, u32)>,
}

impl ImageSequenceSource {
    /// Collect image files from `dir`, sorted by file name
    pub fn open(dir: impl AsRef<Path>, looping: bool) -> Result<Self> {
        let dir = dir.as_ref();
        let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
            })
            .collect();
        paths.sort();

        if paths.is_empty() {
            return Err(ThereminError::FrameUnavailable(format!(
                "No image frames in {:?}",
                dir
            )));
        }

        info!("Frame sequence: {} images from {:?}", paths.len(), dir);

        let dimensions = image::image_dimensions(&paths[0]).ok();

        Ok(Self {
            paths,
            cursor: 0,
            looping,
            dimensions,
        })
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl FrameSource for ImageSequenceSource {
    fn next_frame(&mut self) -> Result<RgbImage> {
        if self.cursor >= self.paths.len() {
            if !self.looping {
                return Err(ThereminError::FrameUnavailable(
                    "Frame sequence exhausted".to_string(),
                ));
            }
            self.cursor = 0;
        }

        let path = &self.paths[self.cursor];
        self.cursor += 1;

        let frame = image::open(path)
            .map_err(|e| ThereminError::FrameUnavailable(format!("{:?}: {}", path, e)))?
            .to_rgb8();
        Ok(frame)
    }

    fn dimensions(&self) -> Option<(u32, u32)> {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_frames(dir: &Path, count: u8) {
        for i in 0..count {
            let img = RgbImage::from_pixel(8, 6, image::Rgb([i * 10, 0, 0]));
            img.save(dir.join(format!("f{:02}.png", i))).unwrap();
        }
        fs::write(dir.join("notes.txt"), "not a frame").unwrap();
    }

    #[test]
    fn test_reads_in_order_then_exhausts() {
        let dir = tempfile::tempdir().unwrap();
        write_frames(dir.path(), 3);

        let mut source = ImageSequenceSource::open(dir.path(), false).unwrap();
        assert_eq!(source.len(), 3);
        assert_eq!(source.dimensions(), Some((8, 6)));

        for i in 0..3u8 {
            let frame = source.next_frame().unwrap();
            assert_eq!(frame.get_pixel(0, 0)[0], i * 10);
        }
        assert!(matches!(
            source.next_frame(),
            Err(ThereminError::FrameUnavailable(_))
        ));
    }

    #[test]
    fn test_looping_wraps() {
        let dir = tempfile::tempdir().unwrap();
        write_frames(dir.path(), 2);

        let mut source = ImageSequenceSource::open(dir.path(), true).unwrap();
        for _ in 0..2 {
            source.next_frame().unwrap();
        }
        assert_eq!(source.next_frame().unwrap().get_pixel(0, 0)[0], 0);
    }

    #[test]
    fn test_empty_directory_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ImageSequenceSource::open(dir.path(), false).is_err());
    }
}
