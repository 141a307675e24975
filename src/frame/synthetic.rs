//! Deterministic frame generator standing in for a webcam.
//!
//! Renders a textured static scene and, after an optional warm-up of empty
//! frames, a finger-shaped bar rising from the bottom of the frame whose tip
//! follows a script. Tip coordinates are ROI-local in the *mirrored* frame,
//! i.e. what the tracker sees after flipping.

use image::{Rgb, RgbImage};

use super::FrameSource;
use crate::error::{Result, ThereminError};
use crate::params::Roi;

const SKIN: Rgb<u8> = Rgb([224, 172, 140]);

/// Where the fingertip goes over time
#[derive(Debug, Clone, PartialEq)]
pub enum SyntheticScript {
    /// Scene only, no hand
    Empty,

    /// Tip held at a fixed ROI-local point
    Hold { tip: (u32, u32) },

    /// Tip traces a Lissajous figure over the ROI, one x cycle per `period_frames`
    Sweep { period_frames: u32 },
}

/// Synthetic camera
#[derive(Debug, Clone)]
pub struct SyntheticHandSource {
    width: u32,
    height: u32,
    roi: Roi,
    script: SyntheticScript,
    warmup_frames: u32,
    drop_every: Option<u32>,
    finger_width: u32,
    background: RgbImage,
    frame_index: u32,
}

impl SyntheticHandSource {
    pub fn new(width: u32, height: u32, roi: Roi, script: SyntheticScript) -> Self {
        Self {
            width,
            height,
            roi,
            script,
            warmup_frames: 0,
            drop_every: None,
            finger_width: (roi.width / 12).max(3),
            background: scene(width, height),
            frame_index: 0,
        }
    }

    /// Emit `frames` empty-scene frames before the hand appears
    pub fn with_warmup(mut self, frames: u32) -> Self {
        self.warmup_frames = frames;
        self
    }

    /// Report every `n`th frame as unavailable, simulating a flaky camera
    pub fn with_dropouts(mut self, n: u32) -> Self {
        self.drop_every = (n > 0).then_some(n);
        self
    }

    /// ROI-local tip position for a given frame, if a hand is shown
    pub fn tip_at(&self, frame_index: u32) -> Option<(u32, u32)> {
        if frame_index < self.warmup_frames {
            return None;
        }
        let t = frame_index - self.warmup_frames;
        match &self.script {
            SyntheticScript::Empty => None,
            SyntheticScript::Hold { tip } => Some(*tip),
            SyntheticScript::Sweep { period_frames } => {
                let period = (*period_frames).max(1) as f32;
                let phase = t as f32 / period * std::f32::consts::TAU;
                let margin = self.finger_width as f32;
                let span_x = (self.roi.width as f32 - 2.0 * margin).max(0.0);
                let span_y = (self.roi.height as f32 - 2.0 * margin).max(0.0);
                let x = margin + span_x * 0.5 * (1.0 - phase.cos());
                let y = margin + span_y * 0.5 * (1.0 - (phase * 0.5).sin());
                Some((x as u32, y as u32))
            }
        }
    }

    fn render(&self, frame_index: u32) -> RgbImage {
        let mut frame = self.background.clone();
        if let Some(tip) = self.tip_at(frame_index) {
            self.draw_finger(&mut frame, tip);
        }
        frame
    }

    fn draw_finger(&self, frame: &mut RgbImage, tip: (u32, u32)) {
        let (tip_x, tip_y) = self.roi.to_frame(tip);
        let half = self.finger_width / 2;
        let left = tip_x.saturating_sub(half);
        let right = (tip_x + half).min(self.width.saturating_sub(1));

        for mirrored_x in left..=right {
            // Undo the tracker's horizontal flip
            let raw_x = self.width - 1 - mirrored_x;
            for y in tip_y.min(self.height)..self.height {
                frame.put_pixel(raw_x, y, SKIN);
            }
        }
    }
}

impl FrameSource for SyntheticHandSource {
    fn next_frame(&mut self) -> Result<RgbImage> {
        let index = self.frame_index;
        self.frame_index += 1;

        if let Some(n) = self.drop_every {
            if (index + 1) % n == 0 {
                return Err(ThereminError::FrameUnavailable(format!(
                    "Synthetic dropout at frame {}",
                    index
                )));
            }
        }

        Ok(self.render(index))
    }

    fn dimensions(&self) -> Option<(u32, u32)> {
        Some((self.width, self.height))
    }
}

/// Low-contrast static texture so the scene is not perfectly flat
fn scene(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let v = 50 + ((x * 7 + y * 13) % 23) as u8;
        Rgb([v, v + 10, v + 20])
    })
}
