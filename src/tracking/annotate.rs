//! Cosmetic overlays for the display copy of a processed frame.

use image::{Rgb, RgbImage};

use super::contour::{Contour, Point};
use super::mask::ForegroundMask;
use crate::bridge::GestureParameters;
use crate::frame::AnnotatedFrame;
use crate::params::Roi;

const ROI_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const CONTOUR_COLOR: Rgb<u8> = Rgb([0, 128, 255]);
const TIP_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

/// Fingertip marker radius (pixels)
const TIP_RADIUS: i64 = 5;

/// Draw ROI box, mask tint, contour outline and fingertip onto `frame`
///
/// `contour` and `fingertip` are ROI-local; they are shifted by the ROI
/// origin here.
pub fn annotate(
    mut frame: RgbImage,
    roi: &Roi,
    mask: Option<&ForegroundMask>,
    contour: Option<&Contour>,
    fingertip: Option<Point>,
    params: Option<GestureParameters>,
) -> AnnotatedFrame {
    if let Some(mask) = mask {
        tint_mask(&mut frame, roi, mask);
    }
    draw_rect(&mut frame, roi, ROI_COLOR);

    if let Some(contour) = contour {
        for &(x, y) in &contour.points {
            put(&mut frame, x as i64 + roi.x as i64, y as i64 + roi.y as i64, CONTOUR_COLOR);
        }
    }

    if let Some((x, y)) = fingertip {
        let (cx, cy) = (x as i64 + roi.x as i64, y as i64 + roi.y as i64);
        for dy in -TIP_RADIUS..=TIP_RADIUS {
            for dx in -TIP_RADIUS..=TIP_RADIUS {
                if dx * dx + dy * dy <= TIP_RADIUS * TIP_RADIUS {
                    put(&mut frame, cx + dx, cy + dy, TIP_COLOR);
                }
            }
        }
    }

    let caption = match params {
        Some(p) => format!("pitch {:.1} Hz  volume {:.2}", p.pitch_hz, p.volume),
        None => "no gesture".to_string(),
    };

    AnnotatedFrame {
        image: frame,
        caption,
    }
}

fn tint_mask(frame: &mut RgbImage, roi: &Roi, mask: &ForegroundMask) {
    for y in 0..mask.height() {
        for x in 0..mask.width() {
            if mask.get(x as i64, y as i64) {
                if let Some(pixel) = frame.get_pixel_mut_checked(x + roi.x, y + roi.y) {
                    pixel[0] = pixel[0] / 2 + 127;
                    pixel[1] = pixel[1] / 2 + 127;
                    pixel[2] = pixel[2] / 2 + 127;
                }
            }
        }
    }
}

fn draw_rect(frame: &mut RgbImage, roi: &Roi, color: Rgb<u8>) {
    let (x0, y0) = (roi.x as i64, roi.y as i64);
    let (x1, y1) = (x0 + roi.width as i64 - 1, y0 + roi.height as i64 - 1);
    for x in x0..=x1 {
        put(frame, x, y0, color);
        put(frame, x, y1, color);
    }
    for y in y0..=y1 {
        put(frame, x0, y, color);
        put(frame, x1, y, color);
    }
}

#[inline]
fn put(frame: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && x < frame.width() as i64 && y < frame.height() as i64 {
        frame.put_pixel(x as u32, y as u32, color);
    }
}
