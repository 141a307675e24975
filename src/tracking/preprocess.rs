//! Frame preparation ahead of segmentation.

use image::{imageops, GrayImage, RgbImage};

use crate::error::{Result, ThereminError};
use crate::params::Roi;

/// Flip horizontally so on-screen motion matches the user's own left/right
pub fn mirror(frame: &RgbImage) -> RgbImage {
    imageops::flip_horizontal(frame)
}

/// Copy the ROI out of `frame`; errors if the ROI does not fit
pub fn crop_roi(frame: &RgbImage, roi: &Roi) -> Result<RgbImage> {
    let (width, height) = frame.dimensions();
    if !roi.fits_within(width, height) {
        return Err(ThereminError::RoiOutOfBounds {
            roi_x: roi.x,
            roi_y: roi.y,
            roi_width: roi.width,
            roi_height: roi.height,
            frame_width: width,
            frame_height: height,
        });
    }
    Ok(imageops::crop_imm(frame, roi.x, roi.y, roi.width, roi.height).to_image())
}

pub fn to_grayscale(image: &RgbImage) -> GrayImage {
    imageops::grayscale(image)
}

/// Gaussian sigma for a kernel size when none is given explicitly
pub fn sigma_for_kernel(kernel_size: u32) -> f32 {
    0.3 * ((kernel_size as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Gaussian blur with the sigma a `kernel_size` square kernel implies
pub fn gaussian_blur(image: &GrayImage, kernel_size: u32) -> GrayImage {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 || kernel_size <= 1 {
        return image.clone();
    }
    imageops::blur(image, sigma_for_kernel(kernel_size))
}
