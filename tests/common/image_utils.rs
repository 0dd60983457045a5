//! Image comparison utilities for testing.
//!
//! Helpers for checking the PNGs written by texture export.

use image::{DynamicImage, GenericImageView, ImageError, ImageFormat};
use std::path::Path;

/// Maximum pixel difference for image comparison
pub const DEFAULT_PIXEL_DIFF: u8 = 1;

/// Load an image from a file
pub fn load_image(path: &Path) -> Result<DynamicImage, ImageError> {
    image::open(path)
}

/// Detect the format of an image file from its leading bytes
pub fn detect_file_format(path: &Path) -> Option<ImageFormat> {
    let bytes = std::fs::read(path).ok()?;
    image::guess_format(&bytes).ok()
}

/// Compare two images for approximate equality
///
/// # Returns
///
/// * `Ok(())` if every channel of every pixel is within `max_diff` (default: 1)
/// * `Err(String)` describing the first kind of mismatch otherwise
pub fn assert_images_approx_eq(
    actual: &DynamicImage,
    expected: &DynamicImage,
    max_diff: Option<u8>,
) -> Result<(), String> {
    assert_image_dimensions(actual, expected.width(), expected.height())?;

    let max_diff = max_diff.unwrap_or(DEFAULT_PIXEL_DIFF);
    let mut diff_count = 0;
    let mut max_observed_diff = 0u8;

    for (x, y, actual_pixel) in actual.pixels() {
        let expected_pixel = expected.get_pixel(x, y);
        for (a, e) in actual_pixel.0.iter().zip(expected_pixel.0.iter()) {
            let diff = a.abs_diff(*e);
            if diff > max_diff {
                diff_count += 1;
                max_observed_diff = max_observed_diff.max(diff);
            }
        }
    }

    if diff_count > 0 {
        return Err(format!(
            "Images differ in {} channels, max observed diff = {}",
            diff_count, max_observed_diff
        ));
    }

    Ok(())
}

/// Check if an image has the expected dimensions
pub fn assert_image_dimensions(
    image: &DynamicImage,
    expected_width: u32,
    expected_height: u32,
) -> Result<(), String> {
    let (actual_width, actual_height) = image.dimensions();

    if actual_width != expected_width || actual_height != expected_height {
        return Err(format!(
            "Image dimensions differ: actual = {}x{}, expected = {}x{}",
            actual_width, actual_height, expected_width, expected_height
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgba};

    #[test]
    fn test_assert_images_approx_eq() {
        let img1 = ImageBuffer::from_fn(3, 3, |x, y| Rgba([x as u8, y as u8, 100, 255]));
        let img2 = ImageBuffer::from_fn(3, 3, |x, y| {
            let blue = if x == 1 && y == 1 { 101 } else { 100 };
            Rgba([x as u8, y as u8, blue, 255])
        });

        let dyn_img1 = DynamicImage::ImageRgba8(img1);
        let dyn_img2 = DynamicImage::ImageRgba8(img2);

        assert!(assert_images_approx_eq(&dyn_img1, &dyn_img2, None).is_ok());
        assert!(assert_images_approx_eq(&dyn_img1, &dyn_img2, Some(0)).is_err());
    }

    #[test]
    fn test_assert_image_dimensions() {
        let img = DynamicImage::new_rgba8(10, 20);
        assert!(assert_image_dimensions(&img, 10, 20).is_ok());
        assert!(assert_image_dimensions(&img, 11, 20).is_err());
    }
}
