//! PNG export of sampled textures.

use std::path::Path;

use image::{ImageBuffer, Rgba, RgbaImage};
use tracing::info;

use crate::error::Result;
use crate::texture::PixelBuffer;

fn to_byte(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Convert a float texture to 8-bit RGBA, row 0 at the top.
pub fn texture_to_image(buffer: &PixelBuffer) -> RgbaImage {
    ImageBuffer::from_fn(buffer.width(), buffer.height(), |x, y| {
        let [r, g, b, a] = buffer.pixel(x, y).unwrap_or_default();
        Rgba([to_byte(r), to_byte(g), to_byte(b), to_byte(a)])
    })
}

/// Like [`texture_to_image`], with the red channel copied into green and blue.
pub fn texture_to_grayscale_image(buffer: &PixelBuffer) -> RgbaImage {
    ImageBuffer::from_fn(buffer.width(), buffer.height(), |x, y| {
        let [r, _, _, a] = buffer.pixel(x, y).unwrap_or_default();
        let gray = to_byte(r);
        Rgba([gray, gray, gray, to_byte(a)])
    })
}

/// Write `buffer` as a PNG file.
pub fn save_png(buffer: &PixelBuffer, path: &Path, grayscale: bool) -> Result<()> {
    let img = if grayscale {
        texture_to_grayscale_image(buffer)
    } else {
        texture_to_image(buffer)
    };
    img.save_with_format(path, image::ImageFormat::Png)?;
    info!(
        path = %path.display(),
        width = buffer.width(),
        height = buffer.height(),
        grayscale = grayscale,
        "Texture written"
    );
    Ok(())
}
