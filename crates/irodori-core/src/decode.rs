//! Image decoding and pixel quantization.
//!
//! Accepts raw image bytes (PNG, JPEG, BMP, WebP) and produces the RGBA
//! frame the scan consumes, plus the row-major quantized key sequence.
//!
//! This is the front door of the core: raw bytes in, `RgbaImage` out.

use image::RgbaImage;

use crate::types::{ColorKey, SceneError};

/// Decode raw image bytes into an RGBA frame.
///
/// Supports whatever the `image` crate can decode with the enabled
/// format features (PNG, JPEG, BMP, WebP).
///
/// # Errors
///
/// Returns [`SceneError::EmptyImage`] if `bytes` is empty.
/// Returns [`SceneError::ImageDecode`] if the format is unrecognized or
/// the data is corrupt.
#[must_use = "returns the decoded RGBA frame"]
pub fn decode_rgba(bytes: &[u8]) -> Result<RgbaImage, SceneError> {
    if bytes.is_empty() {
        return Err(SceneError::EmptyImage);
    }

    let img = image::load_from_memory(bytes)?;
    Ok(img.to_rgba8())
}

/// Quantize every pixel of a frame into color keys, in the image's
/// row-major storage order. The scan processes pixels in exactly this
/// order.
#[must_use]
pub fn frame_keys(image: &RgbaImage) -> Vec<ColorKey> {
    image.pixels().map(|p| ColorKey::from_rgba(*p)).collect()
}
