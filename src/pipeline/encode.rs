//! Image encoding: `DynamicImage` → base64 JPEG wrapped in `ImageData`.
//!
//! Vision endpoints accept images as base64 `data:` URLs embedded in the JSON
//! body. JPEG keeps request bodies small enough for the per-request upload
//! limits of hosted vision models; the alpha channel pdfium produces is
//! dropped first because JPEG cannot carry it.

use crate::provider::ImageData;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::DynamicImage;
use std::io::Cursor;
use tracing::debug;

/// Encode a rasterised page as a base64 JPEG ready for the vision API.
pub fn encode_page(img: &DynamicImage) -> Result<ImageData, image::ImageError> {
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let mut buf = Vec::new();
    rgb.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Jpeg)?;

    let b64 = STANDARD.encode(&buf);
    debug!("Encoded image → {} bytes base64", b64.len());

    Ok(ImageData::new(b64, "image/jpeg"))
}
