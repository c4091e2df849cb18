//! PNG encoding for colorized scanlines

use std::io::Cursor;

use image::{ImageFormat, RgbImage};

use crate::errors::{TransformError, TransformResult};

/// Encode a packed RGB buffer as a lossless PNG.
///
/// The buffer must hold exactly `width * height` RGB triples. Encoding is
/// deterministic: identical pixels yield byte-identical PNG output, which
/// the ingestion idempotence guarantee relies on.
pub fn encode_png(rgb: &[u8], width: u32, height: u32) -> TransformResult<Vec<u8>> {
    let expected = width as usize * height as usize * 3;
    if width == 0 || height == 0 || rgb.len() != expected {
        return Err(TransformError::invalid_dimension(format!(
            "RGB buffer of {} bytes does not describe a {width}x{height} image",
            rgb.len()
        )));
    }

    let img = RgbImage::from_raw(width, height, rgb.to_vec()).ok_or_else(|| {
        TransformError::invalid_dimension(format!("RGB buffer rejected for {width}x{height}"))
    })?;

    let mut png = Vec::new();
    img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(png)
}
