//! 1-D bilinear scanline resampler
//!
//! Alignment maps the first and last source samples onto the first and
//! last destination columns exactly, so resizing never shifts the row's
//! endpoints and a uniform row stays uniform at any width.

use crate::errors::{TransformError, TransformResult};

/// Resample a grayscale row to `dst_width` samples.
///
/// For destination column `j`, the source coordinate is
/// `x = j * (src_w - 1) / (dst_width - 1)` (0 when `dst_width == 1`); the
/// output is the linear blend of the two neighbouring samples, rounded to
/// the nearest byte. Stateless and deterministic: identical input always
/// yields identical output.
pub fn resize_row(src: &[u8], dst_width: usize) -> TransformResult<Vec<u8>> {
    if src.is_empty() {
        return Err(TransformError::invalid_dimension("source row is empty"));
    }
    if dst_width == 0 {
        return Err(TransformError::invalid_dimension("target width is zero"));
    }
    if src.len() == dst_width {
        return Ok(src.to_vec());
    }

    let src_w = src.len();
    let mut out = Vec::with_capacity(dst_width);
    for j in 0..dst_width {
        let x = if dst_width > 1 {
            j as f64 * (src_w - 1) as f64 / (dst_width - 1) as f64
        } else {
            0.0
        };
        let x0 = x.floor() as usize;
        let x1 = (x0 + 1).min(src_w - 1);
        let t = x - x0 as f64;
        let value = f64::from(src[x0]) * (1.0 - t) + f64::from(src[x1]) * t;
        out.push(value.round() as u8);
    }
    Ok(out)
}
