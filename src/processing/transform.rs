//! Row transformation pipeline: validate, resize, colorize, encode
//!
//! `Transform` composes the resampler, the color lookup table and the PNG
//! encoder into a single pure mapping from a raw scanline to a storable
//! frame. It owns its `ColorMap`, built once at construction; nothing here
//! touches I/O or global state.

use crate::errors::{TransformError, TransformResult};
use crate::models::{DepthKey, NewFrame};
use crate::processing::colormap::ColorMap;
use crate::processing::encode::encode_png;
use crate::processing::resize::resize_row;

/// Turns depth-indexed grayscale scanlines into colorized PNG frames.
#[derive(Debug, Clone)]
pub struct Transform {
    colormap: ColorMap,
    source_width: usize,
    target_width: usize,
}

impl Transform {
    /// Widths are fixed per instance; a zero width is a configuration bug,
    /// rejected up front rather than discovered per row.
    pub fn new(source_width: usize, target_width: usize) -> TransformResult<Self> {
        if source_width == 0 {
            return Err(TransformError::invalid_dimension("source width is zero"));
        }
        if target_width == 0 {
            return Err(TransformError::invalid_dimension("target width is zero"));
        }
        Ok(Self {
            colormap: ColorMap::new(),
            source_width,
            target_width,
        })
    }

    pub fn source_width(&self) -> usize {
        self.source_width
    }

    pub fn target_width(&self) -> usize {
        self.target_width
    }

    /// Transform one scanline into a frame ready for upsert.
    ///
    /// The row must carry exactly `source_width` samples; anything else is
    /// a `MalformedRow`, which callers treat as recoverable. The output is
    /// a pure function of the inputs, so re-running a row always produces
    /// byte-identical pixels.
    pub fn apply(&self, depth: DepthKey, samples: &[u8]) -> TransformResult<NewFrame> {
        if samples.len() != self.source_width {
            return Err(TransformError::MalformedRow {
                expected: self.source_width,
                actual: samples.len(),
            });
        }

        let resized = resize_row(samples, self.target_width)?;
        let rgb = self.colormap.apply(&resized);
        let pixels = encode_png(&rgb, self.target_width as u32, 1)?;

        Ok(NewFrame {
            depth,
            width: self.target_width as u32,
            height: 1,
            pixels,
        })
    }
}
