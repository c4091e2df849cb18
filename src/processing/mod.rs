//! Scanline processing: color mapping, resampling, PNG encoding
//!
//! The pipeline is deliberately pure: `Transform` and its parts hold no
//! I/O handles and no mutable state, so the same inputs always produce
//! the same encoded bytes.

pub mod colormap;
pub mod encode;
pub mod resize;
pub mod transform;

pub use colormap::ColorMap;
pub use encode::encode_png;
pub use resize::resize_row;
pub use transform::Transform;
