//! Grayscale-to-RGB color lookup table
//!
//! A fixed five-stop gradient (deep blue through teal, green and yellow to
//! orange-red) expanded once into a 256-entry table. Lookup is a plain
//! array index; the table is immutable after construction and shared by
//! reference wherever rows are colorized.

/// Gradient anchors: (grayscale intensity, RGB).
pub const COLOR_STOPS: [(u8, [u8; 3]); 5] = [
    (0, [0, 0, 139]),
    (64, [0, 139, 139]),
    (128, [0, 200, 100]),
    (192, [255, 215, 0]),
    (255, [255, 69, 0]),
];

/// Immutable 256-entry grayscale-to-RGB lookup table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorMap {
    table: [[u8; 3]; 256],
}

impl ColorMap {
    /// Expand the gradient stops into the full table. Each channel
    /// interpolates linearly between neighbouring stops, rounded to the
    /// nearest byte; the stops themselves map exactly.
    pub fn new() -> Self {
        let mut table = [[0u8; 3]; 256];
        for pair in COLOR_STOPS.windows(2) {
            let (start_idx, start_color) = pair[0];
            let (end_idx, end_color) = pair[1];
            let span = f64::from(end_idx - start_idx);
            for i in start_idx..=end_idx {
                let t = f64::from(i - start_idx) / span;
                let entry = &mut table[i as usize];
                for channel in 0..3 {
                    let start = f64::from(start_color[channel]);
                    let end = f64::from(end_color[channel]);
                    entry[channel] = (start + (end - start) * t).round() as u8;
                }
            }
        }
        Self { table }
    }

    /// RGB triple for a grayscale intensity.
    pub fn rgb(&self, intensity: u8) -> [u8; 3] {
        self.table[intensity as usize]
    }

    /// Map a grayscale buffer to packed RGB (3 bytes per input byte).
    pub fn apply(&self, grayscale: &[u8]) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(grayscale.len() * 3);
        for &value in grayscale {
            rgb.extend_from_slice(&self.table[value as usize]);
        }
        rgb
    }
}

impl Default for ColorMap {
    fn default() -> Self {
        Self::new()
    }
}
