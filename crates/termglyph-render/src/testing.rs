//! Deterministic rasterizer for unit tests.

use crate::raster::{GlyphBitmap, GlyphRasterizer};

/// Draws every visible character as a solid block half the font size wide
/// and three quarters tall, resting on the baseline. Space is blank.
pub(crate) struct BlockRasterizer;

impl GlyphRasterizer for BlockRasterizer {
    fn rasterize(&mut self, ch: char, font_size: f32) -> Option<GlyphBitmap> {
        if ch == ' ' {
            return None;
        }
        let width = (font_size / 2.0) as u32;
        let height = (font_size * 0.75) as u32;
        Some(GlyphBitmap {
            left: 0,
            top: height as i32,
            width,
            height,
            coverage: vec![255; (width * height) as usize],
        })
    }
}
