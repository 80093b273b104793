use termglyph_render::{GlyphBitmap, GlyphRasterizer};

/// Rasterizer drawing a one pixel wide bar, half the font size tall, for every
/// visible character, so atlas contents are predictable without system fonts.
pub struct BarRasterizer;

impl GlyphRasterizer for BarRasterizer {
    fn rasterize(&mut self, ch: char, font_size: f32) -> Option<GlyphBitmap> {
        if ch == ' ' {
            return None;
        }
        let height = (font_size / 2.0) as u32;
        Some(GlyphBitmap {
            left: 1,
            top: height as i32,
            width: 1,
            height,
            coverage: vec![200; height as usize],
        })
    }
}
