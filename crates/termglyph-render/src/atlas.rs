//! Fixed-range glyph atlas.
//!
//! Printable ASCII (code points 32 through 127) is rasterized into a 16x8
//! grid of square cells, row-major starting at the space character. The
//! image is opaque black with white glyphs; color is left to the consumer.
//!
//! # Example
//!
//! ```
//! use termglyph_render::{GlyphAtlas, GlyphBitmap, GlyphRasterizer};
//!
//! struct Blank;
//!
//! impl GlyphRasterizer for Blank {
//!     fn rasterize(&mut self, _ch: char, _font_size: f32) -> Option<GlyphBitmap> {
//!         None
//!     }
//! }
//!
//! let atlas = GlyphAtlas::new(16, 16, &mut Blank).unwrap();
//! assert_eq!((atlas.atlas_width(), atlas.atlas_height()), (512, 256));
//!
//! let a = atlas.lookup('A');
//! assert!(a.u0 < a.u1 && a.v0 < a.v1);
//! ```

use crate::error::AtlasError;
use crate::raster::{GlyphBitmap, GlyphRasterizer};
use termglyph_core::profiling::profile_function;

/// Slots per atlas row.
pub const ATLAS_COLUMNS: u32 = 16;
/// Slot rows in the atlas.
pub const ATLAS_ROWS: u32 = 8;
/// First code point stored in the atlas. Also the fallback glyph.
pub const FIRST_GLYPH: char = ' ';
/// Last code point stored in the atlas.
pub const LAST_GLYPH: char = '\u{7f}';

/// Inset from the slot's left and bottom edges to the glyph.
const GLYPH_INSET: i32 = 2;

const BACKGROUND: [u8; 4] = [0, 0, 0, 255];

/// Texture-space rectangle and cell size of one glyph.
///
/// `(u0, v0)` is the top-left corner of the glyph's slot in the atlas image
/// and `(u1, v1)` the bottom-right. Every glyph shares the same cell size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphInfo {
    pub u0: f32,
    pub v0: f32,
    pub u1: f32,
    pub v1: f32,
    pub width: u32,
    pub height: u32,
}

/// Rasterized glyph atlas plus its per-glyph UV table.
///
/// Built once and immutable afterwards.
#[derive(Debug, Clone)]
pub struct GlyphAtlas {
    font_size: u32,
    cell_size: u32,
    width: u32,
    height: u32,
    /// RGBA8, row-major, top row first.
    image: Vec<u8>,
    /// Indexed by `code point - FIRST_GLYPH`.
    glyphs: Vec<GlyphInfo>,
}

impl GlyphAtlas {
    /// Pixel dimensions of the atlas for the given font size and padding.
    pub fn dimensions(font_size: u32, padding: u32) -> Result<(u32, u32), AtlasError> {
        let cell = font_size
            .checked_add(padding)
            .ok_or(AtlasError::TooLarge {
                width: u32::MAX,
                height: u32::MAX,
                max: u32::MAX,
            })?;
        if cell == 0 {
            return Err(AtlasError::ZeroCellSize { font_size, padding });
        }

        match (
            cell.checked_mul(ATLAS_COLUMNS),
            cell.checked_mul(ATLAS_ROWS),
        ) {
            (Some(width), Some(height)) => Ok((width, height)),
            _ => Err(AtlasError::TooLarge {
                width: u32::MAX,
                height: u32::MAX,
                max: u32::MAX,
            }),
        }
    }

    /// Lay out and rasterize the atlas.
    ///
    /// Deterministic for a given rasterizer, font size and padding.
    pub fn new(
        font_size: u32,
        padding: u32,
        rasterizer: &mut dyn GlyphRasterizer,
    ) -> Result<Self, AtlasError> {
        profile_function!();

        let (width, height) = Self::dimensions(font_size, padding)?;
        let cell_size = font_size + padding;

        let mut atlas = Self {
            font_size,
            cell_size,
            width,
            height,
            image: BACKGROUND.repeat(width as usize * height as usize),
            glyphs: Vec::with_capacity((LAST_GLYPH as usize) - (FIRST_GLYPH as usize) + 1),
        };

        let slots = (ATLAS_COLUMNS * ATLAS_ROWS) as usize;
        for (slot, ch) in (FIRST_GLYPH..=LAST_GLYPH).take(slots).enumerate() {
            let slot = slot as u32;
            let slot_x = (slot % ATLAS_COLUMNS) * cell_size;
            let slot_y = (slot / ATLAS_COLUMNS) * cell_size;

            if let Some(bitmap) = rasterizer.rasterize(ch, font_size as f32) {
                atlas.blit(&bitmap, slot_x, slot_y);
            }

            atlas.glyphs.push(GlyphInfo {
                u0: slot_x as f32 / width as f32,
                v0: slot_y as f32 / height as f32,
                u1: (slot_x + cell_size) as f32 / width as f32,
                v1: (slot_y + cell_size) as f32 / height as f32,
                width: cell_size,
                height: cell_size,
            });
        }

        tracing::debug!(
            "Built {}x{} glyph atlas ({} glyphs, {} px cells)",
            width,
            height,
            atlas.glyphs.len(),
            cell_size
        );

        Ok(atlas)
    }

    /// Composite a glyph into its slot, white over the black background.
    ///
    /// The pen starts `GLYPH_INSET` pixels right of the slot edge and the
    /// glyph's lowest row lands `GLYPH_INSET` pixels above the slot bottom.
    /// Anything outside the slot is clipped.
    fn blit(&mut self, bitmap: &GlyphBitmap, slot_x: u32, slot_y: u32) {
        let cell = self.cell_size as i32;
        let (slot_x, slot_y) = (slot_x as i32, slot_y as i32);

        let baseline = slot_y + cell - GLYPH_INSET - bitmap.descent();
        let origin_x = slot_x + GLYPH_INSET + bitmap.left;
        let origin_y = baseline - bitmap.top;

        for by in 0..bitmap.height {
            let py = origin_y + by as i32;
            if py < slot_y || py >= slot_y + cell {
                continue;
            }
            for bx in 0..bitmap.width {
                let px = origin_x + bx as i32;
                if px < slot_x || px >= slot_x + cell {
                    continue;
                }

                let c = bitmap.coverage_at(bx, by);
                let offset = (py as usize * self.width as usize + px as usize) * 4;
                self.image[offset..offset + 4].copy_from_slice(&[c, c, c, 255]);
            }
        }
    }

    /// UV rectangle for `ch`.
    ///
    /// Anything outside the stored range resolves to the space glyph.
    pub fn lookup(&self, ch: char) -> &GlyphInfo {
        let index = (ch as u32).wrapping_sub(FIRST_GLYPH as u32) as usize;
        self.glyphs.get(index).unwrap_or(&self.glyphs[0])
    }

    pub fn atlas_width(&self) -> u32 {
        self.width
    }

    pub fn atlas_height(&self) -> u32 {
        self.height
    }

    pub fn cell_width(&self) -> u32 {
        self.cell_size
    }

    pub fn cell_height(&self) -> u32 {
        self.cell_size
    }

    pub fn font_size(&self) -> u32 {
        self.font_size
    }

    /// RGBA8 pixels, row-major, top row first.
    pub fn image(&self) -> &[u8] {
        &self.image
    }

    /// Number of glyphs with a UV entry.
    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::BlockRasterizer;

    fn atlas() -> GlyphAtlas {
        GlyphAtlas::new(16, 4, &mut BlockRasterizer).unwrap()
    }

    fn pixel(atlas: &GlyphAtlas, x: u32, y: u32) -> [u8; 4] {
        let offset = ((y * atlas.atlas_width() + x) * 4) as usize;
        atlas.image()[offset..offset + 4].try_into().unwrap()
    }

    #[test]
    fn test_dimensions() {
        let atlas = atlas();
        assert_eq!(atlas.cell_width(), 20);
        assert_eq!(atlas.cell_height(), 20);
        assert_eq!(atlas.atlas_width(), 320);
        assert_eq!(atlas.atlas_height(), 160);
        assert_eq!(atlas.font_size(), 16);
        assert_eq!(atlas.image().len(), 320 * 160 * 4);
        assert_eq!(atlas.glyph_count(), 96);
    }

    #[test]
    fn test_zero_cell_size_rejected() {
        let err = GlyphAtlas::new(0, 0, &mut BlockRasterizer).unwrap_err();
        assert_eq!(
            err,
            AtlasError::ZeroCellSize {
                font_size: 0,
                padding: 0
            }
        );
        assert!(GlyphAtlas::dimensions(u32::MAX, 1).is_err());
        assert!(GlyphAtlas::dimensions(u32::MAX / 4, 0).is_err());
    }

    #[test]
    fn test_uv_bounds_for_supported_range() {
        let atlas = atlas();
        for ch in FIRST_GLYPH..=LAST_GLYPH {
            let glyph = atlas.lookup(ch);
            assert!(0.0 <= glyph.u0 && glyph.u0 < glyph.u1 && glyph.u1 <= 1.0, "{ch:?}");
            assert!(0.0 <= glyph.v0 && glyph.v0 < glyph.v1 && glyph.v1 <= 1.0, "{ch:?}");
            assert_eq!((glyph.width, glyph.height), (20, 20));
        }
    }

    #[test]
    fn test_row_major_slots() {
        let atlas = atlas();

        let space = atlas.lookup(' ');
        assert_eq!((space.u0, space.v0), (0.0, 0.0));
        assert_eq!((space.u1, space.v1), (20.0 / 320.0, 20.0 / 160.0));

        // '0' is code point 48: slot 16, first column of the second row.
        let zero = atlas.lookup('0');
        assert_eq!((zero.u0, zero.v0), (0.0, 20.0 / 160.0));

        // DEL is code point 127: slot 95, last column of the sixth row.
        let del = atlas.lookup(LAST_GLYPH);
        assert_eq!((del.u0, del.v0), (300.0 / 320.0, 100.0 / 160.0));
        assert_eq!((del.u1, del.v1), (1.0, 120.0 / 160.0));
    }

    #[test]
    fn test_out_of_range_falls_back_to_space() {
        let atlas = atlas();
        let space = *atlas.lookup(' ');
        for ch in ['\0', '\u{1}', '\u{1f}', '\u{80}', '\u{c8}', '\u{2603}'] {
            assert_eq!(*atlas.lookup(ch), space, "{ch:?}");
        }
    }

    #[test]
    fn test_glyph_placement() {
        let atlas = atlas();

        // BlockRasterizer draws an 8x12 block sitting on the baseline, so in
        // the '!' slot (x 20..40, y 0..20) it covers x 22..30, y 6..18.
        assert_eq!(pixel(&atlas, 22, 6), [255, 255, 255, 255]);
        assert_eq!(pixel(&atlas, 29, 17), [255, 255, 255, 255]);
        assert_eq!(pixel(&atlas, 21, 6), BACKGROUND);
        assert_eq!(pixel(&atlas, 30, 6), BACKGROUND);
        assert_eq!(pixel(&atlas, 22, 5), BACKGROUND);
        assert_eq!(pixel(&atlas, 22, 18), BACKGROUND);

        // Space has no bitmap, so its slot stays background.
        assert!(
            atlas.image()[..20 * 4]
                .chunks_exact(4)
                .all(|px| px == BACKGROUND)
        );
    }

    #[test]
    fn test_oversized_glyph_is_clipped_to_slot() {
        struct Huge;

        impl GlyphRasterizer for Huge {
            fn rasterize(&mut self, ch: char, _font_size: f32) -> Option<GlyphBitmap> {
                (ch == '!').then(|| GlyphBitmap {
                    left: -10,
                    top: 40,
                    width: 60,
                    height: 60,
                    coverage: vec![255; 3600],
                })
            }
        }

        let atlas = GlyphAtlas::new(16, 4, &mut Huge).unwrap();

        // Only the '!' slot (x 20..40 of the first row) is painted, and the
        // bottom inset stays clear.
        assert_eq!(pixel(&atlas, 20, 0), [255, 255, 255, 255]);
        assert_eq!(pixel(&atlas, 39, 17), [255, 255, 255, 255]);
        assert_eq!(pixel(&atlas, 39, 18), BACKGROUND);
        assert_eq!(pixel(&atlas, 19, 0), BACKGROUND);
        assert_eq!(pixel(&atlas, 40, 0), BACKGROUND);
        assert_eq!(pixel(&atlas, 20, 20), BACKGROUND);
    }

    #[test]
    fn test_construction_is_deterministic() {
        let a = atlas();
        let b = atlas();
        assert_eq!(a.image(), b.image());
        assert_eq!(a.glyphs, b.glyphs);
    }
}
