//! Glyph rasterization for the atlas.
//!
//! [`GlyphRasterizer`] is the seam between atlas layout and font handling.
//! [`MonospaceRasterizer`] implements it with `cosmic-text`, resolving the
//! generic monospace family against the loaded fonts.

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping, SwashCache, SwashContent};
use termglyph_core::profiling::profile_function;

/// Coverage mask of a single rasterized glyph.
///
/// `left` and `top` are the bearings from the pen position on the baseline:
/// the first pixel column sits `left` pixels right of the pen, the first pixel
/// row sits `top` pixels above the baseline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphBitmap {
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
    /// Row-major coverage, one byte per pixel, `width * height` long.
    pub coverage: Vec<u8>,
}

impl GlyphBitmap {
    /// Pixels the glyph extends below the baseline (negative when the whole
    /// glyph sits above it).
    pub fn descent(&self) -> i32 {
        self.height as i32 - self.top
    }

    /// Coverage at `(x, y)` within the bitmap.
    pub fn coverage_at(&self, x: u32, y: u32) -> u8 {
        self.coverage
            .get((y * self.width + x) as usize)
            .copied()
            .unwrap_or(0)
    }
}

/// Produces glyph coverage masks for atlas construction.
pub trait GlyphRasterizer {
    /// Rasterize `ch` at `font_size` pixels.
    ///
    /// Returns `None` for characters without visible pixels (such as space) or
    /// that no loaded font can render; their atlas slot stays blank.
    fn rasterize(&mut self, ch: char, font_size: f32) -> Option<GlyphBitmap>;
}

/// Monospace rasterizer backed by `cosmic-text` and its swash cache.
pub struct MonospaceRasterizer {
    font_system: FontSystem,
    swash_cache: SwashCache,
}

impl MonospaceRasterizer {
    /// Create a rasterizer over the system fonts.
    pub fn new() -> Self {
        let mut db = cosmic_text::fontdb::Database::new();
        db.load_system_fonts();
        tracing::debug!("Loaded {} system font faces", db.len());
        Self::with_font_system(FontSystem::new_with_locale_and_db(system_locale(), db))
    }

    /// Create a rasterizer that only knows the given font file contents.
    ///
    /// The first family in the data becomes the monospace family.
    pub fn with_font_data(data: Vec<u8>) -> Self {
        let mut db = cosmic_text::fontdb::Database::new();
        db.load_font_data(data);

        let family = db
            .faces()
            .next()
            .and_then(|face| face.families.first().map(|(name, _)| name.clone()));
        match family {
            Some(family) => db.set_monospace_family(family),
            None => tracing::warn!("Font data contained no usable faces"),
        }

        Self::with_font_system(FontSystem::new_with_locale_and_db(system_locale(), db))
    }

    /// Wrap an already configured font system.
    pub fn with_font_system(font_system: FontSystem) -> Self {
        Self {
            font_system,
            swash_cache: SwashCache::new(),
        }
    }
}

impl Default for MonospaceRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl GlyphRasterizer for MonospaceRasterizer {
    fn rasterize(&mut self, ch: char, font_size: f32) -> Option<GlyphBitmap> {
        profile_function!();

        let mut buffer = Buffer::new(
            &mut self.font_system,
            Metrics::new(font_size, font_size * 1.25),
        );
        let mut utf8 = [0u8; 4];
        buffer.set_text(
            &mut self.font_system,
            ch.encode_utf8(&mut utf8),
            Attrs::new().family(Family::Monospace),
            Shaping::Advanced,
        );
        buffer.shape_until_scroll(&mut self.font_system, false);

        let cache_key = buffer
            .layout_runs()
            .flat_map(|run| run.glyphs.iter())
            .next()
            .map(|glyph| glyph.physical((0.0, 0.0), 1.0).cache_key)?;

        let image = self
            .swash_cache
            .get_image(&mut self.font_system, cache_key)
            .as_ref()?;

        let width = image.placement.width;
        let height = image.placement.height;
        if width == 0 || height == 0 {
            return None;
        }

        let pixels = (width * height) as usize;
        let coverage = match image.content {
            SwashContent::Mask => image.data.iter().take(pixels).copied().collect(),
            SwashContent::Color => image.data.chunks_exact(4).map(|px| px[3]).collect(),
            SwashContent::SubpixelMask => image
                .data
                .chunks_exact(4)
                .map(|px| px[0].max(px[1]).max(px[2]))
                .collect(),
        };

        Some(GlyphBitmap {
            left: image.placement.left,
            top: image.placement.top,
            width,
            height,
            coverage,
        })
    }
}

fn system_locale() -> String {
    sys_locale::get_locale().unwrap_or_else(|| String::from("en-US"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descent() {
        let bitmap = GlyphBitmap {
            left: 1,
            top: 10,
            width: 6,
            height: 13,
            coverage: vec![0; 78],
        };
        assert_eq!(bitmap.descent(), 3);

        let dash = GlyphBitmap {
            left: 0,
            top: 6,
            width: 6,
            height: 2,
            coverage: vec![255; 12],
        };
        assert_eq!(dash.descent(), -4);
        assert_eq!(dash.coverage_at(5, 1), 255);
        assert_eq!(dash.coverage_at(6, 1), 0);
    }

    #[test]
    #[ignore] // Requires a monospace system font - run with: cargo test -- --ignored
    fn test_system_monospace_rasterizes_letters() {
        let mut rasterizer = MonospaceRasterizer::new();

        let bitmap = rasterizer.rasterize('A', 16.0).expect("no monospace font");
        assert!(bitmap.width > 0 && bitmap.height > 0);
        assert_eq!(bitmap.coverage.len(), (bitmap.width * bitmap.height) as usize);
        assert!(bitmap.coverage.iter().any(|&c| c > 0));

        assert!(rasterizer.rasterize(' ', 16.0).is_none());
    }
}
