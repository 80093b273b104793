/// Configuration for [`TerminalRenderer`](crate::TerminalRenderer).
///
/// Glyph cells are square, `font_size + padding` pixels on each side, so the
/// atlas texture is `16 * cell` by `8 * cell` pixels.
///
/// | Preset | Font size | Padding | Cell | Atlas |
/// |--------|-----------|---------|------|-------|
/// | small() | 12 | 4 | 16 px | 256x128 |
/// | standard() | 16 | 16 | 32 px | 512x256 |
/// | large() | 24 | 8 | 32 px | 512x256 |
///
/// # Example
///
/// ```
/// use termglyph_render::RendererConfig;
///
/// let config = RendererConfig::small().with_clear_color(wgpu::Color::BLACK);
/// assert_eq!(config.cell_size(), 16);
/// ```
#[derive(Clone, Debug)]
pub struct RendererConfig {
    /// Glyph rasterization size in pixels. Default: 16
    pub font_size: u32,
    /// Extra pixels added to every cell. Default: 16
    pub padding: u32,
    /// Color the surface is cleared to before glyphs are drawn.
    pub clear_color: wgpu::Color,
    /// Texture format of the uploaded atlas. Must be a four-byte RGBA8 format
    /// (`Rgba8Unorm` or `Rgba8UnormSrgb`).
    pub atlas_format: wgpu::TextureFormat,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl RendererConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compact cells for dense terminals.
    pub fn small() -> Self {
        Self {
            font_size: 12,
            padding: 4,
            ..Self::standard()
        }
    }

    /// 16 px glyphs in 32 px cells.
    pub fn standard() -> Self {
        Self {
            font_size: 16,
            padding: 16,
            clear_color: wgpu::Color::BLACK,
            atlas_format: wgpu::TextureFormat::Rgba8Unorm,
        }
    }

    /// Larger glyphs with tighter padding.
    pub fn large() -> Self {
        Self {
            font_size: 24,
            padding: 8,
            ..Self::standard()
        }
    }

    pub fn with_font_size(mut self, font_size: u32) -> Self {
        self.font_size = font_size;
        self
    }

    pub fn with_padding(mut self, padding: u32) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_clear_color(mut self, color: wgpu::Color) -> Self {
        self.clear_color = color;
        self
    }

    pub fn with_atlas_format(mut self, format: wgpu::TextureFormat) -> Self {
        self.atlas_format = format;
        self
    }

    /// Side length of a glyph cell in pixels.
    pub fn cell_size(&self) -> u32 {
        self.font_size + self.padding
    }
}
