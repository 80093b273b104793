use crate::atlas::GlyphAtlas;
use crate::config::RendererConfig;
use crate::error::{AtlasError, RenderError, ResourceCreationError};
use crate::grid::TerminalGrid;
use crate::mesh::MeshBuilder;
use crate::pipeline::{AtlasTexture, GlyphPipeline, MeshBuffers};
use crate::raster::{GlyphRasterizer, MonospaceRasterizer};
use crate::transform::ProjectionUniform;
use std::sync::Arc;
use termglyph_core::profiling::profile_function;
use termglyph_test_utils::RenderContext;

/// Where the glyph atlas is in its one-time setup.
///
/// `Uninitialized -> Ready` or `Uninitialized -> Failed`, taken on the first
/// frame after the surface is created. A failed atlas is not retried until
/// [`TerminalRenderer::on_surface_created`] starts over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtlasState {
    Uninitialized,
    Ready,
    Failed,
}

struct ReadyAtlas {
    glyphs: GlyphAtlas,
    texture: AtlasTexture,
}

/// Draws a terminal grid with one batched draw call per frame.
///
/// Driven by the three surface callbacks:
/// [`on_surface_created`](Self::on_surface_created),
/// [`on_surface_resized`](Self::on_surface_resized) and
/// [`prepare_frame`](Self::prepare_frame) (or [`draw_frame`](Self::draw_frame),
/// which also records the pass). Calls must be made from one thread, one at a
/// time.
///
/// # Example
///
/// ```rust,no_run
/// use termglyph_render::{GraphicsContext, GridSnapshot, RendererConfig, TerminalRenderer};
///
/// let ctx = GraphicsContext::new_owned_sync().expect("no GPU");
/// let mut renderer = TerminalRenderer::with_system_fonts(ctx.clone(), RendererConfig::default());
/// renderer
///     .on_surface_created(wgpu::TextureFormat::Bgra8UnormSrgb)
///     .unwrap();
/// renderer.on_surface_resized(1280, 720);
///
/// let grid = GridSnapshot::from_lines(80, 24, ["$ ls"]);
/// let frame = renderer.prepare_frame(&grid).unwrap();
/// assert_eq!(frame.map(|f| f.vertex_count()), Some(80 * 24 * 6));
/// ```
pub struct TerminalRenderer {
    ctx: Arc<dyn RenderContext>,
    config: RendererConfig,
    rasterizer: Box<dyn GlyphRasterizer>,
    pipeline: Option<GlyphPipeline>,
    atlas: Option<Result<ReadyAtlas, RenderError>>,
    projection: ProjectionUniform,
    surface_size: Option<(u32, u32)>,
}

impl TerminalRenderer {
    pub fn new(
        ctx: Arc<dyn RenderContext>,
        config: RendererConfig,
        rasterizer: Box<dyn GlyphRasterizer>,
    ) -> Self {
        Self {
            ctx,
            config,
            rasterizer,
            pipeline: None,
            atlas: None,
            projection: ProjectionUniform::identity(),
            surface_size: None,
        }
    }

    /// Renderer that rasterizes with the system monospace font.
    pub fn with_system_fonts(ctx: Arc<dyn RenderContext>, config: RendererConfig) -> Self {
        Self::new(ctx, config, Box::new(MonospaceRasterizer::new()))
    }

    /// Build the GPU pipeline for a freshly created surface.
    ///
    /// Discards any previous pipeline and atlas, so this is also how a failed
    /// renderer is rebuilt. The projection resets to identity until the next
    /// resize.
    pub fn on_surface_created(
        &mut self,
        format: wgpu::TextureFormat,
    ) -> Result<(), ResourceCreationError> {
        profile_function!();

        self.pipeline = None;
        self.atlas = None;
        self.projection = ProjectionUniform::identity();
        self.surface_size = None;

        self.pipeline = Some(GlyphPipeline::new(self.ctx.as_ref(), format)?);
        tracing::debug!("Surface created ({:?})", format);
        Ok(())
    }

    /// Map `[0, width] x [0, height]` pixels onto the surface.
    ///
    /// Zero-sized surfaces (minimized windows) are ignored.
    pub fn on_surface_resized(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            tracing::trace!("Ignoring resize to {}x{}", width, height);
            return;
        }

        self.surface_size = Some((width, height));
        self.projection = ProjectionUniform::for_surface(width, height);
        if let Some(pipeline) = &self.pipeline {
            pipeline.set_projection(self.ctx.as_ref(), &self.projection);
        }
        tracing::debug!("Surface resized to {}x{}", width, height);
    }

    /// Build and upload this frame's mesh.
    ///
    /// The atlas is built and uploaded on the first call. Returns `Ok(None)`
    /// when the grid has no cells and there is nothing to draw.
    pub fn prepare_frame(
        &mut self,
        grid: &dyn TerminalGrid,
    ) -> Result<Option<PreparedFrame<'_>>, RenderError> {
        profile_function!();

        let ctx = self.ctx.as_ref();
        let pipeline = self.pipeline.as_ref().ok_or(RenderError::SurfaceNotCreated)?;

        let atlas = self.atlas.get_or_insert_with(|| {
            let result =
                build_atlas(ctx, &self.config, self.rasterizer.as_mut(), pipeline);
            match &result {
                Ok(_) => tracing::debug!("Glyph atlas ready"),
                Err(err) => tracing::error!("Glyph atlas setup failed: {}", err),
            }
            result
        });
        let atlas = atlas.as_ref().map_err(|err| err.clone())?;

        let mesh = MeshBuilder::build(grid, &atlas.glyphs);
        let Some(buffers) = pipeline.upload_mesh(ctx, &mesh)? else {
            tracing::trace!("Empty grid, nothing to draw");
            return Ok(None);
        };

        tracing::trace!(
            "Prepared {}x{} grid ({} vertices)",
            grid.columns(),
            grid.rows(),
            buffers.vertex_count()
        );

        Ok(Some(PreparedFrame {
            pipeline,
            atlas: &atlas.texture,
            buffers,
        }))
    }

    /// Clear `target` and draw `grid` into it.
    ///
    /// The target is cleared even when the frame cannot be prepared. Returns
    /// the number of vertices drawn.
    pub fn draw_frame(
        &mut self,
        grid: &dyn TerminalGrid,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
    ) -> Result<u32, RenderError> {
        let clear_color = self.config.clear_color;
        let prepared = self.prepare_frame(grid);

        let mut pass = begin_clear_pass(encoder, target, clear_color);

        let vertex_count = match &prepared {
            Ok(Some(frame)) => {
                frame.record(&mut pass);
                frame.vertex_count()
            }
            _ => 0,
        };
        drop(pass);

        prepared.map(|_| vertex_count)
    }

    /// Clear `target` without drawing anything.
    pub fn clear(&self, encoder: &mut wgpu::CommandEncoder, target: &wgpu::TextureView) {
        drop(begin_clear_pass(encoder, target, self.config.clear_color));
    }

    pub fn atlas_state(&self) -> AtlasState {
        match &self.atlas {
            None => AtlasState::Uninitialized,
            Some(Ok(_)) => AtlasState::Ready,
            Some(Err(_)) => AtlasState::Failed,
        }
    }

    /// The CPU-side atlas, once built.
    pub fn glyph_atlas(&self) -> Option<&GlyphAtlas> {
        match &self.atlas {
            Some(Ok(ready)) => Some(&ready.glyphs),
            _ => None,
        }
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub fn clear_color(&self) -> wgpu::Color {
        self.config.clear_color
    }

    pub fn projection(&self) -> &ProjectionUniform {
        &self.projection
    }

    /// Last non-zero surface size, if any.
    pub fn surface_size(&self) -> Option<(u32, u32)> {
        self.surface_size
    }

    pub fn is_surface_created(&self) -> bool {
        self.pipeline.is_some()
    }
}

fn begin_clear_pass<'e>(
    encoder: &'e mut wgpu::CommandEncoder,
    target: &wgpu::TextureView,
    clear_color: wgpu::Color,
) -> wgpu::RenderPass<'e> {
    encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("Terminal Render Pass"),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: target,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(clear_color),
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
    })
}

fn build_atlas(
    ctx: &dyn RenderContext,
    config: &RendererConfig,
    rasterizer: &mut dyn GlyphRasterizer,
    pipeline: &GlyphPipeline,
) -> Result<ReadyAtlas, RenderError> {
    // Check the device limit before spending time rasterizing.
    let (width, height) = GlyphAtlas::dimensions(config.font_size, config.padding)?;
    let max = ctx.max_texture_dimension_2d();
    if width > max || height > max {
        return Err(AtlasError::TooLarge { width, height, max }.into());
    }

    let glyphs = GlyphAtlas::new(config.font_size, config.padding, rasterizer)?;
    let texture = pipeline.upload_atlas(ctx, &glyphs, config.atlas_format)?;
    Ok(ReadyAtlas { glyphs, texture })
}

/// A frame whose buffers are uploaded and ready to record.
pub struct PreparedFrame<'a> {
    pipeline: &'a GlyphPipeline,
    atlas: &'a AtlasTexture,
    buffers: MeshBuffers,
}

impl PreparedFrame<'_> {
    /// Vertices in this frame's single draw.
    pub fn vertex_count(&self) -> u32 {
        self.buffers.vertex_count()
    }

    /// Record the draw into `pass`.
    pub fn record(&self, pass: &mut wgpu::RenderPass<'_>) {
        self.pipeline.record(pass, self.atlas, &self.buffers);
    }
}
