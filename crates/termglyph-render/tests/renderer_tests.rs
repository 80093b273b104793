//! End-to-end renderer tests against the mock GPU, plus pixel readback checks
//! on a real device.

mod common;

use common::BarRasterizer;
use std::sync::Arc;
use termglyph_render::{
    AtlasState, GlyphAtlas, GraphicsContext, GridSnapshot, MeshBuilder, RenderMode,
    RendererConfig, TerminalPresenter, TerminalRenderer,
};
use termglyph_test_utils::{MockRenderContext, RenderCall};

const SURFACE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Bgra8UnormSrgb;

/// 16 px font + 4 px padding: 20 px cells.
fn config() -> RendererConfig {
    RendererConfig::default().with_padding(4)
}

#[test]
fn test_surface_lifecycle_with_mock() {
    let mock = Arc::new(MockRenderContext::new());
    let mut renderer = TerminalRenderer::new(mock.clone(), config(), Box::new(BarRasterizer));

    renderer.on_surface_created(SURFACE_FORMAT).unwrap();
    renderer.on_surface_resized(1600, 480);

    let grid = GridSnapshot::from_lines(80, 24, ["user@host:~$ ls", "Cargo.toml  crates"]);
    let frame = renderer.prepare_frame(&grid).unwrap().unwrap();
    assert_eq!(frame.vertex_count(), 80 * 24 * 6);

    assert_eq!(renderer.atlas_state(), AtlasState::Ready);
    let atlas = renderer.glyph_atlas().unwrap();
    assert_eq!((atlas.atlas_width(), atlas.atlas_height()), (320, 160));

    let calls = mock.calls();
    assert_eq!(
        calls
            .iter()
            .filter(|c| matches!(c, RenderCall::CreateTexture { .. }))
            .count(),
        1
    );
    assert!(calls.contains(&RenderCall::CreateBuffer {
        label: Some("Terminal Position Buffer".to_string()),
        size: 80 * 24 * 6 * 12,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
    }));
}

#[test]
fn test_presenter_drives_renderer() {
    let mock = Arc::new(MockRenderContext::new());
    let mut renderer = TerminalRenderer::new(mock.clone(), config(), Box::new(BarRasterizer));
    renderer.on_surface_created(SURFACE_FORMAT).unwrap();
    renderer.on_surface_resized(40, 20);

    let mut presenter = TerminalPresenter::new(renderer);
    presenter.set_grid(GridSnapshot::from_lines(2, 1, ["AB"]));
    assert!(presenter.draw_frame().unwrap().is_none());

    presenter.set_mode(RenderMode::Gpu);
    assert!(presenter.take_redraw_request());
    let frame = presenter.draw_frame().unwrap().unwrap();
    assert_eq!(frame.vertex_count(), 12);
}

#[test]
fn test_mesh_matches_atlas_cells() {
    let atlas = GlyphAtlas::new(16, 4, &mut BarRasterizer).unwrap();
    let grid = GridSnapshot::from_lines(80, 24, std::iter::empty());
    let mesh = MeshBuilder::build(&grid, &atlas);

    // Top-left cell spans the top 20 px, bottom-left the bottom 20 px.
    let ys = |cell: usize| {
        let quad = &mesh.positions()[cell * 6..cell * 6 + 6];
        let min = quad.iter().map(|p| p[1]).fold(f32::MAX, f32::min);
        let max = quad.iter().map(|p| p[1]).fold(f32::MIN, f32::max);
        (min, max)
    };
    assert_eq!(ys(0), (460.0, 480.0));
    assert_eq!(ys(23 * 80), (0.0, 20.0));
}

/// Render `grid` offscreen on a real device and read the pixels back, top
/// row first.
fn render_offscreen(grid: &GridSnapshot, width: u32, height: u32) -> Option<Vec<[u8; 4]>> {
    let ctx = GraphicsContext::new_owned_sync().ok()?;
    let format = wgpu::TextureFormat::Rgba8Unorm;

    let mut renderer = TerminalRenderer::new(ctx.clone(), config(), Box::new(BarRasterizer));
    renderer.on_surface_created(format).unwrap();
    renderer.on_surface_resized(width, height);

    let target = ctx.device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Offscreen Target"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    });
    let view = target.create_view(&wgpu::TextureViewDescriptor::default());

    let padded_row = (width * 4).div_ceil(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT)
        * wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    let readback = ctx.device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Readback Buffer"),
        size: (padded_row * height) as u64,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let mut encoder = ctx
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
    renderer.draw_frame(grid, &mut encoder, &view).unwrap();
    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            texture: &target,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: &readback,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(padded_row),
                rows_per_image: Some(height),
            },
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );
    ctx.queue.submit(Some(encoder.finish()));

    let slice = readback.slice(..);
    let (tx, rx) = std::sync::mpsc::channel();
    slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = tx.send(result);
    });
    let _ = ctx.device.poll(wgpu::PollType::Wait {
        submission_index: None,
        timeout: None,
    });
    rx.recv().ok()?.ok()?;

    let data = slice.get_mapped_range();
    let mut pixels = Vec::with_capacity((width * height) as usize);
    for row in data.chunks_exact(padded_row as usize) {
        for px in row[..(width * 4) as usize].chunks_exact(4) {
            pixels.push([px[0], px[1], px[2], px[3]]);
        }
    }
    Some(pixels)
}

#[test]
#[ignore] // Requires GPU - run with: cargo test --test renderer_tests -- --ignored
fn test_glyphs_render_upright_in_top_row() {
    // One column, two rows: a bar on top, an empty cell below.
    let grid = GridSnapshot::from_lines(1, 2, ["|"]);
    let Some(pixels) = render_offscreen(&grid, 20, 40) else {
        println!("GPU not available");
        return;
    };
    let at = |x: u32, y: u32| pixels[(y * 20 + x) as usize];

    // BarRasterizer draws a 1 px wide, 8 px tall bar one pixel right of the
    // pen, resting 2 px above the cell bottom: x = 3, y = 10..18. Drawn upside
    // down it would land on y = 2..10 instead.
    assert_eq!(at(3, 10)[0], 200);
    assert_eq!(at(3, 17)[0], 200);
    assert_eq!(at(3, 9)[0], 0);
    assert_eq!(at(3, 18)[0], 0);
    assert_eq!(at(3, 5)[0], 0);
    assert_eq!(at(4, 12)[0], 0);

    // The empty second row is at the bottom of the screen.
    assert!((20..40).all(|y| at(3, y)[0] == 0));
}

#[test]
#[ignore] // Requires GPU
fn test_bottom_row_maps_to_screen_bottom() {
    // Only the bottom-right cell holds a glyph; everything else is blank.
    let mut grid = GridSnapshot::new(2, 2);
    grid.set(1, 1, '_');
    let Some(pixels) = render_offscreen(&grid, 40, 40) else {
        println!("GPU not available");
        return;
    };
    let at = |x: u32, y: u32| pixels[(y * 40 + x) as usize];

    assert_eq!(at(23, 30)[0], 200);
    assert_eq!(at(23, 37)[0], 200);
    assert_eq!(at(23, 24)[0], 0);
    assert!((0..20).all(|y| at(23, y)[0] == 0));
    assert!((0..40).all(|y| at(3, y)[0] == 0));
}
