//! Terminal Window: a grid of text drawn through the GPU glyph renderer
//!
//! Type to fill the grid, Enter starts a new line, Tab toggles between the
//! GPU path and the (here absent) CPU path.
//!
//! Run with:
//!   cargo run -p termglyph-render --example terminal_window
//!
//! Set `TERMGLYPH_PROFILE=1` to serve puffin data on port 8585.

use std::sync::Arc;

use termglyph_core::profiling::{new_frame, profile_function, profile_scope};
use termglyph_core::{Config, ProfilingMode};
use termglyph_render::{
    GraphicsContext, GridSnapshot, RenderMode, RendererConfig, TerminalGrid, TerminalPresenter,
    TerminalRenderer,
};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowId};

const BANNER: [&str; 3] = [
    "termglyph terminal_window demo",
    "Tab toggles GPU mode. Type to write.",
    "",
];

struct Surface {
    window: Arc<Window>,
    context: Arc<GraphicsContext>,
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    presenter: TerminalPresenter,
    cursor: (usize, usize),
}

impl Surface {
    fn new(event_loop: &ActiveEventLoop) -> Result<Self, Box<dyn std::error::Error>> {
        profile_function!();

        let window = Arc::new(
            event_loop.create_window(
                Window::default_attributes()
                    .with_title("termglyph")
                    .with_inner_size(PhysicalSize::new(1280, 768)),
            )?,
        );

        let context = GraphicsContext::new_owned_sync()?;
        let surface = context.instance.create_surface(window.clone())?;
        let PhysicalSize { width, height } = window.inner_size();
        let config = surface
            .get_default_config(&context.adapter, width.max(1), height.max(1))
            .ok_or("surface is not supported by the adapter")?;
        surface.configure(&context.device, &config);

        let renderer_config = RendererConfig::default().with_padding(8);
        let cell = renderer_config.cell_size() as usize;
        let mut renderer = TerminalRenderer::with_system_fonts(context.clone(), renderer_config);
        renderer.on_surface_created(config.format)?;
        renderer.on_surface_resized(config.width, config.height);

        let grid = GridSnapshot::from_lines(
            config.width as usize / cell,
            config.height as usize / cell,
            BANNER,
        );

        let mut presenter = TerminalPresenter::new(renderer);
        presenter.set_grid(grid);
        presenter.set_mode(RenderMode::Gpu);

        Ok(Self {
            window,
            context,
            surface,
            config,
            presenter,
            cursor: (0, BANNER.len()),
        })
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.config.width = size.width;
        self.config.height = size.height;
        self.surface.configure(&self.context.device, &self.config);
        self.presenter
            .renderer_mut()
            .on_surface_resized(size.width, size.height);

        // Keep whatever fits of the old contents.
        let cell = self.presenter.renderer().config().cell_size() as usize;
        let (columns, rows) = (size.width as usize / cell, size.height as usize / cell);
        if let Some(old) = self.presenter.clear_grid() {
            let mut grid = GridSnapshot::new(columns, rows);
            for row in 0..old.rows().min(rows) {
                for column in 0..old.columns().min(columns) {
                    grid.set(column, row, old.char_at(column, row));
                }
            }
            self.presenter.set_grid(grid);
        }
    }

    fn type_text(&mut self, text: &str) {
        let Some(grid) = self.presenter.grid_mut() else {
            return;
        };
        let (columns, rows) = (grid.columns(), grid.rows());
        for ch in text.chars().filter(|c| !c.is_control()) {
            let (column, row) = &mut self.cursor;
            if *column >= columns {
                *column = 0;
                *row += 1;
            }
            if *row >= rows {
                grid.clear();
                *row = 0;
            }
            grid.set(*column, *row, ch);
            *column += 1;
        }
        self.presenter.invalidate();
    }

    fn new_line(&mut self) {
        self.cursor = (0, self.cursor.1 + 1);
    }

    fn toggle_mode(&mut self) {
        let mode = match self.presenter.mode() {
            RenderMode::Cpu => RenderMode::Gpu,
            RenderMode::Gpu => RenderMode::Cpu,
        };
        tracing::info!("Switching to {:?} rendering", mode);
        self.presenter.set_mode(mode);
    }

    fn redraw(&mut self) {
        profile_function!();
        new_frame();

        if !self.presenter.is_gpu_mode() {
            return;
        }

        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.context.device, &self.config);
                self.presenter.invalidate();
                return;
            }
            Err(err) => {
                tracing::warn!("Skipping frame: {}", err);
                return;
            }
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Terminal Frame Encoder"),
                });

        {
            profile_scope!("render_terminal");
            if let Err(err) = self.presenter.render_to(&mut encoder, &view) {
                tracing::error!("Terminal frame failed: {}", err);
            }
        }

        self.context.queue.submit(Some(encoder.finish()));
        self.window.pre_present_notify();
        frame.present();
    }
}

#[derive(Default)]
struct TerminalWindowDemo {
    surface: Option<Surface>,
}

impl ApplicationHandler for TerminalWindowDemo {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.surface.is_some() {
            return;
        }
        match Surface::new(event_loop) {
            Ok(surface) => self.surface = Some(surface),
            Err(err) => {
                tracing::error!("Failed to set up terminal window: {}", err);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("Close requested");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => surface.resize(size),
            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                match event.logical_key {
                    Key::Named(NamedKey::Tab) => surface.toggle_mode(),
                    Key::Named(NamedKey::Enter) => surface.new_line(),
                    _ => {
                        if let Some(text) = event.text {
                            surface.type_text(&text);
                        }
                    }
                }
            }
            WindowEvent::RedrawRequested => surface.redraw(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(surface) = self.surface.as_mut() {
            if surface.presenter.take_redraw_request() {
                surface.window.request_redraw();
            }
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let profiling = if std::env::var_os("TERMGLYPH_PROFILE").is_some() {
        ProfilingMode::WithWebserver
    } else {
        ProfilingMode::Off
    };
    Config {
        profiling,
        ..Config::default()
    }
    .apply();

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);
    event_loop.run_app(&mut TerminalWindowDemo::default())?;
    Ok(())
}
