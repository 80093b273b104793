//! CPU/GPU presentation switch.
//!
//! The terminal view either draws text itself (`Cpu`) or hands frames to the
//! [`TerminalRenderer`] (`Gpu`). The mode is plain state on the presenter;
//! the renderer only runs while the presenter is in `Gpu` mode.

use crate::error::RenderError;
use crate::grid::{GridSnapshot, TerminalGrid};
use crate::renderer::{PreparedFrame, TerminalRenderer};

/// Which path draws the terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderMode {
    /// The host view's own text renderer.
    #[default]
    Cpu,
    /// The batched glyph renderer.
    Gpu,
}

/// Owns the renderer, the attached grid and the current [`RenderMode`].
///
/// Redraws are requested, not performed: the host polls
/// [`take_redraw_request`](Self::take_redraw_request) (for example from a
/// winit `about_to_wait`) and schedules a frame.
pub struct TerminalPresenter<G: TerminalGrid = GridSnapshot> {
    renderer: TerminalRenderer,
    grid: Option<G>,
    mode: RenderMode,
    redraw_requested: bool,
}

impl<G: TerminalGrid> TerminalPresenter<G> {
    /// Presenter in `Cpu` mode with no grid attached.
    pub fn new(renderer: TerminalRenderer) -> Self {
        Self {
            renderer,
            grid: None,
            mode: RenderMode::Cpu,
            redraw_requested: false,
        }
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn is_gpu_mode(&self) -> bool {
        self.mode == RenderMode::Gpu
    }

    /// Switch modes. Entering `Gpu` always requests a redraw.
    pub fn set_mode(&mut self, mode: RenderMode) {
        if self.mode != mode {
            tracing::debug!("Render mode {:?} -> {:?}", self.mode, mode);
        }
        self.mode = mode;
        if mode == RenderMode::Gpu {
            self.redraw_requested = true;
        }
    }

    /// Note that the terminal contents changed. Only requests a redraw in
    /// `Gpu` mode; in `Cpu` mode the host view repaints itself.
    pub fn invalidate(&mut self) {
        if self.mode == RenderMode::Gpu {
            self.redraw_requested = true;
        }
    }

    /// Whether a redraw was requested since the last call. Clears the flag.
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }

    /// Attach the grid to draw.
    pub fn set_grid(&mut self, grid: G) {
        self.grid = Some(grid);
        self.invalidate();
    }

    /// Detach the grid. Later frames draw nothing.
    pub fn clear_grid(&mut self) -> Option<G> {
        self.grid.take()
    }

    pub fn grid(&self) -> Option<&G> {
        self.grid.as_ref()
    }

    /// Mutable access to the attached grid. Call [`invalidate`](Self::invalidate)
    /// after changing it.
    pub fn grid_mut(&mut self) -> Option<&mut G> {
        self.grid.as_mut()
    }

    pub fn renderer(&self) -> &TerminalRenderer {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut TerminalRenderer {
        &mut self.renderer
    }

    /// Prepare a frame for the attached grid.
    ///
    /// `Ok(None)` in `Cpu` mode or when no grid is attached.
    pub fn draw_frame(&mut self) -> Result<Option<PreparedFrame<'_>>, RenderError> {
        if self.mode == RenderMode::Cpu {
            return Ok(None);
        }
        match &self.grid {
            Some(grid) => self.renderer.prepare_frame(grid),
            None => Ok(None),
        }
    }

    /// Clear `target` and draw the attached grid into it.
    ///
    /// Does nothing in `Cpu` mode. Without a grid the target is only cleared.
    /// Returns the number of vertices drawn.
    pub fn render_to(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
    ) -> Result<u32, RenderError> {
        if self.mode == RenderMode::Cpu {
            return Ok(0);
        }
        match &self.grid {
            Some(grid) => self.renderer.draw_frame(grid, encoder, target),
            None => {
                self.renderer.clear(encoder, target);
                Ok(0)
            }
        }
    }
}
