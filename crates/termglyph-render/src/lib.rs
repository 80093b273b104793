//! termglyph Render
//!
//! Draws a terminal character grid with wgpu in a single batched draw call.
//!
//! - [`GlyphAtlas`] rasterizes printable ASCII into one texture and hands out
//!   per-glyph UV rectangles.
//! - [`MeshBuilder`] turns a [`TerminalGrid`] into six vertices per cell.
//! - [`TerminalRenderer`] owns the GPU side and is driven by the surface
//!   callbacks; [`TerminalPresenter`] switches it on and off.
//!
//! GPU access goes through [`RenderContext`](termglyph_test_utils::RenderContext),
//! implemented by [`GraphicsContext`] and, for tests, by `MockRenderContext`.

pub mod atlas;
pub mod config;
pub mod context;
mod context_impl;
pub mod error;
pub mod grid;
pub mod mesh;
pub mod pipeline;
pub mod presenter;
pub mod raster;
pub mod renderer;
#[cfg(test)]
mod testing;
pub mod transform;

pub use atlas::{GlyphAtlas, GlyphInfo};
pub use config::RendererConfig;
pub use context::{GraphicsContext, GraphicsContextDescriptor};
pub use error::{AtlasError, GraphicsError, RenderError, ResourceCreationError};
pub use grid::{GridSnapshot, TerminalGrid};
pub use mesh::{GlyphMesh, MeshBuilder};
pub use presenter::{RenderMode, TerminalPresenter};
pub use raster::{GlyphBitmap, GlyphRasterizer, MonospaceRasterizer};
pub use renderer::{AtlasState, PreparedFrame, TerminalRenderer};
pub use transform::{ProjectionUniform, orthographic_projection};

// Re-export the GPU abstraction so callers don't need a direct dependency.
pub use termglyph_test_utils::RenderContext;
