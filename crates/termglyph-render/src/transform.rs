//! Pixel-space projection.
//!
//! Mesh vertices are in surface pixels with the origin at the bottom-left and
//! Y pointing up. The projection maps `[0, width] x [0, height]` onto clip
//! space; depth is unused.

use bytemuck::{Pod, Zeroable};
use termglyph_core::math::Mat4;

/// Orthographic projection for a `width x height` pixel surface.
pub fn orthographic_projection(width: f32, height: f32) -> Mat4 {
    Mat4::orthographic_rh(0.0, width, 0.0, height, -1.0, 1.0)
}

/// Projection matrix as laid out in the shader's uniform buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable, PartialEq)]
pub struct ProjectionUniform {
    pub matrix: [[f32; 4]; 4],
}

impl ProjectionUniform {
    pub fn identity() -> Self {
        Self::from(Mat4::IDENTITY)
    }

    pub fn for_surface(width: u32, height: u32) -> Self {
        Self::from(orthographic_projection(width as f32, height as f32))
    }
}

impl From<Mat4> for ProjectionUniform {
    fn from(matrix: Mat4) -> Self {
        Self {
            matrix: matrix.to_cols_array_2d(),
        }
    }
}
