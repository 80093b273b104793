//! Trait abstracting GPU operations for testing.
//!
//! The `RenderContext` trait provides an abstraction over GPU operations,
//! allowing for both real GPU usage and mock implementations for testing.

use crate::gpu_types::*;
use wgpu::{
    BindGroupLayoutDescriptor, BufferDescriptor, Extent3d, SamplerDescriptor,
    ShaderModuleDescriptor, TextureDescriptor,
};

/// Trait abstracting GPU resource creation and operations.
///
/// Methods take `&self` and return owned wrapper types, so one context can be
/// shared behind an `Arc` and mock implementations can record calls through
/// interior mutability. The trait is object-safe (`dyn RenderContext`).
///
/// # Example
///
/// ```rust,no_run
/// use termglyph_test_utils::RenderContext;
/// use wgpu::{BufferDescriptor, BufferUsages};
///
/// fn upload(ctx: &dyn RenderContext, data: &[u8]) {
///     let buffer = ctx.create_buffer(&BufferDescriptor {
///         label: None,
///         size: data.len() as u64,
///         usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
///         mapped_at_creation: false,
///     });
///     ctx.write_buffer(&buffer, 0, data);
/// }
/// ```
pub trait RenderContext: Send + Sync {
    // Buffer operations

    /// Create a GPU buffer.
    fn create_buffer(&self, desc: &BufferDescriptor) -> GpuBuffer;

    /// Write data to a buffer.
    ///
    /// For real buffers, this maps to `queue.write_buffer()`.
    /// For mock buffers, this records the operation for test verification.
    fn write_buffer(&self, buffer: &GpuBuffer, offset: u64, data: &[u8]);

    // Texture operations

    /// Create a GPU texture.
    fn create_texture(&self, desc: &TextureDescriptor) -> GpuTexture;

    /// Write tightly packed texel rows into mip level 0 of a texture, starting
    /// at the origin.
    fn write_texture(&self, texture: &GpuTexture, data: &[u8], bytes_per_row: u32, size: Extent3d);

    /// Maximum width/height of a 2D texture on this device.
    fn max_texture_dimension_2d(&self) -> u32;

    // Shader operations

    /// Create a shader module from source code.
    fn create_shader_module(&self, desc: &ShaderModuleDescriptor) -> GpuShaderModule;

    // Pipeline operations

    /// Create a render pipeline, including its pipeline layout.
    fn create_render_pipeline(&self, desc: &GpuRenderPipelineDescriptor) -> GpuRenderPipeline;

    // Bind group operations

    /// Create a bind group layout.
    fn create_bind_group_layout(&self, desc: &BindGroupLayoutDescriptor) -> GpuBindGroupLayout;

    /// Create a bind group from wrapped resources.
    fn create_bind_group(
        &self,
        label: Option<&str>,
        layout: &GpuBindGroupLayout,
        entries: &[GpuBindGroupEntry],
    ) -> GpuBindGroup;

    // Sampler operations

    /// Create a texture sampler.
    fn create_sampler(&self, desc: &SamplerDescriptor) -> GpuSampler;

    // Error capture

    /// Start capturing validation and out-of-memory errors.
    fn push_error_scope(&self);

    /// Stop capturing and return the first error raised since the matching
    /// [`push_error_scope`](Self::push_error_scope), if any.
    fn pop_error_scope(&self) -> Option<String>;
}
