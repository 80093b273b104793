//! Mock implementation of RenderContext for testing.
//!
//! This module provides a mock GPU context that records operations
//! without actually interacting with the GPU.

use std::collections::VecDeque;

use crate::{gpu_types::*, render_context::RenderContext};
use parking_lot::Mutex;
use wgpu::*;

/// Records a GPU operation call for verification in tests.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    CreateBuffer {
        label: Option<String>,
        size: u64,
        usage: BufferUsages,
    },
    WriteBuffer {
        buffer_id: usize,
        offset: u64,
        size: usize,
    },
    CreateTexture {
        width: u32,
        height: u32,
        format: TextureFormat,
        mip_level_count: u32,
    },
    WriteTexture {
        texture_id: usize,
        size: usize,
        bytes_per_row: u32,
        width: u32,
        height: u32,
    },
    CreateShaderModule {
        label: Option<String>,
    },
    CreateRenderPipeline {
        label: Option<String>,
        topology: PrimitiveTopology,
        vertex_buffer_count: usize,
    },
    CreateBindGroupLayout {
        label: Option<String>,
    },
    CreateBindGroup {
        label: Option<String>,
        entry_count: usize,
    },
    CreateSampler {
        label: Option<String>,
        mag_filter: FilterMode,
        min_filter: FilterMode,
        mipmap_filter: FilterMode,
    },
    PushErrorScope,
    PopErrorScope {
        error: Option<String>,
    },
}

/// Mock implementation of RenderContext for testing.
///
/// Methods take `&self` but record every call, so state lives behind
/// `parking_lot::Mutex` (the trait requires `Send + Sync`).
///
/// # Example
///
/// ```rust
/// use termglyph_test_utils::{MockRenderContext, RenderContext};
/// use wgpu::*;
///
/// let mock = MockRenderContext::new();
///
/// let buffer = mock.create_buffer(&BufferDescriptor {
///     label: None,
///     size: 1024,
///     usage: BufferUsages::VERTEX,
///     mapped_at_creation: false,
/// });
///
/// assert!(buffer.is_mock());
/// assert_eq!(mock.count_buffer_creates(), 1);
/// ```
pub struct MockRenderContext {
    /// Recorded calls for verification
    calls: Mutex<Vec<RenderCall>>,

    /// Counters for generating IDs
    next_buffer_id: Mutex<usize>,
    next_texture_id: Mutex<usize>,
    next_shader_id: Mutex<usize>,
    next_pipeline_id: Mutex<usize>,
    next_bind_group_layout_id: Mutex<usize>,
    next_bind_group_id: Mutex<usize>,
    next_sampler_id: Mutex<usize>,

    /// Errors returned by upcoming `pop_error_scope` calls, oldest first
    injected_errors: Mutex<VecDeque<Option<String>>>,
    max_texture_dimension_2d: u32,
}

fn next_id(counter: &Mutex<usize>) -> usize {
    let mut id = counter.lock();
    let current = *id;
    *id += 1;
    current
}

impl MockRenderContext {
    /// Create a new mock render context with wgpu's default limits.
    pub fn new() -> Self {
        Self::with_max_texture_dimension(Limits::default().max_texture_dimension_2d)
    }

    /// Create a mock whose device reports the given 2D texture size limit.
    pub fn with_max_texture_dimension(max_texture_dimension_2d: u32) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            next_buffer_id: Mutex::new(0),
            next_texture_id: Mutex::new(0),
            next_shader_id: Mutex::new(0),
            next_pipeline_id: Mutex::new(0),
            next_bind_group_layout_id: Mutex::new(0),
            next_bind_group_id: Mutex::new(0),
            next_sampler_id: Mutex::new(0),
            injected_errors: Mutex::new(VecDeque::new()),
            max_texture_dimension_2d,
        }
    }

    /// Make the next `pop_error_scope` report `message`.
    ///
    /// Injected outcomes are consumed in order; scopes popped after the queue
    /// drains report no error.
    pub fn fail_next_scope(&self, message: impl Into<String>) {
        self.injected_errors.lock().push_back(Some(message.into()));
    }

    /// Let the next `pop_error_scope` succeed, keeping later injected failures
    /// queued behind it.
    pub fn pass_next_scope(&self) {
        self.injected_errors.lock().push_back(None);
    }

    /// Get a copy of all recorded calls (for test assertions).
    pub fn calls(&self) -> Vec<RenderCall> {
        self.calls.lock().clone()
    }

    fn count(&self, predicate: impl Fn(&RenderCall) -> bool) -> usize {
        self.calls.lock().iter().filter(|call| predicate(call)).count()
    }

    /// Count calls of a specific type.
    pub fn count_buffer_creates(&self) -> usize {
        self.count(|call| matches!(call, RenderCall::CreateBuffer { .. }))
    }

    /// Count buffer write operations.
    pub fn count_buffer_writes(&self) -> usize {
        self.count(|call| matches!(call, RenderCall::WriteBuffer { .. }))
    }

    /// Count texture creates.
    pub fn count_texture_creates(&self) -> usize {
        self.count(|call| matches!(call, RenderCall::CreateTexture { .. }))
    }

    /// Count texture writes.
    pub fn count_texture_writes(&self) -> usize {
        self.count(|call| matches!(call, RenderCall::WriteTexture { .. }))
    }

    /// Count shader module creates.
    pub fn count_shader_creates(&self) -> usize {
        self.count(|call| matches!(call, RenderCall::CreateShaderModule { .. }))
    }

    /// Count render pipeline creates.
    pub fn count_render_pipeline_creates(&self) -> usize {
        self.count(|call| matches!(call, RenderCall::CreateRenderPipeline { .. }))
    }

    /// Count bind group creates.
    pub fn count_bind_group_creates(&self) -> usize {
        self.count(|call| matches!(call, RenderCall::CreateBindGroup { .. }))
    }

    /// Clear recorded calls (useful between test steps).
    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    /// Get total number of recorded calls.
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    fn record(&self, call: RenderCall) {
        self.calls.lock().push(call);
    }
}

impl Default for MockRenderContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderContext for MockRenderContext {
    fn create_buffer(&self, desc: &BufferDescriptor) -> GpuBuffer {
        let id = next_id(&self.next_buffer_id);
        self.record(RenderCall::CreateBuffer {
            label: desc.label.map(|s| s.to_string()),
            size: desc.size,
            usage: desc.usage,
        });
        GpuBuffer::mock(id, desc.size)
    }

    fn write_buffer(&self, buffer: &GpuBuffer, offset: u64, data: &[u8]) {
        if let Some(buffer_id) = buffer.mock_id() {
            self.record(RenderCall::WriteBuffer {
                buffer_id,
                offset,
                size: data.len(),
            });
        }
    }

    fn create_texture(&self, desc: &TextureDescriptor) -> GpuTexture {
        let id = next_id(&self.next_texture_id);
        self.record(RenderCall::CreateTexture {
            width: desc.size.width,
            height: desc.size.height,
            format: desc.format,
            mip_level_count: desc.mip_level_count,
        });
        GpuTexture::mock(id, desc.size.width, desc.size.height, desc.format)
    }

    fn write_texture(&self, texture: &GpuTexture, data: &[u8], bytes_per_row: u32, size: Extent3d) {
        if let Some(texture_id) = texture.mock_id() {
            self.record(RenderCall::WriteTexture {
                texture_id,
                size: data.len(),
                bytes_per_row,
                width: size.width,
                height: size.height,
            });
        }
    }

    fn max_texture_dimension_2d(&self) -> u32 {
        self.max_texture_dimension_2d
    }

    fn create_shader_module(&self, desc: &ShaderModuleDescriptor) -> GpuShaderModule {
        let id = next_id(&self.next_shader_id);
        self.record(RenderCall::CreateShaderModule {
            label: desc.label.map(|s| s.to_string()),
        });
        GpuShaderModule::mock(id)
    }

    fn create_render_pipeline(&self, desc: &GpuRenderPipelineDescriptor) -> GpuRenderPipeline {
        let id = next_id(&self.next_pipeline_id);
        self.record(RenderCall::CreateRenderPipeline {
            label: desc.label.map(|s| s.to_string()),
            topology: desc.primitive.topology,
            vertex_buffer_count: desc.vertex_buffers.len(),
        });
        GpuRenderPipeline::mock(id)
    }

    fn create_bind_group_layout(&self, desc: &BindGroupLayoutDescriptor) -> GpuBindGroupLayout {
        let id = next_id(&self.next_bind_group_layout_id);
        self.record(RenderCall::CreateBindGroupLayout {
            label: desc.label.map(|s| s.to_string()),
        });
        GpuBindGroupLayout::mock(id)
    }

    fn create_bind_group(
        &self,
        label: Option<&str>,
        _layout: &GpuBindGroupLayout,
        entries: &[GpuBindGroupEntry],
    ) -> GpuBindGroup {
        let id = next_id(&self.next_bind_group_id);
        self.record(RenderCall::CreateBindGroup {
            label: label.map(|s| s.to_string()),
            entry_count: entries.len(),
        });
        GpuBindGroup::mock(id)
    }

    fn create_sampler(&self, desc: &SamplerDescriptor) -> GpuSampler {
        let id = next_id(&self.next_sampler_id);
        self.record(RenderCall::CreateSampler {
            label: desc.label.map(|s| s.to_string()),
            mag_filter: desc.mag_filter,
            min_filter: desc.min_filter,
            mipmap_filter: desc.mipmap_filter,
        });
        GpuSampler::mock(id)
    }

    fn push_error_scope(&self) {
        self.record(RenderCall::PushErrorScope);
    }

    fn pop_error_scope(&self) -> Option<String> {
        let error = self.injected_errors.lock().pop_front().flatten();
        self.record(RenderCall::PopErrorScope {
            error: error.clone(),
        });
        error
    }
}
