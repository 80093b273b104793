//! GPU resource wrappers that can be real or mock.
//!
//! These types wrap WGPU resources and allow for both real GPU operations
//! and mock implementations for testing.

/// Wrapper around GPU buffer that can be real or mock.
///
/// Users hold an owned `GpuBuffer`; cloning is cheap because `wgpu::Buffer`
/// is reference counted internally.
#[derive(Clone, Debug)]
pub struct GpuBuffer {
    inner: GpuBufferInner,
}

#[derive(Clone, Debug)]
enum GpuBufferInner {
    Real(wgpu::Buffer),
    #[cfg(feature = "mock")]
    Mock { id: usize, size: u64 },
}

impl GpuBuffer {
    /// Create from real WGPU buffer
    pub fn from_wgpu(buffer: wgpu::Buffer) -> Self {
        Self {
            inner: GpuBufferInner::Real(buffer),
        }
    }

    /// Create mock buffer (for testing)
    #[cfg(feature = "mock")]
    pub fn mock(id: usize, size: u64) -> Self {
        Self {
            inner: GpuBufferInner::Mock { id, size },
        }
    }

    /// Size of the buffer in bytes.
    pub fn size(&self) -> u64 {
        match &self.inner {
            GpuBufferInner::Real(buffer) => buffer.size(),
            #[cfg(feature = "mock")]
            GpuBufferInner::Mock { size, .. } => *size,
        }
    }

    /// Get the underlying wgpu::Buffer (if real)
    ///
    /// # Panics
    /// Panics if this is a mock buffer (test code should never call this)
    pub fn as_wgpu(&self) -> &wgpu::Buffer {
        match &self.inner {
            GpuBufferInner::Real(buffer) => buffer,
            #[cfg(feature = "mock")]
            GpuBufferInner::Mock { .. } => {
                panic!("Attempted to get wgpu::Buffer from mock buffer - this is a test-only buffer")
            }
        }
    }

    /// Check if this is a mock (useful in tests)
    #[cfg(feature = "mock")]
    pub fn is_mock(&self) -> bool {
        matches!(self.inner, GpuBufferInner::Mock { .. })
    }

    /// Get mock ID (for test assertions)
    #[cfg(feature = "mock")]
    pub fn mock_id(&self) -> Option<usize> {
        match &self.inner {
            GpuBufferInner::Mock { id, .. } => Some(*id),
            _ => None,
        }
    }
}

/// Wrapper around a 2D GPU texture and its default view.
#[derive(Clone, Debug)]
pub struct GpuTexture {
    inner: GpuTextureInner,
}

#[derive(Clone, Debug)]
enum GpuTextureInner {
    Real {
        texture: wgpu::Texture,
        view: wgpu::TextureView,
    },
    #[cfg(feature = "mock")]
    Mock {
        id: usize,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
    },
}

impl GpuTexture {
    /// Create from real WGPU texture, caching its default view.
    pub fn from_wgpu(texture: wgpu::Texture) -> Self {
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            inner: GpuTextureInner::Real { texture, view },
        }
    }

    /// Create mock texture (for testing)
    #[cfg(feature = "mock")]
    pub fn mock(id: usize, width: u32, height: u32, format: wgpu::TextureFormat) -> Self {
        Self {
            inner: GpuTextureInner::Mock {
                id,
                width,
                height,
                format,
            },
        }
    }

    pub fn width(&self) -> u32 {
        match &self.inner {
            GpuTextureInner::Real { texture, .. } => texture.width(),
            #[cfg(feature = "mock")]
            GpuTextureInner::Mock { width, .. } => *width,
        }
    }

    pub fn height(&self) -> u32 {
        match &self.inner {
            GpuTextureInner::Real { texture, .. } => texture.height(),
            #[cfg(feature = "mock")]
            GpuTextureInner::Mock { height, .. } => *height,
        }
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        match &self.inner {
            GpuTextureInner::Real { texture, .. } => texture.format(),
            #[cfg(feature = "mock")]
            GpuTextureInner::Mock { format, .. } => *format,
        }
    }

    /// Get the underlying wgpu::Texture (if real)
    ///
    /// # Panics
    /// Panics if this is a mock texture
    pub fn as_wgpu(&self) -> &wgpu::Texture {
        match &self.inner {
            GpuTextureInner::Real { texture, .. } => texture,
            #[cfg(feature = "mock")]
            GpuTextureInner::Mock { .. } => {
                panic!("Attempted to get wgpu::Texture from mock texture")
            }
        }
    }

    /// Get the cached default view (if real)
    ///
    /// # Panics
    /// Panics if this is a mock texture
    pub fn view(&self) -> &wgpu::TextureView {
        match &self.inner {
            GpuTextureInner::Real { view, .. } => view,
            #[cfg(feature = "mock")]
            GpuTextureInner::Mock { .. } => {
                panic!("Attempted to get wgpu::TextureView from mock texture")
            }
        }
    }

    /// Check if this is a mock
    #[cfg(feature = "mock")]
    pub fn is_mock(&self) -> bool {
        matches!(self.inner, GpuTextureInner::Mock { .. })
    }

    /// Get mock ID (for test assertions)
    #[cfg(feature = "mock")]
    pub fn mock_id(&self) -> Option<usize> {
        match &self.inner {
            GpuTextureInner::Mock { id, .. } => Some(*id),
            _ => None,
        }
    }
}

/// Declares an opaque real-or-mock wrapper for a GPU object that carries no
/// metadata worth inspecting in tests.
macro_rules! gpu_wrapper {
    ($(#[$meta:meta])* $name:ident, $inner:ident, $wgpu:ty) => {
        $(#[$meta])*
        #[derive(Clone, Debug)]
        pub struct $name {
            inner: $inner,
        }

        #[derive(Clone, Debug)]
        enum $inner {
            Real($wgpu),
            #[cfg(feature = "mock")]
            Mock { id: usize },
        }

        impl $name {
            /// Create from the real WGPU object
            pub fn from_wgpu(value: $wgpu) -> Self {
                Self {
                    inner: $inner::Real(value),
                }
            }

            /// Create a mock handle (for testing)
            #[cfg(feature = "mock")]
            pub fn mock(id: usize) -> Self {
                Self {
                    inner: $inner::Mock { id },
                }
            }

            /// Get the underlying WGPU object
            ///
            /// # Panics
            /// Panics if this is a mock handle
            pub fn as_wgpu(&self) -> &$wgpu {
                match &self.inner {
                    $inner::Real(value) => value,
                    #[cfg(feature = "mock")]
                    $inner::Mock { .. } => panic!(
                        concat!("Attempted to get the wgpu object from a mock ", stringify!($name))
                    ),
                }
            }

            /// Check if this is a mock
            #[cfg(feature = "mock")]
            pub fn is_mock(&self) -> bool {
                matches!(self.inner, $inner::Mock { .. })
            }

            /// Get mock ID (for test assertions)
            #[cfg(feature = "mock")]
            pub fn mock_id(&self) -> Option<usize> {
                match &self.inner {
                    $inner::Mock { id } => Some(*id),
                    _ => None,
                }
            }
        }
    };
}

gpu_wrapper!(
    /// Wrapper around GPU shader module that can be real or mock.
    GpuShaderModule,
    GpuShaderModuleInner,
    wgpu::ShaderModule
);

gpu_wrapper!(
    /// Wrapper around GPU render pipeline that can be real or mock.
    GpuRenderPipeline,
    GpuRenderPipelineInner,
    wgpu::RenderPipeline
);

gpu_wrapper!(
    /// Wrapper around GPU bind group layout that can be real or mock.
    GpuBindGroupLayout,
    GpuBindGroupLayoutInner,
    wgpu::BindGroupLayout
);

gpu_wrapper!(
    /// Wrapper around GPU bind group that can be real or mock.
    GpuBindGroup,
    GpuBindGroupInner,
    wgpu::BindGroup
);

gpu_wrapper!(
    /// Wrapper around GPU sampler that can be real or mock.
    GpuSampler,
    GpuSamplerInner,
    wgpu::Sampler
);

/// A resource bound into a bind group slot.
#[derive(Clone, Copy, Debug)]
pub enum GpuBindingResource<'a> {
    /// The whole buffer.
    Buffer(&'a GpuBuffer),
    /// The texture's default view.
    Texture(&'a GpuTexture),
    Sampler(&'a GpuSampler),
}

/// One entry of a bind group built from wrapped resources.
#[derive(Clone, Copy, Debug)]
pub struct GpuBindGroupEntry<'a> {
    pub binding: u32,
    pub resource: GpuBindingResource<'a>,
}

/// Render pipeline description that references wrapped resources.
///
/// WGPU descriptors borrow concrete `wgpu` objects, which a mock context
/// cannot produce, so pipelines are described in terms of the wrappers and the
/// context builds the pipeline layout itself.
#[derive(Clone, Debug)]
pub struct GpuRenderPipelineDescriptor<'a> {
    pub label: Option<&'a str>,
    pub shader: &'a GpuShaderModule,
    pub vertex_entry: &'a str,
    pub fragment_entry: &'a str,
    pub bind_group_layouts: &'a [&'a GpuBindGroupLayout],
    pub vertex_buffers: &'a [wgpu::VertexBufferLayout<'a>],
    pub target: wgpu::ColorTargetState,
    pub primitive: wgpu::PrimitiveState,
}
