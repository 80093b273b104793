//! GPU objects for drawing glyph meshes.
//!
//! All creation goes through [`RenderContext`] inside error scopes, so an
//! invalid object is reported as a [`ResourceCreationError`] instead of
//! surfacing later as a device error.

use crate::atlas::GlyphAtlas;
use crate::error::{AtlasError, RenderError, ResourceCreationError};
use crate::mesh::GlyphMesh;
use crate::transform::ProjectionUniform;
use termglyph_test_utils::{
    GpuBindGroup, GpuBindGroupEntry, GpuBindGroupLayout, GpuBindingResource, GpuBuffer,
    GpuRenderPipeline, GpuRenderPipelineDescriptor, GpuSampler, RenderContext,
};

const SHADER_SOURCE: &str = include_str!("shaders/terminal.wgsl");

const POSITION_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
const UV_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x2];

/// Positions and UVs live in separate vertex buffers.
const VERTEX_BUFFERS: [wgpu::VertexBufferLayout<'static>; 2] = [
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<[f32; 3]>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &POSITION_ATTRIBUTES,
    },
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<[f32; 2]>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &UV_ATTRIBUTES,
    },
];

/// Run `create` inside an error scope and map a captured error with `kind`.
fn scoped<T>(
    ctx: &dyn RenderContext,
    kind: fn(String) -> ResourceCreationError,
    create: impl FnOnce() -> T,
) -> Result<T, ResourceCreationError> {
    ctx.push_error_scope();
    let value = create();
    match ctx.pop_error_scope() {
        None => Ok(value),
        Some(message) => {
            let err = kind(message);
            tracing::error!("{}", err);
            Err(err)
        }
    }
}

/// Shader, layouts, sampler and projection uniform for one surface format.
pub struct GlyphPipeline {
    pipeline: GpuRenderPipeline,
    texture_layout: GpuBindGroupLayout,
    sampler: GpuSampler,
    projection_buffer: GpuBuffer,
    projection_bind_group: GpuBindGroup,
}

impl GlyphPipeline {
    /// Create the pipeline for `surface_format`. The projection starts as
    /// identity until the first resize.
    pub fn new(
        ctx: &dyn RenderContext,
        surface_format: wgpu::TextureFormat,
    ) -> Result<Self, ResourceCreationError> {
        let shader = scoped(ctx, ResourceCreationError::Shader, || {
            ctx.create_shader_module(&wgpu::ShaderModuleDescriptor {
                label: Some("Terminal Glyph Shader"),
                source: wgpu::ShaderSource::Wgsl(SHADER_SOURCE.into()),
            })
        })?;

        let projection_buffer = scoped(ctx, ResourceCreationError::Buffer, || {
            let buffer = ctx.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Terminal Projection Buffer"),
                size: std::mem::size_of::<ProjectionUniform>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            ctx.write_buffer(
                &buffer,
                0,
                bytemuck::bytes_of(&ProjectionUniform::identity()),
            );
            buffer
        })?;

        let (pipeline, texture_layout, sampler, projection_bind_group) =
            scoped(ctx, ResourceCreationError::Pipeline, || {
                let texture_layout =
                    ctx.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                        label: Some("Terminal Atlas Bind Group Layout"),
                        entries: &[
                            wgpu::BindGroupLayoutEntry {
                                binding: 0,
                                visibility: wgpu::ShaderStages::FRAGMENT,
                                ty: wgpu::BindingType::Texture {
                                    multisampled: false,
                                    view_dimension: wgpu::TextureViewDimension::D2,
                                    sample_type: wgpu::TextureSampleType::Float {
                                        filterable: true,
                                    },
                                },
                                count: None,
                            },
                            wgpu::BindGroupLayoutEntry {
                                binding: 1,
                                visibility: wgpu::ShaderStages::FRAGMENT,
                                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                                count: None,
                            },
                        ],
                    });

                let projection_layout =
                    ctx.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                        label: Some("Terminal Projection Bind Group Layout"),
                        entries: &[wgpu::BindGroupLayoutEntry {
                            binding: 0,
                            visibility: wgpu::ShaderStages::VERTEX,
                            ty: wgpu::BindingType::Buffer {
                                ty: wgpu::BufferBindingType::Uniform,
                                has_dynamic_offset: false,
                                min_binding_size: None,
                            },
                            count: None,
                        }],
                    });

                // Nearest in both directions keeps cell edges crisp; the atlas
                // has a single mip level.
                let sampler = ctx.create_sampler(&wgpu::SamplerDescriptor {
                    label: Some("Terminal Atlas Sampler"),
                    address_mode_u: wgpu::AddressMode::ClampToEdge,
                    address_mode_v: wgpu::AddressMode::ClampToEdge,
                    address_mode_w: wgpu::AddressMode::ClampToEdge,
                    mag_filter: wgpu::FilterMode::Nearest,
                    min_filter: wgpu::FilterMode::Nearest,
                    mipmap_filter: wgpu::FilterMode::Nearest,
                    ..Default::default()
                });

                let projection_bind_group = ctx.create_bind_group(
                    Some("Terminal Projection Bind Group"),
                    &projection_layout,
                    &[GpuBindGroupEntry {
                        binding: 0,
                        resource: GpuBindingResource::Buffer(&projection_buffer),
                    }],
                );

                let pipeline = ctx.create_render_pipeline(&GpuRenderPipelineDescriptor {
                    label: Some("Terminal Glyph Pipeline"),
                    shader: &shader,
                    vertex_entry: "vs_main",
                    fragment_entry: "fs_main",
                    bind_group_layouts: &[&texture_layout, &projection_layout],
                    vertex_buffers: &VERTEX_BUFFERS,
                    // Glyph cells are opaque, so no blending.
                    target: wgpu::ColorTargetState {
                        format: surface_format,
                        blend: None,
                        write_mask: wgpu::ColorWrites::ALL,
                    },
                    primitive: wgpu::PrimitiveState {
                        topology: wgpu::PrimitiveTopology::TriangleList,
                        strip_index_format: None,
                        front_face: wgpu::FrontFace::Ccw,
                        cull_mode: None,
                        polygon_mode: wgpu::PolygonMode::Fill,
                        unclipped_depth: false,
                        conservative: false,
                    },
                });

                (pipeline, texture_layout, sampler, projection_bind_group)
            })?;

        tracing::info!("Created terminal glyph pipeline for {:?}", surface_format);

        Ok(Self {
            pipeline,
            texture_layout,
            sampler,
            projection_buffer,
            projection_bind_group,
        })
    }

    /// Upload the projection used by subsequent draws.
    pub fn set_projection(&self, ctx: &dyn RenderContext, projection: &ProjectionUniform) {
        ctx.write_buffer(&self.projection_buffer, 0, bytemuck::bytes_of(projection));
    }

    /// Upload `atlas` into a new texture and bind it with the nearest sampler.
    pub fn upload_atlas(
        &self,
        ctx: &dyn RenderContext,
        atlas: &GlyphAtlas,
        format: wgpu::TextureFormat,
    ) -> Result<AtlasTexture, RenderError> {
        let (width, height) = (atlas.atlas_width(), atlas.atlas_height());
        let max = ctx.max_texture_dimension_2d();
        if width > max || height > max {
            return Err(AtlasError::TooLarge { width, height, max }.into());
        }

        let bind_group = scoped(ctx, ResourceCreationError::Texture, || {
            let size = wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            };
            let texture = ctx.create_texture(&wgpu::TextureDescriptor {
                label: Some("Terminal Glyph Atlas"),
                size,
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            });
            ctx.write_texture(&texture, atlas.image(), width * 4, size);

            ctx.create_bind_group(
                Some("Terminal Atlas Bind Group"),
                &self.texture_layout,
                &[
                    GpuBindGroupEntry {
                        binding: 0,
                        resource: GpuBindingResource::Texture(&texture),
                    },
                    GpuBindGroupEntry {
                        binding: 1,
                        resource: GpuBindingResource::Sampler(&self.sampler),
                    },
                ],
            )
        })?;

        tracing::info!("Uploaded {}x{} glyph atlas", width, height);

        Ok(AtlasTexture { bind_group })
    }

    /// Create and fill the position and UV buffers for `mesh`.
    ///
    /// Returns `Ok(None)` for an empty mesh.
    pub fn upload_mesh(
        &self,
        ctx: &dyn RenderContext,
        mesh: &GlyphMesh,
    ) -> Result<Option<MeshBuffers>, ResourceCreationError> {
        if mesh.is_empty() {
            return Ok(None);
        }

        let buffers = scoped(ctx, ResourceCreationError::Buffer, || {
            let stream = |label, data: &[f32]| {
                let bytes: &[u8] = bytemuck::cast_slice(data);
                let buffer = ctx.create_buffer(&wgpu::BufferDescriptor {
                    label: Some(label),
                    size: bytes.len() as u64,
                    usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                });
                ctx.write_buffer(&buffer, 0, bytes);
                buffer
            };

            MeshBuffers {
                positions: stream("Terminal Position Buffer", mesh.position_data()),
                uvs: stream("Terminal UV Buffer", mesh.uv_data()),
                vertex_count: mesh.vertex_count() as u32,
            }
        })?;

        Ok(Some(buffers))
    }

    /// Bind everything and issue the single draw for `mesh`.
    pub fn record(
        &self,
        pass: &mut wgpu::RenderPass<'_>,
        atlas: &AtlasTexture,
        mesh: &MeshBuffers,
    ) {
        pass.set_pipeline(self.pipeline.as_wgpu());
        pass.set_bind_group(0, atlas.bind_group.as_wgpu(), &[]);
        pass.set_bind_group(1, self.projection_bind_group.as_wgpu(), &[]);
        pass.set_vertex_buffer(0, mesh.positions.as_wgpu().slice(..));
        pass.set_vertex_buffer(1, mesh.uvs.as_wgpu().slice(..));
        pass.draw(0..mesh.vertex_count, 0..1);
    }
}

/// The uploaded atlas, bound together with its sampler.
pub struct AtlasTexture {
    bind_group: GpuBindGroup,
}

/// Per-frame vertex streams.
pub struct MeshBuffers {
    positions: GpuBuffer,
    uvs: GpuBuffer,
    vertex_count: u32,
}

impl MeshBuffers {
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }
}
