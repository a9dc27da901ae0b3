//! Instanced, camera-facing sprite quads for the point clouds.
//!
//! Each point is a quad expanded in clip space around its projected center. The
//! half-extent in clip units is `size / 2` so that, after the perspective divide,
//! the on-screen size is `size / depth` in NDC, shrinking with distance.

use bytemuck::{Pod, Zeroable};
use std::num::NonZeroU64;

use crate::buffer::{MeshBuffer, QuadVertex, SpriteInstance};

/// Per-cloud uniform block.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct SpriteUniform {
    pub view_proj: [[f32; 4]; 4],
    /// Universe group transform.
    pub model: [[f32; 4]; 4],
    /// Material tint in rgb, opacity in a.
    pub tint: [f32; 4],
    /// x: sprite size, y: viewport aspect, z: 1.0 when per-point colors apply.
    pub params: [f32; 4],
}

/// Uniform buffer, bind group and instance data for one cloud.
pub struct SpriteLayer {
    pub uniform_buffer: wgpu::Buffer,
    pub uniform_bind_group: wgpu::BindGroup,
    pub instance_buffer: wgpu::Buffer,
    pub instance_count: u32,
}

impl SpriteLayer {
    pub fn destroy(&self) {
        self.uniform_buffer.destroy();
        self.instance_buffer.destroy();
    }
}

/// Additively blended sprites; every cloud layer draws through this pipeline.
pub struct SpritePipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub uniform_layout: wgpu::BindGroupLayout,
    pub texture_layout: wgpu::BindGroupLayout,
}

impl SpritePipeline {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sprite-shader"),
            source: wgpu::ShaderSource::Wgsl(SPRITE_SHADER_SOURCE.into()),
        });

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sprite-uniform-layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: NonZeroU64::new(std::mem::size_of::<SpriteUniform>() as u64),
                },
                count: None,
            }],
        });
        let texture_layout = crate::texture::SpriteTexture::bind_group_layout(device);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sprite-pipeline-layout"),
            bind_group_layouts: &[&uniform_layout, &texture_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("sprite-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_sprite"),
                buffers: &[QuadVertex::layout(), SpriteInstance::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_sprite"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(ADDITIVE_BLEND),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        Self {
            pipeline,
            uniform_layout,
            texture_layout,
        }
    }

    /// Draw every instance of `layer` over the shared quad.
    pub fn draw(
        &self,
        pass: &mut wgpu::RenderPass<'_>,
        quad: &MeshBuffer,
        texture_bind_group: &wgpu::BindGroup,
        layer: &SpriteLayer,
    ) {
        if layer.instance_count == 0 {
            return;
        }
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &layer.uniform_bind_group, &[]);
        pass.set_bind_group(1, texture_bind_group, &[]);
        quad.bind(pass);
        pass.set_vertex_buffer(1, layer.instance_buffer.slice(..));
        pass.draw_indexed(0..quad.index_count, 0, 0..layer.instance_count);
    }
}

/// `src * src_alpha + dst`: overlapping sprites brighten instead of occluding.
pub const ADDITIVE_BLEND: wgpu::BlendState = wgpu::BlendState {
    color: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::SrcAlpha,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
    alpha: wgpu::BlendComponent::OVER,
};

/// The WGSL source for the sprite shader.
pub const SPRITE_SHADER_SOURCE: &str = r#"
struct SpriteUniform {
    view_proj: mat4x4<f32>,
    model: mat4x4<f32>,
    tint: vec4<f32>,
    params: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> sprite: SpriteUniform;

@group(1) @binding(0)
var sprite_texture: texture_2d<f32>;
@group(1) @binding(1)
var sprite_sampler: sampler;

struct VertexInput {
    @location(0) corner: vec2<f32>,
    @location(1) position: vec3<f32>,
    @location(2) color: vec3<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
    @location(1) color: vec3<f32>,
};

@vertex
fn vs_sprite(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    let center = sprite.view_proj * sprite.model * vec4<f32>(in.position, 1.0);

    // clip.w is view depth, so a clip-space offset of size/2 becomes size/depth after the divide.
    let half_extent = 0.5 * sprite.params.x;
    let offset = vec2<f32>(in.corner.x * half_extent / sprite.params.y, in.corner.y * half_extent);
    out.clip_position = vec4<f32>(center.xy + offset, center.z, center.w);

    out.uv = vec2<f32>(in.corner.x * 0.5 + 0.5, 0.5 - in.corner.y * 0.5);
    out.color = select(vec3<f32>(1.0), in.color, sprite.params.z > 0.5);
    return out;
}

@fragment
fn fs_sprite(in: VertexOutput) -> @location(0) vec4<f32> {
    let texel = textureSample(sprite_texture, sprite_sampler, in.uv);
    let rgb = sprite.tint.rgb * in.color * texel.rgb;
    return vec4<f32>(rgb, sprite.tint.a * texel.a);
}
"#;
