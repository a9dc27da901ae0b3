//! Shooting-star trails: one shared two-vertex line segment drawn once per active star.

use bytemuck::{Pod, Zeroable};
use std::num::NonZeroU64;

use crate::buffer::{TrailInstance, TrailVertex};

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct TrailUniform {
    pub view_proj: [[f32; 4]; 4],
}

pub struct TrailPipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub uniform_layout: wgpu::BindGroupLayout,
}

impl TrailPipeline {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("trail-shader"),
            source: wgpu::ShaderSource::Wgsl(TRAIL_SHADER_SOURCE.into()),
        });

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("trail-uniform-layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: NonZeroU64::new(64), // mat4x4<f32>
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("trail-pipeline-layout"),
            bind_group_layouts: &[&uniform_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("trail-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_trail"),
                buffers: &[TrailVertex::layout(), TrailInstance::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_trail"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
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
        }
    }

    /// Draw `instance_count` trails from the segment and instance buffers.
    pub fn draw(
        &self,
        pass: &mut wgpu::RenderPass<'_>,
        uniform_bind_group: &wgpu::BindGroup,
        segment: &wgpu::Buffer,
        instances: &wgpu::Buffer,
        instance_count: u32,
    ) {
        if instance_count == 0 {
            return;
        }
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, uniform_bind_group, &[]);
        pass.set_vertex_buffer(0, segment.slice(..));
        pass.set_vertex_buffer(1, instances.slice(..));
        pass.draw(0..2, 0..instance_count);
    }
}

/// The WGSL source for the trail shader.
pub const TRAIL_SHADER_SOURCE: &str = r#"
struct TrailUniform {
    view_proj: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> trail: TrailUniform;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) model_0: vec4<f32>,
    @location(2) model_1: vec4<f32>,
    @location(3) model_2: vec4<f32>,
    @location(4) model_3: vec4<f32>,
    @location(5) opacity: f32,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) opacity: f32,
};

@vertex
fn vs_trail(in: VertexInput) -> VertexOutput {
    let model = mat4x4<f32>(in.model_0, in.model_1, in.model_2, in.model_3);
    var out: VertexOutput;
    out.clip_position = trail.view_proj * model * vec4<f32>(in.position, 1.0);
    out.opacity = in.opacity;
    return out;
}

@fragment
fn fs_trail(in: VertexOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(1.0, 1.0, 1.0, in.opacity);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_size() {
        assert_eq!(std::mem::size_of::<TrailUniform>(), 64);
    }

    #[test]
    fn test_shader_entry_points() {
        assert!(TRAIL_SHADER_SOURCE.contains("fn vs_trail"));
        assert!(TRAIL_SHADER_SOURCE.contains("fn fs_trail"));
    }

    #[test]
    fn test_shader_reads_every_instance_location() {
        for location in 1..=5 {
            assert!(
                TRAIL_SHADER_SOURCE.contains(&format!("@location({location})")),
                "missing location {location}"
            );
        }
    }
}
