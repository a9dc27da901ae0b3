//! The wgpu [`RenderTarget`]: draws the clouds and trails to a window surface.

use bytemuck::Zeroable;
use stardrift_scene::{POOL_SIZE, SceneAnimator, trail_segment};

use crate::buffer::{BufferAllocator, MeshBuffer, TrailInstance, TrailVertex};
use crate::camera::Camera;
use crate::draw::{DrawList, sprite_instances};
use crate::gpu::{RenderContext, SurfaceError};
use crate::pass::{FrameEncoder, RenderPassBuilder};
use crate::sprite_pipeline::{SpriteLayer, SpritePipeline, SpriteUniform};
use crate::surface::Viewport;
use crate::target::RenderTarget;
use crate::texture::SpriteTexture;
use crate::trail_pipeline::{TrailPipeline, TrailUniform};

/// GPU resources created by [`RenderTarget::upload`].
struct SceneResources {
    sprite: SpriteTexture,
    layers: Vec<SpriteLayer>,
    trail_segment: wgpu::Buffer,
    trail_instances: wgpu::Buffer,
    trail_uniform: wgpu::Buffer,
    trail_bind_group: wgpu::BindGroup,
}

impl SceneResources {
    fn destroy(&self) {
        self.sprite.destroy();
        for layer in &self.layers {
            layer.destroy();
        }
        self.trail_segment.destroy();
        self.trail_instances.destroy();
        self.trail_uniform.destroy();
    }
}

pub struct SceneRenderer {
    context: RenderContext,
    viewport: Viewport,
    sprite_pipeline: SpritePipeline,
    trail_pipeline: TrailPipeline,
    quad: MeshBuffer,
    pass: RenderPassBuilder,
    resources: Option<SceneResources>,
}

impl SceneRenderer {
    /// Build pipelines against an initialised context. Scene data arrives with `upload`.
    pub fn new(context: RenderContext, viewport: Viewport) -> Self {
        let sprite_pipeline = SpritePipeline::new(&context.device, context.surface_format);
        let trail_pipeline = TrailPipeline::new(&context.device, context.surface_format);
        let quad = BufferAllocator::new(&context.device).create_quad("sprite-quad");

        log::info!(
            "Scene renderer ready: {:?}, drawing buffer {}x{}",
            context.surface_format,
            context.surface_config.width,
            context.surface_config.height
        );

        Self {
            context,
            viewport,
            sprite_pipeline,
            trail_pipeline,
            quad,
            pass: RenderPassBuilder::new().label("backdrop-pass"),
            resources: None,
        }
    }

    fn create_resources(&self, scene: &SceneAnimator) -> Option<SceneResources> {
        let device = &self.context.device;
        let alloc = BufferAllocator::new(device);

        let sprite = match SpriteTexture::upload(
            device,
            &self.context.queue,
            &self.sprite_pipeline.texture_layout,
            scene.sprite(),
        ) {
            Ok(sprite) => sprite,
            Err(e) => {
                log::error!("Sprite upload failed: {e}");
                return None;
            }
        };

        let layers = scene
            .clouds()
            .iter()
            .map(|cloud| {
                let label = cloud.kind.label();
                let instances = sprite_instances(cloud);
                let uniform_buffer = alloc.create_uniform_buffer(
                    &format!("{label}-uniform"),
                    &SpriteUniform::zeroed(),
                );
                let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some(&format!("{label}-uniform-bind-group")),
                    layout: &self.sprite_pipeline.uniform_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: uniform_buffer.as_entire_binding(),
                    }],
                });
                SpriteLayer {
                    uniform_buffer,
                    uniform_bind_group,
                    instance_buffer: alloc.create_vertex_buffer(
                        &format!("{label}-instances"),
                        bytemuck::cast_slice(&instances),
                    ),
                    instance_count: instances.len() as u32,
                }
            })
            .collect();

        let segment = trail_segment().map(|p| TrailVertex {
            position: p.to_array(),
        });
        let trail_segment =
            alloc.create_vertex_buffer("trail-segment", bytemuck::cast_slice(&segment));
        let trail_instances =
            alloc.create_dynamic_vertex_buffer::<TrailInstance>("trail-instances", POOL_SIZE);
        let trail_uniform = alloc.create_uniform_buffer(
            "trail-uniform",
            &TrailUniform {
                view_proj: glam::Mat4::IDENTITY.to_cols_array_2d(),
            },
        );
        let trail_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("trail-uniform-bind-group"),
            layout: &self.trail_pipeline.uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: trail_uniform.as_entire_binding(),
            }],
        });

        Some(SceneResources {
            sprite,
            layers,
            trail_segment,
            trail_instances,
            trail_uniform,
            trail_bind_group,
        })
    }
}

impl RenderTarget for SceneRenderer {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn upload(&mut self, scene: &SceneAnimator) {
        if let Some(old) = self.resources.take() {
            old.destroy();
        }
        self.resources = self.create_resources(scene);
    }

    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        let size = viewport.drawing_buffer_size();
        self.context.resize(size.width, size.height);
        log::debug!(
            "Surface resized to {}x{} (pixel ratio {})",
            size.width,
            size.height,
            viewport.pixel_ratio()
        );
    }

    fn submit(&mut self, scene: &SceneAnimator, camera: &Camera) -> Result<(), SurfaceError> {
        let Some(resources) = &self.resources else {
            return Ok(());
        };
        let draws = DrawList::build(scene, camera);
        let surface_texture = self.context.get_current_texture()?;

        let queue = &self.context.queue;
        for (layer, cloud) in resources.layers.iter().zip(&draws.clouds) {
            queue.write_buffer(&layer.uniform_buffer, 0, bytemuck::bytes_of(&cloud.uniform));
        }
        queue.write_buffer(
            &resources.trail_uniform,
            0,
            bytemuck::bytes_of(&TrailUniform {
                view_proj: draws.view_proj.to_cols_array_2d(),
            }),
        );
        let trail_count = draws.trails.len().min(POOL_SIZE);
        if trail_count > 0 {
            queue.write_buffer(
                &resources.trail_instances,
                0,
                bytemuck::cast_slice(&draws.trails[..trail_count]),
            );
        }

        let mut frame = FrameEncoder::new(&self.context.device, queue, surface_texture);
        if let Some(mut pass) = frame.begin_render_pass(&self.pass) {
            for layer in &resources.layers {
                self.sprite_pipeline
                    .draw(&mut pass, &self.quad, &resources.sprite.bind_group, layer);
            }
            self.trail_pipeline.draw(
                &mut pass,
                &resources.trail_bind_group,
                &resources.trail_segment,
                &resources.trail_instances,
                trail_count as u32,
            );
        }
        frame.submit();
        Ok(())
    }

    fn release(mut self) {
        if let Some(resources) = self.resources.take() {
            resources.destroy();
        }
        self.quad.destroy();
        log::info!("Scene renderer released");
        // Dropping the context detaches the surface from the window.
    }
}
