//! CPU-side frame preparation: everything a target needs to draw one frame of the
//! scene, independent of any GPU handle.

use glam::Mat4;
use stardrift_scene::{LayerKind, PointCloud, Rgb, SceneAnimator};

use crate::buffer::{SpriteInstance, TrailInstance};
use crate::camera::Camera;
use crate::sprite_pipeline::SpriteUniform;

/// Draw parameters for one point cloud this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CloudDraw {
    pub kind: LayerKind,
    pub instance_count: u32,
    pub uniform: SpriteUniform,
}

/// One frame's worth of draw data, in submission order.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawList {
    pub view_proj: Mat4,
    pub group: Mat4,
    pub clouds: Vec<CloudDraw>,
    pub trails: Vec<TrailInstance>,
}

impl DrawList {
    pub fn build(scene: &SceneAnimator, camera: &Camera) -> Self {
        let view_proj = camera.view_projection_matrix();
        let group = scene.group().matrix();

        let clouds = scene
            .clouds()
            .iter()
            .map(|cloud| CloudDraw {
                kind: cloud.kind,
                instance_count: cloud.len() as u32,
                uniform: sprite_uniform(
                    view_proj,
                    group,
                    cloud,
                    scene.sprite_size(cloud),
                    camera.aspect_ratio,
                ),
            })
            .collect();

        let trails = scene
            .shooting_stars()
            .active()
            .filter_map(|star| {
                let transform = star.transform()?;
                Some(TrailInstance::new(group * transform.matrix(), star.opacity()))
            })
            .collect();

        Self {
            view_proj,
            group,
            clouds,
            trails,
        }
    }
}

fn sprite_uniform(
    view_proj: Mat4,
    group: Mat4,
    cloud: &PointCloud,
    size: f32,
    aspect: f32,
) -> SpriteUniform {
    let material = &cloud.material;
    let tint = material.tint;
    let use_colors = material.vertex_colors && cloud.colors.is_some();
    SpriteUniform {
        view_proj: view_proj.to_cols_array_2d(),
        model: group.to_cols_array_2d(),
        tint: [tint.r(), tint.g(), tint.b(), material.opacity],
        params: [size, aspect, if use_colors { 1.0 } else { 0.0 }, 0.0],
    }
}

/// Instance data for every point of `cloud`; points without a color draw white.
pub fn sprite_instances(cloud: &PointCloud) -> Vec<SpriteInstance> {
    cloud
        .positions
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let color = cloud
                .colors
                .as_ref()
                .and_then(|colors| colors.get(i))
                .copied()
                .unwrap_or(Rgb::WHITE);
            SpriteInstance {
                position: p.to_array(),
                color: color.0,
            }
        })
        .collect()
}
