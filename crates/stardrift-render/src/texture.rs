//! The soft sprite texture on the GPU, with its sampler and bind group.

use stardrift_scene::SoftSprite;

/// Texel format of the sprite. The gradient is authored in linear values.
pub const SPRITE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Errors that can occur during texture creation.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextureError {
    #[error("texture data size ({actual}) does not match expected ({expected}) for {width}x{height}")]
    DataSizeMismatch {
        actual: usize,
        expected: usize,
        width: u32,
        height: u32,
    },

    #[error("texture dimensions must be non-zero, got {width}x{height}")]
    ZeroDimensions { width: u32, height: u32 },
}

/// A sampled sprite texture ready to bind at group 1.
pub struct SpriteTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    pub bind_group: wgpu::BindGroup,
}

impl SpriteTexture {
    /// Layout shared by every sprite texture: texture at binding 0, sampler at 1.
    pub fn bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sprite-texture-bind-group-layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
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
        })
    }

    /// Upload `sprite` and build its bind group against `layout`.
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        sprite: &SoftSprite,
    ) -> Result<Self, TextureError> {
        let data = sprite.as_bytes();
        validate_sprite_data(data.len(), sprite.size, sprite.size)?;

        let size = wgpu::Extent3d {
            width: sprite.size,
            height: sprite.size,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("soft-sprite"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: SPRITE_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(sprite.size * 4),
                rows_per_image: None,
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("soft-sprite-sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("soft-sprite-bind-group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        log::debug!("Uploaded {}x{} sprite texture", sprite.size, sprite.size);

        Ok(Self {
            texture,
            view,
            sampler,
            bind_group,
        })
    }

    pub fn destroy(&self) {
        self.texture.destroy();
    }
}

/// Check that `len` bytes is exactly one RGBA8 image of `width`×`height`.
pub fn validate_sprite_data(len: usize, width: u32, height: u32) -> Result<(), TextureError> {
    if width == 0 || height == 0 {
        return Err(TextureError::ZeroDimensions { width, height });
    }
    let expected = width as usize * height as usize * 4;
    if len != expected {
        return Err(TextureError::DataSizeMismatch {
            actual: len,
            expected,
            width,
            height,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sprite_is_valid() {
        let sprite = SoftSprite::new();
        assert_eq!(
            validate_sprite_data(sprite.as_bytes().len(), sprite.size, sprite.size),
            Ok(())
        );
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        assert_eq!(
            validate_sprite_data(0, 0, 16),
            Err(TextureError::ZeroDimensions {
                width: 0,
                height: 16
            })
        );
    }

    #[test]
    fn test_size_mismatch_rejected() {
        let err = validate_sprite_data(100, 8, 8).unwrap_err();
        assert!(matches!(
            err,
            TextureError::DataSizeMismatch {
                expected: 256,
                actual: 100,
                ..
            }
        ));
    }

    #[test]
    fn test_sprite_format_has_four_bytes_per_texel() {
        assert_eq!(SPRITE_FORMAT.block_copy_size(None), Some(4));
    }
}
