//! Soft circular sprite texture shared by every point cloud.
//!
//! Rasterized on the CPU as a radial gradient and uploaded once per activation
//! by the renderer.

/// Default edge length of the sprite texture in texels.
pub const SPRITE_SIZE: u32 = 128;

/// One stop of the radial gradient: `offset` in [0, 1] from center to edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    pub offset: f32,
    /// Non-premultiplied RGBA, each channel in [0, 1].
    pub color: [f32; 4],
}

/// White core fading to transparent black at the rim.
pub const SOFT_STOPS: [GradientStop; 4] = [
    GradientStop {
        offset: 0.0,
        color: [1.0, 1.0, 1.0, 1.0],
    },
    GradientStop {
        offset: 0.15,
        color: [1.0, 1.0, 1.0, 0.9],
    },
    GradientStop {
        offset: 0.4,
        color: [1.0, 1.0, 1.0, 0.2],
    },
    GradientStop {
        offset: 1.0,
        color: [0.0, 0.0, 0.0, 0.0],
    },
];

/// A square RGBA8 sprite image.
#[derive(Clone, Debug)]
pub struct SoftSprite {
    /// Width and height in texels.
    pub size: u32,
    /// Row-major RGBA8 texels, `size * size` entries.
    pub texels: Vec<[u8; 4]>,
}

impl SoftSprite {
    /// Rasterize the default soft sprite.
    pub fn new() -> Self {
        Self::rasterize(SPRITE_SIZE, &SOFT_STOPS)
    }

    /// Rasterize a radial gradient centered in a `size`×`size` image.
    pub fn rasterize(size: u32, stops: &[GradientStop]) -> Self {
        let center = size as f32 / 2.0;
        let mut texels = Vec::with_capacity((size * size) as usize);
        for y in 0..size {
            for x in 0..size {
                let dx = x as f32 + 0.5 - center;
                let dy = y as f32 + 0.5 - center;
                let t = (dx * dx + dy * dy).sqrt() / center;
                let c = gradient_at(stops, t);
                texels.push([
                    to_byte(c[0]),
                    to_byte(c[1]),
                    to_byte(c[2]),
                    to_byte(c[3]),
                ]);
            }
        }
        Self { size, texels }
    }

    /// Texel at `(x, y)`.
    pub fn texel(&self, x: u32, y: u32) -> [u8; 4] {
        self.texels[(y * self.size + x) as usize]
    }

    /// Flattened bytes for GPU upload.
    pub fn as_bytes(&self) -> Vec<u8> {
        self.texels.iter().flatten().copied().collect()
    }
}

impl Default for SoftSprite {
    fn default() -> Self {
        Self::new()
    }
}

/// Piecewise-linear gradient lookup; clamps to the first/last stop.
pub fn gradient_at(stops: &[GradientStop], t: f32) -> [f32; 4] {
    let Some(first) = stops.first() else {
        return [0.0; 4];
    };
    if t <= first.offset {
        return first.color;
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t < b.offset {
            let span = (b.offset - a.offset).max(f32::EPSILON);
            let w = (t - a.offset) / span;
            return std::array::from_fn(|i| a.color[i] + (b.color[i] - a.color[i]) * w);
        }
    }
    stops[stops.len() - 1].color
}

fn to_byte(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sprite_dimensions() {
        let sprite = SoftSprite::new();
        assert_eq!(sprite.size, SPRITE_SIZE);
        assert_eq!(sprite.texels.len(), (SPRITE_SIZE * SPRITE_SIZE) as usize);
        assert_eq!(sprite.as_bytes().len(), (SPRITE_SIZE * SPRITE_SIZE * 4) as usize);
    }

    #[test]
    fn test_center_is_opaque_white() {
        let sprite = SoftSprite::new();
        let c = sprite.texel(SPRITE_SIZE / 2, SPRITE_SIZE / 2);
        assert_eq!(&c[..3], &[255, 255, 255]);
        assert!(c[3] > 240, "center alpha {}", c[3]);
    }

    #[test]
    fn test_corners_are_transparent() {
        let sprite = SoftSprite::new();
        for (x, y) in [(0, 0), (SPRITE_SIZE - 1, 0), (0, SPRITE_SIZE - 1)] {
            assert_eq!(sprite.texel(x, y), [0, 0, 0, 0]);
        }
    }

    #[test]
    fn test_alpha_falls_off_with_radius() {
        let sprite = SoftSprite::new();
        let row = SPRITE_SIZE / 2;
        let mut prev = 256u16;
        for x in (SPRITE_SIZE / 2)..SPRITE_SIZE {
            let a = sprite.texel(x, row)[3] as u16;
            assert!(a <= prev, "alpha rose at x={x}");
            prev = a;
        }
    }

    #[test]
    fn test_gradient_hits_stops_exactly() {
        assert_eq!(gradient_at(&SOFT_STOPS, 0.15), SOFT_STOPS[1].color);
        assert_eq!(gradient_at(&SOFT_STOPS, 0.4), SOFT_STOPS[2].color);
        assert_eq!(gradient_at(&SOFT_STOPS, 2.0), SOFT_STOPS[3].color);
    }

    #[test]
    fn test_gradient_interpolates_between_stops() {
        let c = gradient_at(&SOFT_STOPS, 0.275);
        assert!((c[3] - 0.55).abs() < 1e-5, "alpha {}", c[3]);
    }

    #[test]
    fn test_empty_stops_are_transparent() {
        assert_eq!(gradient_at(&[], 0.5), [0.0; 4]);
    }
}
