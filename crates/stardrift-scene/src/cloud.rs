//! Static point-cloud layers: dust, bright stars and nebulae.
//!
//! Each layer is a set of positions sampled on a spherical shell, optionally with
//! per-point colors picked from a small palette, drawn with one shared sprite
//! material. Positions never change after generation.

use glam::Vec3;
use rand::Rng;

use crate::color::Rgb;
use crate::shell::ShellBand;

/// Which of the three background layers a cloud is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Dust,
    BrightStars,
    Nebulae,
}

impl LayerKind {
    pub const ALL: [LayerKind; 3] = [LayerKind::Dust, LayerKind::BrightStars, LayerKind::Nebulae];

    pub fn label(&self) -> &'static str {
        match self {
            LayerKind::Dust => "dust",
            LayerKind::BrightStars => "bright-stars",
            LayerKind::Nebulae => "nebulae",
        }
    }
}

/// Material shared by every point of a cloud. Clouds always blend additively and
/// never write depth.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteMaterial {
    /// Tint multiplied with the sprite (and the per-point color, if any).
    pub tint: Rgb,
    /// World-space sprite size; on screen it shrinks with view depth.
    pub size: f32,
    pub opacity: f32,
    /// Whether per-point colors are used.
    pub vertex_colors: bool,
}

/// Everything needed to generate one layer.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerSpec {
    pub kind: LayerKind,
    pub count: usize,
    pub band: ShellBand,
    /// Per-point colors are drawn uniformly from here. Empty means monochrome.
    pub palette: Vec<Rgb>,
    pub material: SpriteMaterial,
}

/// Bright-star sprite size before pulsing.
pub const STAR_BASE_SIZE: f32 = 15.0;
/// Amplitude of the bright-star pulse.
pub const STAR_PULSE_AMPLITUDE: f32 = 2.0;

impl LayerSpec {
    /// Faint monochrome dust far out.
    pub fn dust() -> Self {
        Self {
            kind: LayerKind::Dust,
            count: 8000,
            band: ShellBand::new(2000.0, 4000.0),
            palette: Vec::new(),
            material: SpriteMaterial {
                tint: Rgb::from_hex(0x888899),
                size: 5.0,
                opacity: 0.5,
                vertex_colors: false,
            },
        }
    }

    /// Colored stars whose size pulses over time.
    pub fn bright_stars() -> Self {
        Self {
            kind: LayerKind::BrightStars,
            count: 2500,
            band: ShellBand::new(1000.0, 3500.0),
            palette: vec![
                Rgb::from_hex(0xffffff),
                Rgb::from_hex(0xaaddff),
                Rgb::from_hex(0xffddaa),
            ],
            material: SpriteMaterial {
                tint: Rgb::WHITE,
                size: STAR_BASE_SIZE,
                opacity: 0.9,
                vertex_colors: true,
            },
        }
    }

    /// A few huge, very faint colored glows.
    pub fn nebulae() -> Self {
        Self {
            kind: LayerKind::Nebulae,
            count: 60,
            band: ShellBand::new(2500.0, 3500.0),
            palette: vec![Rgb::from_hex(0x110044), Rgb::from_hex(0x002233)],
            material: SpriteMaterial {
                tint: Rgb::WHITE,
                size: 800.0,
                opacity: 0.15,
                vertex_colors: true,
            },
        }
    }

    pub fn for_kind(kind: LayerKind) -> Self {
        match kind {
            LayerKind::Dust => Self::dust(),
            LayerKind::BrightStars => Self::bright_stars(),
            LayerKind::Nebulae => Self::nebulae(),
        }
    }

    /// Same layer with a different point count.
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }
}

/// A generated layer.
#[derive(Clone, Debug)]
pub struct PointCloud {
    pub kind: LayerKind,
    pub positions: Vec<Vec3>,
    /// One color per position, present when the material uses vertex colors.
    pub colors: Option<Vec<Rgb>>,
    pub material: SpriteMaterial,
}

impl PointCloud {
    /// Sample positions (and colors) for `spec`.
    pub fn generate<R: Rng>(spec: &LayerSpec, rng: &mut R) -> Self {
        let mut positions = Vec::with_capacity(spec.count);
        let mut colors = (!spec.palette.is_empty()).then(|| Vec::with_capacity(spec.count));

        for _ in 0..spec.count {
            positions.push(spec.band.sample(rng));
            if let Some(colors) = colors.as_mut() {
                let pick = rng.random_range(0..spec.palette.len());
                colors.push(spec.palette[pick]);
            }
        }

        log::debug!(
            "Generated {} layer: {} points in shell {}..{}",
            spec.kind.label(),
            positions.len(),
            spec.band.inner,
            spec.band.outer
        );

        Self {
            kind: spec.kind,
            positions,
            colors,
            material: spec.material,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_default_counts() {
        assert_eq!(LayerSpec::dust().count, 8000);
        assert_eq!(LayerSpec::bright_stars().count, 2500);
        assert_eq!(LayerSpec::nebulae().count, 60);
    }

    #[test]
    fn test_generate_respects_count() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let cloud = PointCloud::generate(&LayerSpec::bright_stars().with_count(300), &mut rng);
        assert_eq!(cloud.len(), 300);
        assert_eq!(cloud.colors.as_ref().map(Vec::len), Some(300));
    }

    #[test]
    fn test_dust_is_monochrome() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let cloud = PointCloud::generate(&LayerSpec::dust().with_count(100), &mut rng);
        assert!(cloud.colors.is_none());
        assert!(!cloud.material.vertex_colors);
    }

    #[test]
    fn test_colors_come_from_palette() {
        let spec = LayerSpec::nebulae();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let cloud = PointCloud::generate(&spec, &mut rng);
        for c in cloud.colors.iter().flatten() {
            assert!(spec.palette.contains(c));
        }
    }

    #[test]
    fn test_every_palette_entry_is_used() {
        let spec = LayerSpec::bright_stars();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let cloud = PointCloud::generate(&spec, &mut rng);
        let colors = cloud.colors.unwrap_or_default();
        for entry in &spec.palette {
            let n = colors.iter().filter(|c| *c == entry).count();
            assert!(n > 600, "palette entry {entry:?} used only {n} times");
        }
    }

    #[test]
    fn test_same_seed_same_cloud() {
        let spec = LayerSpec::dust().with_count(500);
        let a = PointCloud::generate(&spec, &mut ChaCha8Rng::seed_from_u64(9));
        let b = PointCloud::generate(&spec, &mut ChaCha8Rng::seed_from_u64(9));
        assert_eq!(a.positions, b.positions);
    }

    #[test]
    fn test_layer_materials() {
        let opacities: Vec<_> = LayerKind::ALL
            .into_iter()
            .map(|k| LayerSpec::for_kind(k).material.opacity)
            .collect();
        assert_eq!(opacities, vec![0.5, 0.9, 0.15]);
        assert!(LayerSpec::bright_stars().material.vertex_colors);
        assert!(LayerSpec::nebulae().material.vertex_colors);
    }

    #[test]
    fn test_empty_cloud() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let cloud = PointCloud::generate(&LayerSpec::nebulae().with_count(0), &mut rng);
        assert!(cloud.is_empty());
    }
}
