//! Activation settings for one backdrop, derived from [`Config`].

use stardrift_config::Config;
use stardrift_scene::{AnimatorConfig, LayerKind, LayerSpec};

#[derive(Clone, Debug, PartialEq)]
pub struct BackdropSettings {
    pub animator: AnimatorConfig,
    pub pixel_ratio_cap: f64,
    /// Log a frame summary every this many frames; 0 disables it.
    pub stats_interval: u64,
}

impl Default for BackdropSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl BackdropSettings {
    pub fn from_config(config: &Config) -> Self {
        let scene = &config.scene;
        let layers = LayerKind::ALL
            .into_iter()
            .map(|kind| {
                let count = match kind {
                    LayerKind::Dust => scene.dust_count,
                    LayerKind::BrightStars => scene.star_count,
                    LayerKind::Nebulae => scene.nebula_count,
                };
                LayerSpec::for_kind(kind).with_count(count)
            })
            .collect();

        Self {
            animator: AnimatorConfig {
                seed: scene.seed,
                spawn_chance: scene.spawn_chance.clamp(0.0, 1.0),
                layers,
            },
            pixel_ratio_cap: config.render.pixel_ratio_cap,
            stats_interval: config.debug.stats_interval,
        }
    }
}
