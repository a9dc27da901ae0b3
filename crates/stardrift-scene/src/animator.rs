//! The per-frame scene animator.
//!
//! Owns every piece of mutable scene state (the universe group, the
//! shooting-star pool, the pulse clock) plus the immutable point clouds and
//! sprite generated at construction. [`SceneAnimator::tick`] advances one
//! display frame; rendering is left to the caller.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::cloud::{LayerKind, LayerSpec, PointCloud, STAR_BASE_SIZE, STAR_PULSE_AMPLITUDE};
use crate::shooting_star::ShootingStarPool;
use crate::sprite::SoftSprite;
use crate::universe::UniverseGroup;

/// Pulse clock increment per frame.
pub const TIME_STEP: f64 = 0.005;
/// Default per-frame probability of attempting a shooting-star spawn.
pub const DEFAULT_SPAWN_CHANCE: f64 = 0.008;

/// Construction parameters for a [`SceneAnimator`].
#[derive(Clone, Debug, PartialEq)]
pub struct AnimatorConfig {
    /// Fixed RNG seed; `None` draws one from the thread RNG.
    pub seed: Option<u64>,
    /// Per-frame spawn probability in [0, 1].
    pub spawn_chance: f64,
    /// Layers to generate, drawn in this order.
    pub layers: Vec<LayerSpec>,
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Self {
            seed: None,
            spawn_chance: DEFAULT_SPAWN_CHANCE,
            layers: LayerKind::ALL.into_iter().map(LayerSpec::for_kind).collect(),
        }
    }
}

/// What happened during one [`SceneAnimator::tick`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameStats {
    /// 1-based index of the frame just simulated.
    pub frame: u64,
    pub active_shooting_stars: usize,
    /// Slot index of a star spawned this frame.
    pub spawned: Option<usize>,
    /// Stars that retired this frame.
    pub retired: usize,
    pub star_size: f32,
    pub group_z: f32,
}

/// Bright-star sprite size at pulse time `time`.
pub fn pulse_size(time: f64) -> f32 {
    (STAR_BASE_SIZE as f64 + (time * 2.0).sin() * STAR_PULSE_AMPLITUDE as f64) as f32
}

/// Scene state for one activation of the backdrop.
pub struct SceneAnimator {
    rng: ChaCha8Rng,
    seed: u64,
    spawn_chance: f64,
    time: f64,
    frame: u64,
    star_size: f32,
    group: UniverseGroup,
    clouds: Vec<PointCloud>,
    sprite: SoftSprite,
    shooting_stars: ShootingStarPool,
}

impl SceneAnimator {
    /// Build the scene: sprite, point clouds and an empty shooting-star pool.
    pub fn new(config: &AnimatorConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let sprite = SoftSprite::new();
        let clouds: Vec<PointCloud> = config
            .layers
            .iter()
            .map(|spec| PointCloud::generate(spec, &mut rng))
            .collect();

        log::info!(
            "Scene built (seed {seed}): {} points across {} layers",
            clouds.iter().map(PointCloud::len).sum::<usize>(),
            clouds.len()
        );

        Self {
            rng,
            seed,
            spawn_chance: config.spawn_chance.clamp(0.0, 1.0),
            time: 0.0,
            frame: 0,
            star_size: STAR_BASE_SIZE,
            group: UniverseGroup::new(),
            clouds,
            sprite,
            shooting_stars: ShootingStarPool::new(),
        }
    }

    /// Advance the scene by one display frame.
    pub fn tick(&mut self) -> FrameStats {
        self.frame += 1;
        self.time += TIME_STEP;

        self.group.advance();
        self.star_size = pulse_size(self.time);

        // A star spawned this frame is advanced this frame too.
        let spawned = if self.rng.random::<f64>() < self.spawn_chance {
            self.shooting_stars.try_spawn(&mut self.rng)
        } else {
            None
        };
        let retired = self.shooting_stars.advance();

        if let Some(slot) = spawned {
            log::trace!("Shooting star spawned in slot {slot}");
        }

        FrameStats {
            frame: self.frame,
            active_shooting_stars: self.shooting_stars.active_count(),
            spawned,
            retired,
            star_size: self.star_size,
            group_z: self.group.position.z,
        }
    }

    pub fn set_spawn_chance(&mut self, chance: f64) {
        self.spawn_chance = chance.clamp(0.0, 1.0);
    }

    pub fn spawn_chance(&self) -> f64 {
        self.spawn_chance
    }

    /// The seed this scene was generated from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Pulse clock.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Frames simulated so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Current bright-star sprite size.
    pub fn star_size(&self) -> f32 {
        self.star_size
    }

    pub fn group(&self) -> &UniverseGroup {
        &self.group
    }

    pub fn clouds(&self) -> &[PointCloud] {
        &self.clouds
    }

    pub fn cloud(&self, kind: LayerKind) -> Option<&PointCloud> {
        self.clouds.iter().find(|c| c.kind == kind)
    }

    /// Sprite size to draw `cloud` with this frame.
    pub fn sprite_size(&self, cloud: &PointCloud) -> f32 {
        match cloud.kind {
            LayerKind::BrightStars => self.star_size,
            _ => cloud.material.size,
        }
    }

    pub fn sprite(&self) -> &SoftSprite {
        &self.sprite
    }

    pub fn shooting_stars(&self) -> &ShootingStarPool {
        &self.shooting_stars
    }
}
