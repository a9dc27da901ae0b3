//! Stardrift scene model: point-cloud layers, the universe group, pooled shooting stars
//! and the per-frame animator. Pure CPU state, no GPU types.

pub mod animator;
pub mod cloud;
pub mod color;
pub mod shell;
pub mod shooting_star;
pub mod sprite;
pub mod transform;
pub mod universe;

pub use animator::{AnimatorConfig, DEFAULT_SPAWN_CHANCE, FrameStats, SceneAnimator, pulse_size};
pub use cloud::{LayerKind, LayerSpec, PointCloud, SpriteMaterial};
pub use color::Rgb;
pub use shell::{ShellBand, sample_sphere_point};
pub use shooting_star::{POOL_SIZE, ShootingStar, ShootingStarPool, trail_segment};
pub use sprite::{SPRITE_SIZE, SoftSprite};
pub use transform::Transform;
pub use universe::{UniverseGroup, wrap_flight};
