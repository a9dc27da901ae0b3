//! Transient shooting stars recycled from a fixed pool.
//!
//! Each star is a short line segment that spawns on a sphere around the origin,
//! streaks along its own local axis and fades out as its life runs down.

use glam::Vec3;
use rand::Rng;

use crate::shell::sample_sphere_point;
use crate::transform::Transform;

/// Number of shooting-star slots.
pub const POOL_SIZE: usize = 4;
/// Length of the trail segment in world units.
pub const TRAIL_LENGTH: f32 = 200.0;
/// Radius of the sphere shooting stars spawn on.
pub const SPAWN_RADIUS: f32 = 1500.0;
/// Life lost per tick. A star lives `1.0 / LIFE_STEP` ticks.
pub const LIFE_STEP: f64 = 0.02;
/// Minimum speed in units per tick.
pub const MIN_SPEED: f32 = 35.0;
/// Width of the random speed range above [`MIN_SPEED`].
pub const SPEED_SPREAD: f32 = 15.0;

/// The shared trail geometry: local origin to `(-TRAIL_LENGTH, 0, 0)`.
pub const fn trail_segment() -> [Vec3; 2] {
    [Vec3::ZERO, Vec3::new(-TRAIL_LENGTH, 0.0, 0.0)]
}

/// One pool slot.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum ShootingStar {
    #[default]
    Inactive,
    Active {
        /// Remaining life, 1.0 at spawn, retired at or below 0.0.
        life: f64,
        /// Units travelled per tick.
        speed: f32,
        transform: Transform,
    },
}

impl ShootingStar {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active { .. })
    }

    /// Remaining life, or 0.0 when inactive.
    pub fn life(&self) -> f64 {
        match self {
            Self::Active { life, .. } => *life,
            Self::Inactive => 0.0,
        }
    }

    /// Trail opacity; tracks remaining life and is 0.0 when inactive.
    pub fn opacity(&self) -> f32 {
        self.life() as f32
    }

    pub fn transform(&self) -> Option<&Transform> {
        match self {
            Self::Active { transform, .. } => Some(transform),
            Self::Inactive => None,
        }
    }

    /// Build a freshly spawned star with a random position, heading and speed.
    pub fn spawn<R: Rng>(rng: &mut R) -> Self {
        let position = sample_sphere_point(rng, SPAWN_RADIUS);
        let mut transform = Transform::facing(position, Vec3::ZERO);
        transform.rotate_y(rng.random::<f32>() * std::f32::consts::PI);
        transform.rotate_z(rng.random::<f32>() * std::f32::consts::PI);
        let speed = MIN_SPEED + rng.random::<f32>() * SPEED_SPREAD;
        Self::Active {
            life: 1.0,
            speed,
            transform,
        }
    }

    /// Advance one tick. Returns `true` if the star retired on this tick.
    fn advance(&mut self) -> bool {
        let Self::Active {
            life,
            speed,
            transform,
        } = self
        else {
            return false;
        };
        transform.translate_x(-*speed);
        *life -= LIFE_STEP;
        if *life <= 0.0 {
            *self = Self::Inactive;
            return true;
        }
        false
    }
}

/// Fixed-capacity pool of shooting stars.
#[derive(Clone, Debug, Default)]
pub struct ShootingStarPool {
    slots: [ShootingStar; POOL_SIZE],
}

impl ShootingStarPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slots(&self) -> &[ShootingStar; POOL_SIZE] {
        &self.slots
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_active()).count()
    }

    pub fn active(&self) -> impl Iterator<Item = &ShootingStar> {
        self.slots.iter().filter(|s| s.is_active())
    }

    /// Activate the first free slot. Returns the slot index, or `None` when the pool
    /// is exhausted (the attempt is then a no-op).
    pub fn try_spawn<R: Rng>(&mut self, rng: &mut R) -> Option<usize> {
        let index = self.slots.iter().position(|s| !s.is_active())?;
        self.slots[index] = ShootingStar::spawn(rng);
        Some(index)
    }

    /// Advance every active star one tick. Returns how many retired.
    pub fn advance(&mut self) -> usize {
        self.slots.iter_mut().filter(|s| s.is_active()).fold(0, |n, s| {
            if s.advance() { n + 1 } else { n }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_new_pool_is_empty() {
        let pool = ShootingStarPool::new();
        assert_eq!(pool.active_count(), 0);
        assert!(pool.slots().iter().all(|s| s.opacity() == 0.0));
    }

    #[test]
    fn test_spawn_fills_slots_in_order() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut pool = ShootingStarPool::new();
        for expected in 0..POOL_SIZE {
            assert_eq!(pool.try_spawn(&mut rng), Some(expected));
        }
        assert_eq!(pool.active_count(), POOL_SIZE);
    }

    #[test]
    fn test_spawn_on_full_pool_is_noop() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut pool = ShootingStarPool::new();
        for _ in 0..POOL_SIZE {
            pool.try_spawn(&mut rng);
        }
        let before = pool.slots().clone();
        assert_eq!(pool.try_spawn(&mut rng), None);
        assert_eq!(pool.slots(), &before);
    }

    #[test]
    fn test_spawned_star_state() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let star = ShootingStar::spawn(&mut rng);
        let ShootingStar::Active {
            life,
            speed,
            transform,
        } = star
        else {
            panic!("spawned star should be active");
        };
        assert_eq!(life, 1.0);
        assert_eq!(star.opacity(), 1.0);
        assert!((MIN_SPEED..MIN_SPEED + SPEED_SPREAD).contains(&speed));
        assert!((transform.position.length() - SPAWN_RADIUS).abs() < 0.1);
    }

    #[test]
    fn test_star_moves_along_its_own_axis() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut star = ShootingStar::spawn(&mut rng);
        let (start, axis, speed) = match star {
            ShootingStar::Active {
                transform, speed, ..
            } => (transform.position, transform.local_x(), speed),
            ShootingStar::Inactive => unreachable!(),
        };
        star.advance();
        let moved = star.transform().map(|t| t.position).unwrap_or_default();
        let expected = start - axis * speed;
        assert!((moved - expected).length() < 1e-2);
    }

    #[test]
    fn test_star_retires_after_fifty_ticks() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut pool = ShootingStarPool::new();
        pool.try_spawn(&mut rng);

        let mut expected_life = 1.0_f64;
        for tick in 1..=50 {
            let retired = pool.advance();
            expected_life -= LIFE_STEP;
            if tick < 50 {
                assert_eq!(retired, 0, "retired early at tick {tick}");
                let star = pool.slots()[0];
                assert!((star.life() - expected_life).abs() < 1e-12);
                assert_eq!(star.opacity(), star.life() as f32);
            } else {
                assert_eq!(retired, 1, "should retire on tick 50");
            }
        }
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn test_retired_slot_is_reused() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let mut pool = ShootingStarPool::new();
        pool.try_spawn(&mut rng);
        pool.try_spawn(&mut rng);
        pool.slots[0] = ShootingStar::Inactive;
        assert_eq!(pool.try_spawn(&mut rng), Some(0));
    }

    #[test]
    fn test_trail_segment_length() {
        let [a, b] = trail_segment();
        assert_eq!((b - a).length(), TRAIL_LENGTH);
    }
}
