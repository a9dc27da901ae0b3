//! The universe group: the single parent transform of every cloud and shooting star.

use glam::{EulerRot, Mat4, Quat, Vec3};

/// Yaw added per tick, radians.
pub const YAW_PER_TICK: f32 = 0.0003;
/// Pitch added per tick, radians.
pub const PITCH_PER_TICK: f32 = 0.0001;
/// Forward drift along +Z per tick.
pub const DRIFT_PER_TICK: f32 = 0.5;
/// The flight axis coordinate wraps by this distance once it leaves `[-WRAP, WRAP]`.
pub const WRAP_DISTANCE: f32 = 3000.0;

/// Euler rotation (XYZ order) plus translation, advanced once per tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct UniverseGroup {
    /// Euler angles in radians, applied in X, Y, Z order.
    pub rotation: Vec3,
    pub position: Vec3,
}

impl UniverseGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rotate and drift by one tick's worth of motion.
    pub fn advance(&mut self) {
        self.rotation.y += YAW_PER_TICK;
        self.rotation.x += PITCH_PER_TICK;
        self.position.z = wrap_flight(self.position.z + DRIFT_PER_TICK);
    }

    pub fn quat(&self) -> Quat {
        Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        )
    }

    /// Model matrix applied to all children.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.quat(), self.position)
    }
}

/// Fold a flight-axis coordinate back by one wrap distance once it overshoots.
pub fn wrap_flight(z: f32) -> f32 {
    if z > WRAP_DISTANCE {
        z - WRAP_DISTANCE
    } else if z < -WRAP_DISTANCE {
        z + WRAP_DISTANCE
    } else {
        z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_leaves_in_range_values() {
        assert_eq!(wrap_flight(0.0), 0.0);
        assert_eq!(wrap_flight(3000.0), 3000.0);
        assert_eq!(wrap_flight(-3000.0), -3000.0);
    }

    #[test]
    fn test_wrap_folds_overshoot() {
        assert_eq!(wrap_flight(3000.5), 0.5);
        assert_eq!(wrap_flight(-3000.5), -0.5);
    }

    #[test]
    fn test_position_never_exceeds_wrap() {
        let mut group = UniverseGroup::new();
        for _ in 0..20_000 {
            group.advance();
            assert!(group.position.z <= WRAP_DISTANCE && group.position.z > -WRAP_DISTANCE);
        }
    }

    #[test]
    fn test_full_travel_returns_modulo_wrap() {
        let mut group = UniverseGroup::new();
        let start = group.position.z;
        for _ in 0..12_000 {
            group.advance();
        }
        assert_eq!(group.position.z.rem_euclid(WRAP_DISTANCE), start);
    }

    #[test]
    fn test_rotation_accumulates() {
        let mut group = UniverseGroup::new();
        for _ in 0..1000 {
            group.advance();
        }
        assert!((group.rotation.y - 0.3).abs() < 1e-4);
        assert!((group.rotation.x - 0.1).abs() < 1e-4);
        assert_eq!(group.rotation.z, 0.0);
    }

    #[test]
    fn test_matrix_carries_translation() {
        let group = UniverseGroup {
            rotation: Vec3::new(0.2, 0.4, 0.0),
            position: Vec3::new(0.0, 0.0, 250.0),
        };
        let origin = group.matrix().transform_point3(Vec3::ZERO);
        assert!((origin - group.position).length() < 1e-4);
    }
}
