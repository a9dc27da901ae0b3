//! Rigid transforms for scene entities.

use glam::{Mat3, Mat4, Quat, Vec3};

/// Position plus orientation, in the parent (universe group) frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    /// A transform at `position` whose local +Z axis points at `target`, with +Y kept as
    /// close to world up as possible.
    pub fn facing(position: Vec3, target: Vec3) -> Self {
        Self {
            position,
            rotation: facing_rotation(position, target, Vec3::Y),
        }
    }

    /// Rotate about the local Y axis.
    pub fn rotate_y(&mut self, angle: f32) {
        self.rotation = (self.rotation * Quat::from_rotation_y(angle)).normalize();
    }

    /// Rotate about the local Z axis.
    pub fn rotate_z(&mut self, angle: f32) {
        self.rotation = (self.rotation * Quat::from_rotation_z(angle)).normalize();
    }

    /// Move along the local X axis.
    pub fn translate_x(&mut self, distance: f32) {
        self.position += self.local_x() * distance;
    }

    /// Local X axis expressed in the parent frame.
    pub fn local_x(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Local Z axis expressed in the parent frame.
    pub fn local_z(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Model matrix (translation * rotation).
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Rotation whose +Z column points from `eye` toward `target`.
fn facing_rotation(eye: Vec3, target: Vec3, up: Vec3) -> Quat {
    let mut z = target - eye;
    if z.length_squared() == 0.0 {
        z = Vec3::Z;
    }
    z = z.normalize();

    let mut x = up.cross(z);
    if x.length_squared() == 0.0 {
        // Looking straight along `up`: nudge off-axis so the basis is defined.
        if up.z.abs() == 1.0 {
            z.x += 0.0001;
        } else {
            z.z += 0.0001;
        }
        z = z.normalize();
        x = up.cross(z);
    }
    x = x.normalize();
    let y = z.cross(x);

    Quat::from_mat3(&Mat3::from_cols(x, y, z)).normalize()
}
