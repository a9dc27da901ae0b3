//! Uniform sampling of points on spherical shells.
//!
//! The polar angle is drawn as `acos(2u - 1)` rather than uniformly, so that
//! directions are uniform over the sphere's surface instead of clustering at
//! the poles.

use glam::Vec3;
use rand::Rng;

/// A spherical shell between two radii, centered on the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShellBand {
    /// Inner radius (inclusive).
    pub inner: f32,
    /// Outer radius.
    pub outer: f32,
}

impl ShellBand {
    pub const fn new(inner: f32, outer: f32) -> Self {
        Self { inner, outer }
    }

    /// Whether `distance` falls inside the band, allowing `eps` of float slack.
    pub fn contains(&self, distance: f32, eps: f32) -> bool {
        distance >= self.inner - eps && distance <= self.outer + eps
    }

    /// Sample one point: radius uniform in the band, direction uniform on the sphere.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Vec3 {
        let r = self.inner + rng.random::<f32>() * (self.outer - self.inner);
        sample_sphere_point(rng, r)
    }
}

/// Sample a point uniformly on the surface of a sphere of the given radius.
pub fn sample_sphere_point<R: Rng>(rng: &mut R, radius: f32) -> Vec3 {
    let theta = rng.random::<f32>() * std::f32::consts::TAU;
    let phi = (2.0 * rng.random::<f32>() - 1.0).clamp(-1.0, 1.0).acos();
    spherical_to_cartesian(radius, theta, phi)
}

/// Physics convention: `theta` is the azimuth in the XY plane, `phi` the angle from +Z.
pub fn spherical_to_cartesian(r: f32, theta: f32, phi: f32) -> Vec3 {
    Vec3::new(
        r * phi.sin() * theta.cos(),
        r * phi.sin() * theta.sin(),
        r * phi.cos(),
    )
}
