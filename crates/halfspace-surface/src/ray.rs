//! Ray representation.

use halfspace_math::{Dir3, Point3, Vec3};

/// A ray in 3D space defined by origin and unit direction.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Origin point of the ray.
    pub origin: Point3,
    /// Unit direction of the ray.
    pub direction: Dir3,
}

impl Ray {
    /// Create a new ray from origin and direction.
    ///
    /// The direction will be normalized. Returns `None` for a zero
    /// (or non-finite) direction.
    pub fn new(origin: Point3, direction: Vec3) -> Option<Self> {
        let norm = direction.norm();
        if !norm.is_finite() || norm < 1e-300 {
            return None;
        }
        Some(Self {
            origin,
            direction: Dir3::new_unchecked(direction / norm),
        })
    }

    /// Create a ray from an already normalized direction.
    pub fn from_dir(origin: Point3, direction: Dir3) -> Self {
        Self { origin, direction }
    }

    /// Evaluate the ray at parameter `t`: `origin + t * direction`.
    #[inline]
    pub fn at(&self, t: f64) -> Point3 {
        self.origin + t * self.direction.as_ref()
    }
}
