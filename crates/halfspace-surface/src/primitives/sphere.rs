//! Sphere half-space (quadratic equation).

use halfspace_math::Point3;

use super::quadratic_roots;
use crate::error::{Result, SurfaceError};
use crate::{forward_hits, HalfSpace, Ray};

/// A sphere; the positive side is outside.
#[derive(Debug, Clone)]
pub struct Sphere {
    /// Centre of the sphere.
    pub center: Point3,
    /// Radius of the sphere.
    pub radius: f64,
}

impl Sphere {
    /// Create a sphere. The radius must be positive and finite.
    pub fn new(center: Point3, radius: f64) -> Result<Self> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(SurfaceError::InvalidGeometry(format!(
                "sphere radius must be positive, got {radius}"
            )));
        }
        Ok(Self { center, radius })
    }
}

impl HalfSpace for Sphere {
    fn value(&self, p: &Point3) -> f64 {
        (p - self.center).norm() - self.radius
    }

    fn intersect(&self, ray: &Ray) -> Vec<f64> {
        let oc = ray.origin - self.center;
        let d = ray.direction.as_ref();

        // Quadratic: |oc + t*d|^2 = r^2
        let a = d.dot(d);
        let b = 2.0 * oc.dot(d);
        let c = oc.dot(&oc) - self.radius * self.radius;

        forward_hits(quadratic_roots(a, b, c))
    }
}
