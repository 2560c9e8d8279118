//! Infinite cylinder half-space (quadratic equation).

use halfspace_math::{Dir3, Point3, Vec3};

use super::{quadratic_roots, unit};
use crate::error::{Result, SurfaceError};
use crate::{forward_hits, HalfSpace, Ray};

/// An infinite circular cylinder; the positive side is outside.
#[derive(Debug, Clone)]
pub struct Cylinder {
    /// A point on the axis.
    pub center: Point3,
    /// Unit axis direction.
    pub axis: Dir3,
    /// Radius.
    pub radius: f64,
}

impl Cylinder {
    /// Create a cylinder about the line through `center` along `axis`.
    pub fn new(center: Point3, axis: Vec3, radius: f64) -> Result<Self> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(SurfaceError::InvalidGeometry(format!(
                "cylinder radius must be positive, got {radius}"
            )));
        }
        Ok(Self {
            center,
            axis: unit(axis, "cylinder axis")?,
            radius,
        })
    }

    fn perpendicular(&self, v: &Vec3) -> Vec3 {
        let axis = self.axis.as_ref();
        v - v.dot(axis) * axis
    }
}

impl HalfSpace for Cylinder {
    fn value(&self, p: &Point3) -> f64 {
        self.perpendicular(&(p - self.center)).norm() - self.radius
    }

    fn intersect(&self, ray: &Ray) -> Vec<f64> {
        // Project ray direction and origin-center onto the plane perpendicular to axis
        let d_perp = self.perpendicular(ray.direction.as_ref());
        let oc_perp = self.perpendicular(&(ray.origin - self.center));

        // |oc_perp + t*d_perp|^2 = r^2
        let a = d_perp.dot(&d_perp);
        // Ray is parallel to axis: never crosses the infinite cylinder
        if a.abs() < 1e-12 {
            return Vec::new();
        }
        let b = 2.0 * oc_perp.dot(&d_perp);
        let c = oc_perp.dot(&oc_perp) - self.radius * self.radius;

        forward_hits(quadratic_roots(a, b, c))
    }
}
