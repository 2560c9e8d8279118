//! Plane half-space (closed-form intersection).

use halfspace_math::{Dir3, Point3, Vec3};

use super::unit;
use crate::error::Result;
use crate::{HalfSpace, Ray};

/// An infinite plane through `origin`; the positive side is along `normal`.
#[derive(Debug, Clone)]
pub struct Plane {
    /// A point on the plane.
    pub origin: Point3,
    /// Unit normal pointing into the positive half-space.
    pub normal: Dir3,
}

impl Plane {
    /// Create a plane from a point on it and its (unnormalized) normal.
    pub fn new(origin: Point3, normal: Vec3) -> Result<Self> {
        Ok(Self {
            origin,
            normal: unit(normal, "plane normal")?,
        })
    }

    /// The plane `x = d` with positive side `x > d`.
    pub fn px(d: f64) -> Self {
        Self {
            origin: Point3::new(d, 0.0, 0.0),
            normal: Vec3::x_axis(),
        }
    }

    /// The plane `y = d` with positive side `y > d`.
    pub fn py(d: f64) -> Self {
        Self {
            origin: Point3::new(0.0, d, 0.0),
            normal: Vec3::y_axis(),
        }
    }

    /// The plane `z = d` with positive side `z > d`.
    pub fn pz(d: f64) -> Self {
        Self {
            origin: Point3::new(0.0, 0.0, d),
            normal: Vec3::z_axis(),
        }
    }

    /// Signed distance from a point to this plane.
    pub fn signed_distance(&self, p: &Point3) -> f64 {
        (p - self.origin).dot(self.normal.as_ref())
    }
}

impl HalfSpace for Plane {
    fn value(&self, p: &Point3) -> f64 {
        self.signed_distance(p)
    }

    fn intersect(&self, ray: &Ray) -> Vec<f64> {
        let normal = self.normal.as_ref();
        let denom = ray.direction.as_ref().dot(normal);

        // Ray is parallel to plane
        if denom.abs() < 1e-12 {
            return Vec::new();
        }

        let t = (self.origin - ray.origin).dot(normal) / denom;
        if t < 0.0 {
            return Vec::new();
        }
        vec![t]
    }
}
