//! Double-nappe cone half-space (quadratic equation).

use halfspace_math::{Dir3, Point3, Vec3};

use super::{quadratic_roots, unit};
use crate::error::{Result, SurfaceError};
use crate::{forward_hits, HalfSpace, Ray};

/// A circular cone with both nappes; the positive side is outside.
#[derive(Debug, Clone)]
pub struct Cone {
    /// Apex of the cone.
    pub apex: Point3,
    /// Unit axis direction.
    pub axis: Dir3,
    /// Half-angle in radians, in `(0, π/2)`.
    pub half_angle: f64,
}

impl Cone {
    /// Create a cone from apex, axis and half-angle (radians).
    pub fn new(apex: Point3, axis: Vec3, half_angle: f64) -> Result<Self> {
        if !(half_angle > 0.0 && half_angle < std::f64::consts::FRAC_PI_2) {
            return Err(SurfaceError::InvalidGeometry(format!(
                "cone half-angle must lie in (0, pi/2), got {half_angle}"
            )));
        }
        Ok(Self {
            apex,
            axis: unit(axis, "cone axis")?,
            half_angle,
        })
    }
}

impl HalfSpace for Cone {
    fn value(&self, p: &Point3) -> f64 {
        let to_point = p - self.apex;
        let axis = self.axis.as_ref();
        let height = to_point.dot(axis);
        let radial = (to_point - height * axis).norm();
        let (sin_a, cos_a) = self.half_angle.sin_cos();
        // Signed distance to the nearest generator line
        radial * cos_a - height.abs() * sin_a
    }

    fn intersect(&self, ray: &Ray) -> Vec<f64> {
        let axis = self.axis.as_ref();
        let d = ray.direction.as_ref();
        let co = ray.origin - self.apex;

        let cos_a = self.half_angle.cos();
        let cos2 = cos_a * cos_a;

        // ((P - apex) · axis)^2 = |P - apex|^2 * cos^2(half_angle)
        let d_dot_a = d.dot(axis);
        let co_dot_a = co.dot(axis);

        let a = d_dot_a * d_dot_a - cos2;
        let b = 2.0 * (d_dot_a * co_dot_a - cos2 * d.dot(&co));
        let c = co_dot_a * co_dot_a - cos2 * co.dot(&co);

        forward_hits(quadratic_roots(a, b, c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn z_cone(half_angle: f64) -> Cone {
        Cone::new(Point3::origin(), Vec3::z(), half_angle).unwrap()
    }

    #[test]
    fn test_ray_cone_through_axis() {
        let cone = z_cone(PI / 4.0);
        // Ray along +X at z=5 hits the cone at (±5, 0, 5)
        let ray = Ray::new(Point3::new(-20.0, 0.0, 5.0), Vec3::new(1.0, 0.0, 0.0)).unwrap();
        let hits = cone.intersect(&ray);
        assert_eq!(hits.len(), 2);
        assert_relative_eq!(hits[0], 15.0, epsilon = 1e-10);
        assert_relative_eq!(hits[1], 25.0, epsilon = 1e-10);
    }

    #[test]
    fn test_ray_cone_lower_nappe() {
        let cone = z_cone(PI / 4.0);
        let ray = Ray::new(Point3::new(-20.0, 0.0, -5.0), Vec3::new(1.0, 0.0, 0.0)).unwrap();
        assert_eq!(cone.intersect(&ray).len(), 2);
    }

    #[test]
    fn test_ray_cone_miss() {
        let cone = z_cone(PI / 6.0);
        let ray = Ray::new(Point3::new(0.0, 20.0, 10.0), Vec3::new(1.0, 0.0, 0.0)).unwrap();
        assert!(cone.intersect(&ray).is_empty());
    }

    #[test]
    fn test_cone_value_sign() {
        let cone = z_cone(PI / 4.0);
        assert!(cone.value(&Point3::new(0.0, 0.0, 3.0)) < 0.0);
        assert!(cone.value(&Point3::new(0.0, 0.0, -3.0)) < 0.0);
        assert!(cone.value(&Point3::new(5.0, 0.0, 1.0)) > 0.0);
        assert_relative_eq!(cone.value(&Point3::new(2.0, 0.0, 2.0)), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_cone_rejects_bad_angle() {
        assert!(Cone::new(Point3::origin(), Vec3::z(), 0.0).is_err());
        assert!(Cone::new(Point3::origin(), Vec3::z(), PI / 2.0).is_err());
    }
}
