//! Analytic half-space primitives.
//!
//! Each primitive carries its own signed evaluation and a closed-form
//! ray intersector.

mod cone;
mod cylinder;
mod plane;
mod sphere;

pub use cone::Cone;
pub use cylinder::Cylinder;
pub use plane::Plane;
pub use sphere::Sphere;

use halfspace_math::{Dir3, Vec3};

use crate::error::{Result, SurfaceError};

/// Normalize an axis or normal, rejecting zero and non-finite vectors.
pub(crate) fn unit(v: Vec3, what: &str) -> Result<Dir3> {
    let norm = v.norm();
    if !norm.is_finite() || norm < 1e-12 {
        return Err(SurfaceError::InvalidGeometry(format!(
            "{what} must be a non-zero vector"
        )));
    }
    Ok(Dir3::new_unchecked(v / norm))
}

/// Real roots of `a t^2 + b t + c = 0`, ascending. Degenerates to the
/// linear case when `a` vanishes.
pub(crate) fn quadratic_roots(a: f64, b: f64, c: f64) -> Vec<f64> {
    if a.abs() < 1e-12 {
        if b.abs() < 1e-12 {
            return Vec::new();
        }
        return vec![-c / b];
    }
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return Vec::new();
    }
    let sqrt_disc = discriminant.sqrt();
    let t1 = (-b - sqrt_disc) / (2.0 * a);
    let t2 = (-b + sqrt_disc) / (2.0 * a);
    if t1 <= t2 {
        vec![t1, t2]
    } else {
        vec![t2, t1]
    }
}
