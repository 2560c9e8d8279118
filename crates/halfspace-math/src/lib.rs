#![warn(missing_docs)]

//! Math types for the halfspace CSG kernel.
//!
//! Thin wrappers around nalgebra providing the point and vector types
//! used by surfaces, rules and line tracks, plus the tolerance
//! constants that decide when a point is "on" a surface.

use nalgebra::{Unit, Vector3};
use serde::{Deserialize, Serialize};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A unit (normalized) direction vector in 3D space.
pub type Dir3 = Unit<Vector3<f64>>;

/// Tolerance constants for half-space classification and ray probing.
///
/// `linear` is the single on-surface epsilon: a point whose signed
/// distance to a surface is below it classifies as on the surface.
/// `probe` is the step taken past a crossing to decide which side a
/// ray ends up on. It must exceed `linear`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerance {
    /// On-surface distance tolerance.
    pub linear: f64,
    /// Offset used for probe points either side of a surface crossing.
    pub probe: f64,
}

impl Tolerance {
    /// Default tolerances (1e-6 on-surface, 1e-4 probe offset).
    pub const DEFAULT: Self = Self {
        linear: 1e-6,
        probe: 1e-4,
    };

    /// Check if a scalar distance is effectively zero.
    pub fn is_zero(&self, d: f64) -> bool {
        d.abs() < self.linear
    }

    /// Whether the probe offset is usable with this on-surface tolerance.
    pub fn is_consistent(&self) -> bool {
        self.linear > 0.0 && self.probe > self.linear
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Advance `origin` by `t` along the unit direction `dir`.
#[inline]
pub fn offset(origin: &Point3, dir: &Dir3, t: f64) -> Point3 {
    origin + t * dir.as_ref()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tolerance_is_zero() {
        let tol = Tolerance::default();
        assert!(tol.is_zero(5e-7));
        assert!(tol.is_zero(-5e-7));
        assert!(!tol.is_zero(1e-5));
    }

    #[test]
    fn test_default_is_consistent() {
        assert!(Tolerance::DEFAULT.is_consistent());
        let bad = Tolerance {
            linear: 1e-3,
            probe: 1e-4,
        };
        assert!(!bad.is_consistent());
    }

    #[test]
    fn test_offset() {
        let dir = Dir3::new_normalize(Vec3::new(0.0, 3.0, 0.0));
        let p = offset(&Point3::origin(), &dir, 2.5);
        assert!(p.x.abs() < 1e-12);
        assert!((p.y - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_tolerance_partial_toml_fields_default() {
        let tol: Tolerance = serde_json::from_str(r#"{"linear": 1e-8}"#).unwrap();
        assert_eq!(tol.linear, 1e-8);
        assert_eq!(tol.probe, Tolerance::DEFAULT.probe);
    }
}
