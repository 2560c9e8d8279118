#![warn(missing_docs)]

//! Half-space surfaces for the halfspace CSG kernel.
//!
//! A surface splits space into a positive and a negative side. Cells
//! refer to surfaces only by integer id, so this crate owns them in a
//! [`SurfaceRegistry`] that classifies points and intersects rays.
//!
//! # Architecture
//!
//! - [`HalfSpace`] - trait implemented by every surface
//! - [`Side`] - classification of a point against a surface
//! - [`Ray`] - origin plus unit direction
//! - [`primitives`] - plane, sphere, cylinder and cone
//! - [`SurfaceRegistry`] - id-indexed surface arena
//!
//! # Example
//!
//! ```
//! use halfspace_math::{Point3, Vec3};
//! use halfspace_surface::{Plane, Side, Sphere, SurfaceRegistry};
//!
//! let mut registry = SurfaceRegistry::new();
//! registry.register(1, Plane::new(Point3::origin(), Vec3::x()).unwrap()).unwrap();
//! registry.register(2, Sphere::new(Point3::origin(), 5.0).unwrap()).unwrap();
//!
//! let p = Point3::new(1.0, 1.0, 1.0);
//! assert_eq!(registry.side_of(1, &p).unwrap(), Side::Positive);
//! assert_eq!(registry.side_of(2, &p).unwrap(), Side::Negative);
//! ```

pub mod error;
pub mod primitives;
mod ray;
mod registry;

pub use error::{Result, SurfaceError};
pub use primitives::{Cone, Cylinder, Plane, Sphere};
pub use ray::Ray;
pub use registry::SurfaceRegistry;

use halfspace_math::{Point3, Tolerance};

/// A surface that partitions space into two half-spaces.
///
/// `value` is signed: positive on the positive side, negative on the
/// negative side. Its magnitude should approximate the distance to the
/// surface near the surface, so that [`Tolerance::linear`] is a length.
pub trait HalfSpace: Send + Sync + std::fmt::Debug {
    /// Signed evaluation of the surface at `p`.
    fn value(&self, p: &Point3) -> f64;

    /// All ray parameters `t >= 0` at which `ray` crosses the surface,
    /// sorted ascending.
    fn intersect(&self, ray: &Ray) -> Vec<f64>;
}

/// Which half-space a point lies in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Strictly on the positive side.
    Positive,
    /// Strictly on the negative side.
    Negative,
    /// Within tolerance of the surface; belongs to both half-spaces.
    On,
}

impl Side {
    /// Classify a signed surface value.
    pub fn from_value(value: f64, tol: &Tolerance) -> Self {
        if tol.is_zero(value) {
            Side::On
        } else if value > 0.0 {
            Side::Positive
        } else {
            Side::Negative
        }
    }

    /// Whether a literal with the sign of `literal` holds on this side.
    ///
    /// `On` satisfies both senses.
    pub fn satisfies(self, literal: i32) -> bool {
        match self {
            Side::On => true,
            Side::Positive => literal > 0,
            Side::Negative => literal < 0,
        }
    }
}

/// Sort ray parameters ascending and drop those behind the origin.
pub(crate) fn forward_hits(ts: impl IntoIterator<Item = f64>) -> Vec<f64> {
    let mut hits: Vec<f64> = ts.into_iter().filter(|t| *t >= 0.0).collect();
    hits.sort_by(|a, b| a.total_cmp(b));
    hits
}
