#![warn(missing_docs)]

//! Boolean rule trees for the halfspace CSG kernel.
//!
//! A cell is described by a boolean expression over signed surface
//! literals: `3` is the positive side of surface 3, `-3` the negative
//! side. Whitespace intersects, `+` unions, parentheses group and `#`
//! complements:
//!
//! ```text
//! 1 -2 (3 + -4) #(5 6)
//! ```
//!
//! The expression parses into a [`Rule`] tree held by a [`HeadRule`],
//! which evaluates point containment against a
//! [`SurfaceRegistry`](halfspace_surface::SurfaceRegistry), supports
//! structural edits, and finds the distance to the cell boundary along
//! a ray.
//!
//! # Example
//!
//! ```
//! use halfspace_math::{Point3, Vec3};
//! use halfspace_rule::HeadRule;
//! use halfspace_surface::{Plane, Sphere, SurfaceRegistry};
//!
//! let mut registry = SurfaceRegistry::new();
//! registry.register(1, Plane::px(0.0)).unwrap();
//! registry.register(2, Sphere::new(Point3::origin(), 5.0).unwrap()).unwrap();
//!
//! let rule = HeadRule::parse("1 -2").unwrap();
//! assert!(rule.is_valid(&registry, &Point3::new(1.0, 1.0, 1.0)).unwrap());
//! assert!(!rule.is_valid(&registry, &Point3::new(10.0, 10.0, 10.0)).unwrap());
//! assert_eq!(rule.to_string(), "1 -2");
//! ```

pub mod error;
mod head_rule;
mod parser;
mod rule;

pub use error::{Result, RuleError};
pub use head_rule::{HeadRule, SurfaceCrossing};
pub use parser::parse_rule;
pub use rule::Rule;
