#![warn(missing_docs)]

//! Half-space constructive solid geometry kernel.
//!
//! Re-exports the component crates and adds [`KernelConfig`], a TOML
//! loadable bundle of their settings.
//!
//! # Architecture
//!
//! - [`halfspace_math`] - points, directions and tolerances
//! - [`halfspace_surface`] - primitives and the [`SurfaceRegistry`]
//! - [`halfspace_rule`] - [`HeadRule`] parsing, evaluation and boundary tracking
//! - [`halfspace_algebra`] - rule minimization
//! - [`halfspace_track`] - cells, the frozen model and [`LineTrack`]
//!
//! # Example
//!
//! ```
//! use halfspace::{KernelConfig, LineTrack, Model, Plane, Point3, Sphere};
//!
//! let config = KernelConfig::default();
//! let mut registry = config.registry();
//! registry.register(1, Plane::px(0.0)).unwrap();
//! registry.register(2, Sphere::new(Point3::origin(), 5.0).unwrap()).unwrap();
//!
//! let mut model = Model::new(registry);
//! model.add_cell(1, "1 -2", "A").unwrap();
//! model.add_cell(2, "#(1 -2)", "void").unwrap();
//! let model = config.freeze(model);
//!
//! let mut track = LineTrack::new(Point3::new(-10.0, 0.0, 0.0), Point3::new(10.0, 0.0, 0.0)).unwrap();
//! track.calculate(&model).unwrap();
//! assert_eq!(track.cells(), vec![2, 1, 2]);
//! ```

pub use halfspace_algebra;
pub use halfspace_math;
pub use halfspace_rule;
pub use halfspace_surface;
pub use halfspace_track;

pub mod config;
pub mod error;

pub use config::KernelConfig;
pub use error::{ConfigError, Result};

pub use halfspace_algebra::{Algebra, AlgebraConfig, Simplification, Simplified};
pub use halfspace_math::{Dir3, Point3, Tolerance, Vec3};
pub use halfspace_rule::{HeadRule, Rule, RuleError, SurfaceCrossing};
pub use halfspace_surface::{
    Cone, Cylinder, HalfSpace, Plane, Ray, Side, Sphere, SurfaceError, SurfaceRegistry,
};
pub use halfspace_track::{
    Cell, FrozenModel, LineTrack, Model, ObjSurfMap, TrackConfig, TrackError, TrackSegment,
    TrackState,
};
