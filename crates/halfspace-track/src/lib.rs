#![warn(missing_docs)]

//! Cell model and line tracking for the halfspace CSG kernel.
//!
//! A [`Model`] collects [`Cell`]s (a rule and a material under an id)
//! over a surface registry. Freezing it builds the surface ownership
//! map and yields a [`FrozenModel`], which is immutable and can be
//! shared across threads for queries.
//!
//! # Architecture
//!
//! - [`cell`] - cell id, rule, material and cached surface list
//! - [`model`] - build-time [`Model`] and query-time [`FrozenModel`]
//! - [`obj_surf_map`] - surface to owning-cell multimap and neighbour lookup
//! - [`line_track`] - the segment-by-segment line walker
//!
//! # Example
//!
//! ```
//! use halfspace_math::Point3;
//! use halfspace_surface::{Sphere, SurfaceRegistry};
//! use halfspace_track::{LineTrack, Model, TrackState};
//!
//! let mut registry = SurfaceRegistry::new();
//! registry.register(1, Sphere::new(Point3::origin(), 5.0).unwrap()).unwrap();
//!
//! let mut model = Model::new(registry);
//! model.add_cell(1, "1", "void").unwrap();
//! model.add_cell(2, "-1", "A").unwrap();
//! let model = model.freeze();
//!
//! let mut track = LineTrack::new(Point3::new(-10.0, 0.0, 0.0), Point3::new(10.0, 0.0, 0.0)).unwrap();
//! track.calculate(&model).unwrap();
//! assert_eq!(track.state(), TrackState::Complete);
//! assert_eq!(track.cells(), vec![1, 2, 1]);
//! ```

pub mod cell;
pub mod error;
pub mod line_track;
pub mod model;
pub mod obj_surf_map;

pub use cell::Cell;
pub use error::{Result, TrackError};
pub use line_track::{LineTrack, TrackConfig, TrackSegment, TrackState};
pub use model::{FrozenModel, Model};
pub use obj_surf_map::ObjSurfMap;
