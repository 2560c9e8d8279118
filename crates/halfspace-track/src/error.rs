//! Error types for model construction and line tracking.

use halfspace_math::Point3;
use halfspace_rule::RuleError;
use halfspace_surface::SurfaceError;
use thiserror::Error;

use crate::line_track::TrackSegment;

/// Errors that can occur while building a model or tracing through it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrackError {
    /// No cell other than the current one lies across the surface.
    #[error("no neighbour cell across surface {surface}")]
    NoNeighbor {
        /// The crossed surface, signed by the side entered.
        surface: i32,
    },

    /// Several cells lie across the surface; the model overlaps.
    #[error("ambiguous neighbour across surface {surface}: cells {cells:?}")]
    AmbiguousNeighbor {
        /// The crossed surface, signed by the side entered.
        surface: i32,
        /// Every cell valid just past the crossing.
        cells: Vec<i32>,
    },

    /// The start point is in no cell, or in several that a probe
    /// along the direction cannot separate.
    #[error("start point {point} is not inside exactly one cell (matches: {matches:?})")]
    StartNotInAnyCell {
        /// The start point.
        point: Point3,
        /// Cells containing the start point.
        matches: Vec<i32>,
    },

    /// The track stopped before its end; the segments found so far are kept.
    #[error("track incomplete after {} segments: {source}", segments.len())]
    IncompleteTrack {
        /// Segments recorded before the failure.
        segments: Vec<TrackSegment>,
        /// The neighbour lookup failure.
        source: Box<TrackError>,
    },

    /// Start and end coincide, so the track has no direction.
    #[error("track from {point} has zero length")]
    DegenerateTrack {
        /// The start (and end) point.
        point: Point3,
    },

    /// The track recorded `steps` segments without reaching its end.
    #[error("track exceeded {steps} steps")]
    StepLimit {
        /// The configured step bound.
        steps: usize,
    },

    /// A cell with this id already exists.
    #[error("duplicate cell {0}")]
    DuplicateCell(i32),

    /// No cell with this id exists.
    #[error("unknown cell {0}")]
    UnknownCell(i32),

    /// Invalid tracking settings.
    #[error("invalid track settings: {0}")]
    InvalidConfig(String),

    /// Rule parsing or evaluation failed.
    #[error(transparent)]
    Rule(#[from] RuleError),

    /// Surface lookup failed.
    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

/// Result type for tracking operations.
pub type Result<T> = std::result::Result<T, TrackError>;
