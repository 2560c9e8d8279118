//! Walking a line through the cell complex.

use std::collections::BTreeMap;

use halfspace_math::{offset, Dir3, Point3};
use halfspace_rule::RuleError;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cell::Cell;
use crate::error::{Result, TrackError};
use crate::model::FrozenModel;

/// Line tracking parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackConfig {
    /// Segments recorded before a track is abandoned.
    pub max_steps: usize,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self { max_steps: 10_000 }
    }
}

impl TrackConfig {
    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        if self.max_steps == 0 {
            return Err(TrackError::InvalidConfig(
                "max_steps must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Progress of a [`LineTrack`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackState {
    /// Not yet calculated, or in progress.
    Tracking,
    /// Reached the end point.
    Complete,
    /// Stopped early; see the error returned by [`LineTrack::calculate`].
    Failed,
}

/// One cell traversal along a track.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackSegment {
    /// Cell traversed.
    pub cell: i32,
    /// Material of the cell.
    pub material: String,
    /// Surface crossed to enter, `None` for the first segment.
    pub entry_surface: Option<i32>,
    /// Surface crossed to leave, `None` when the track ends inside the cell.
    pub exit_surface: Option<i32>,
    /// Distance from the start where the segment begins.
    pub entry_distance: f64,
    /// Distance from the start where the segment ends.
    pub exit_distance: f64,
}

impl TrackSegment {
    /// Path length inside the cell.
    pub fn length(&self) -> f64 {
        self.exit_distance - self.entry_distance
    }
}

/// An ordered sequence of cell segments from a start point to an end.
#[derive(Debug, Clone)]
pub struct LineTrack {
    start: Point3,
    direction: Dir3,
    distance: f64,
    state: TrackState,
    segments: Vec<TrackSegment>,
}

impl LineTrack {
    /// Track from `start` to `end`. Fails if the points coincide.
    pub fn new(start: Point3, end: Point3) -> Result<Self> {
        let delta = end - start;
        let distance = delta.norm();
        let direction = Dir3::try_new(delta, f64::EPSILON)
            .ok_or(TrackError::DegenerateTrack { point: start })?;
        Self::with_direction(start, direction, distance)
    }

    /// Track `max_distance` from `start` along `direction`.
    ///
    /// The distance must be finite and positive.
    pub fn with_direction(start: Point3, direction: Dir3, max_distance: f64) -> Result<Self> {
        if !max_distance.is_finite() || max_distance <= 0.0 {
            return Err(TrackError::DegenerateTrack { point: start });
        }
        Ok(Self {
            start,
            direction,
            distance: max_distance,
            state: TrackState::Tracking,
            segments: Vec::new(),
        })
    }

    /// Start point.
    pub fn start(&self) -> Point3 {
        self.start
    }

    /// End point.
    pub fn end(&self) -> Point3 {
        offset(&self.start, &self.direction, self.distance)
    }

    /// Unit direction.
    pub fn direction(&self) -> Dir3 {
        self.direction
    }

    /// Target distance.
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Current state.
    pub fn state(&self) -> TrackState {
        self.state
    }

    /// Segments recorded so far, in order.
    pub fn segments(&self) -> &[TrackSegment] {
        &self.segments
    }

    /// Traversed cell ids, in order.
    pub fn cells(&self) -> Vec<i32> {
        self.segments.iter().map(|s| s.cell).collect()
    }

    /// Sum of segment lengths.
    pub fn total_length(&self) -> f64 {
        self.segments.iter().map(TrackSegment::length).sum()
    }

    /// Path length per material.
    pub fn material_lengths(&self) -> BTreeMap<String, f64> {
        let mut out = BTreeMap::new();
        for s in &self.segments {
            *out.entry(s.material.clone()).or_insert(0.0) += s.length();
        }
        out
    }

    /// Walk the track through `model`.
    ///
    /// Recalculating discards earlier segments. On failure the segments
    /// found before the failure stay readable through [`segments`](Self::segments).
    pub fn calculate(&mut self, model: &FrozenModel) -> Result<()> {
        self.segments.clear();
        self.state = TrackState::Tracking;
        let result = self.walk(model);
        self.state = match result {
            Ok(()) => TrackState::Complete,
            Err(_) => TrackState::Failed,
        };
        result
    }

    fn walk(&mut self, model: &FrozenModel) -> Result<()> {
        let registry = model.registry();
        let linear = registry.tolerance().linear;
        let max_steps = model.config().max_steps;

        let mut current = model.start_cell(&self.start, &self.direction)?;
        let mut travelled = 0.0;
        let mut entry_surface = None;

        loop {
            if self.segments.len() >= max_steps {
                return Err(TrackError::StepLimit { steps: max_steps });
            }
            let cell = model.cell(current).ok_or(TrackError::UnknownCell(current))?;
            let point = offset(&self.start, &self.direction, travelled);
            let remaining = self.distance - travelled;

            let crossing = match cell
                .rule()
                .track_surf(registry, &point, &self.direction, remaining)
            {
                Ok(c) => Some(c),
                Err(RuleError::NoExit { .. }) => None,
                Err(e) => return Err(e.into()),
            };

            // A crossing within tolerance of the end finishes the track
            let Some(exit) = crossing.filter(|c| travelled + c.distance < self.distance - linear)
            else {
                let exit_surface = crossing.map(|c| c.surface);
                self.push(cell, entry_surface, exit_surface, travelled, self.distance);
                return Ok(());
            };

            let exit_distance = travelled + exit.distance;
            self.push(cell, entry_surface, Some(exit.surface), travelled, exit_distance);

            let at = offset(&self.start, &self.direction, exit_distance);
            current = match model.find_neighbor(exit.surface, &at, &self.direction, current) {
                Ok(next) => next,
                Err(e @ (TrackError::NoNeighbor { .. } | TrackError::AmbiguousNeighbor { .. })) => {
                    return Err(TrackError::IncompleteTrack {
                        segments: self.segments.clone(),
                        source: Box::new(e),
                    });
                }
                Err(e) => return Err(e),
            };
            entry_surface = Some(exit.surface);
            travelled = exit_distance;
        }
    }

    fn push(
        &mut self,
        cell: &Cell,
        entry_surface: Option<i32>,
        exit_surface: Option<i32>,
        entry_distance: f64,
        exit_distance: f64,
    ) {
        debug!(
            cell = cell.id(),
            material = cell.material(),
            entry = entry_distance,
            exit = exit_distance,
            exit_surface = ?exit_surface,
            "track segment"
        );
        self.segments.push(TrackSegment {
            cell: cell.id(),
            material: cell.material().to_string(),
            entry_surface,
            exit_surface,
            entry_distance,
            exit_distance,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Model;
    use approx::assert_relative_eq;
    use halfspace_math::Vec3;
    use halfspace_surface::{Plane, Sphere, SurfaceRegistry};

    fn sphere_model(config: TrackConfig) -> FrozenModel {
        let mut registry = SurfaceRegistry::new();
        registry
            .register(2, Sphere::new(Point3::origin(), 5.0).unwrap())
            .unwrap();
        let mut model = Model::new(registry);
        model.add_cell(1, "2", "void").unwrap();
        model.add_cell(2, "-2", "A").unwrap();
        model.freeze_with(config)
    }

    fn slab_model() -> FrozenModel {
        let mut registry = SurfaceRegistry::new();
        registry.register(1, Plane::px(0.0)).unwrap();
        registry.register(2, Plane::px(1.0)).unwrap();
        let mut model = Model::new(registry);
        model.add_cell(1, "-1", "void").unwrap();
        model.add_cell(2, "1 -2", "iron").unwrap();
        model.freeze()
    }

    #[test]
    fn test_sphere_track() {
        let model = sphere_model(TrackConfig::default());
        let mut track =
            LineTrack::new(Point3::new(-10.0, 0.0, 0.0), Point3::new(10.0, 0.0, 0.0)).unwrap();
        track.calculate(&model).unwrap();

        assert_eq!(track.state(), TrackState::Complete);
        assert_eq!(track.cells(), vec![1, 2, 1]);
        let lengths: Vec<f64> = track.segments().iter().map(TrackSegment::length).collect();
        assert_relative_eq!(lengths[0], 5.0, epsilon = 1e-9);
        assert_relative_eq!(lengths[1], 10.0, epsilon = 1e-9);
        assert_relative_eq!(lengths[2], 5.0, epsilon = 1e-9);
        assert_relative_eq!(track.total_length(), 20.0, epsilon = 1e-9);

        let s = track.segments();
        assert_eq!((s[0].entry_surface, s[0].exit_surface), (None, Some(-2)));
        assert_eq!((s[1].entry_surface, s[1].exit_surface), (Some(-2), Some(2)));
        assert_eq!((s[2].entry_surface, s[2].exit_surface), (Some(2), None));

        let by_material = track.material_lengths();
        assert_relative_eq!(by_material["A"], 10.0, epsilon = 1e-9);
        assert_relative_eq!(by_material["void"], 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_track_ending_inside_cell() {
        let model = sphere_model(TrackConfig::default());
        let dir = Dir3::new_normalize(Vec3::x());
        let mut track = LineTrack::with_direction(Point3::new(-10.0, 0.0, 0.0), dir, 8.0).unwrap();
        track.calculate(&model).unwrap();
        assert_eq!(track.cells(), vec![1, 2]);
        assert_relative_eq!(track.segments()[1].length(), 3.0, epsilon = 1e-9);
        assert_eq!(track.segments()[1].exit_surface, None);
        assert_relative_eq!(track.end().x, -2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_incomplete_track_keeps_segments() {
        let model = slab_model();
        let mut track =
            LineTrack::new(Point3::new(-1.0, 0.0, 0.0), Point3::new(5.0, 0.0, 0.0)).unwrap();
        let err = track.calculate(&model).unwrap_err();

        assert_eq!(track.state(), TrackState::Failed);
        assert_eq!(track.cells(), vec![1, 2]);
        match err {
            TrackError::IncompleteTrack { segments, source } => {
                assert_eq!(segments.len(), 2);
                assert_eq!(*source, TrackError::NoNeighbor { surface: 2 });
            }
            other => panic!("expected an incomplete track, got {other:?}"),
        }
    }

    #[test]
    fn test_start_outside_model() {
        let model = slab_model();
        let mut track =
            LineTrack::new(Point3::new(3.0, 0.0, 0.0), Point3::new(5.0, 0.0, 0.0)).unwrap();
        assert!(matches!(
            track.calculate(&model),
            Err(TrackError::StartNotInAnyCell { .. })
        ));
        assert!(track.segments().is_empty());
    }

    #[test]
    fn test_step_limit() {
        let model = sphere_model(TrackConfig { max_steps: 1 });
        let mut track =
            LineTrack::new(Point3::new(-10.0, 0.0, 0.0), Point3::new(10.0, 0.0, 0.0)).unwrap();
        assert_eq!(
            track.calculate(&model).unwrap_err(),
            TrackError::StepLimit { steps: 1 }
        );
        assert_eq!(track.segments().len(), 1);
        assert!(TrackConfig { max_steps: 0 }.validate().is_err());
    }

    #[test]
    fn test_degenerate_track() {
        let p = Point3::new(1.0, 2.0, 3.0);
        assert_eq!(
            LineTrack::new(p, p).unwrap_err(),
            TrackError::DegenerateTrack { point: p }
        );
        let dir = Dir3::new_normalize(Vec3::x());
        for bad in [-3.0, 0.0, f64::NAN, f64::INFINITY] {
            assert_eq!(
                LineTrack::with_direction(p, dir, bad).unwrap_err(),
                TrackError::DegenerateTrack { point: p },
                "{bad}"
            );
        }
    }

    #[test]
    fn test_track_leaving_complement_cell_boundary() {
        let mut registry = SurfaceRegistry::new();
        registry
            .register(2, Sphere::new(Point3::origin(), 5.0).unwrap())
            .unwrap();
        let mut model = Model::new(registry);
        model.add_cell(1, "-2", "A").unwrap();
        model.add_cell(2, "#-2", "void").unwrap();
        let model = model.freeze();

        let mut track =
            LineTrack::new(Point3::new(5.0, 0.0, 0.0), Point3::new(10.0, 0.0, 0.0)).unwrap();
        track.calculate(&model).unwrap();
        assert_eq!(track.state(), TrackState::Complete);
        assert_eq!(track.cells(), vec![2]);
        assert_eq!(track.segments()[0].material, "void");
        assert_relative_eq!(track.total_length(), 5.0, epsilon = 1e-9);

        let mut inward =
            LineTrack::new(Point3::new(5.0, 0.0, 0.0), Point3::new(-10.0, 0.0, 0.0)).unwrap();
        inward.calculate(&model).unwrap();
        assert_eq!(inward.cells(), vec![1, 2]);
        assert_relative_eq!(inward.segments()[0].length(), 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_trace_all() {
        let model = sphere_model(TrackConfig::default());
        let pairs = vec![
            (Point3::new(-10.0, 0.0, 0.0), Point3::new(10.0, 0.0, 0.0)),
            (Point3::new(0.0, -10.0, 0.0), Point3::new(0.0, 0.0, 0.0)),
            (Point3::origin(), Point3::origin()),
        ];
        let out = model.trace_all(&pairs);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].as_ref().unwrap().cells(), vec![1, 2, 1]);
        let second = out[1].as_ref().unwrap();
        assert_eq!(second.cells(), vec![1, 2]);
        assert_relative_eq!(second.total_length(), 10.0, epsilon = 1e-9);
        assert!(out[2].is_err());
    }
}
