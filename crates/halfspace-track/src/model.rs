//! The cell complex: mutable while it is built, frozen for queries.

use std::collections::BTreeMap;

use halfspace_algebra::{Algebra, Simplified};
use halfspace_math::{offset, Dir3, Point3};
use halfspace_rule::HeadRule;
use halfspace_surface::{SurfaceError, SurfaceRegistry};
use rayon::prelude::*;
use tracing::{info, warn};

use crate::cell::Cell;
use crate::error::{Result, TrackError};
use crate::line_track::{LineTrack, TrackConfig};
use crate::obj_surf_map::ObjSurfMap;

/// A model under construction: a surface registry and cells keyed by id.
#[derive(Debug, Default)]
pub struct Model {
    registry: SurfaceRegistry,
    cells: BTreeMap<i32, Cell>,
}

impl Model {
    /// Create an empty model over `registry`.
    pub fn new(registry: SurfaceRegistry) -> Self {
        Self {
            registry,
            cells: BTreeMap::new(),
        }
    }

    /// The surface registry.
    pub fn registry(&self) -> &SurfaceRegistry {
        &self.registry
    }

    /// Mutable access to the registry for adding surfaces.
    pub fn registry_mut(&mut self) -> &mut SurfaceRegistry {
        &mut self.registry
    }

    /// Parse `expression` and add it as cell `id`.
    pub fn add_cell(&mut self, id: i32, expression: &str, material: &str) -> Result<()> {
        self.add_cell_rule(Cell::parse(id, expression, material)?)
    }

    /// Add a prebuilt cell.
    ///
    /// Every surface the rule references must already be registered.
    pub fn add_cell_rule(&mut self, cell: Cell) -> Result<()> {
        if self.cells.contains_key(&cell.id()) {
            return Err(TrackError::DuplicateCell(cell.id()));
        }
        if let Some(missing) = cell
            .rule()
            .surface_set()
            .into_iter()
            .find(|s| !self.registry.contains(*s))
        {
            return Err(SurfaceError::UnknownSurface(missing).into());
        }
        self.cells.insert(cell.id(), cell);
        Ok(())
    }

    /// Look up a cell.
    pub fn cell(&self, id: i32) -> Option<&Cell> {
        self.cells.get(&id)
    }

    /// Mutable access to a cell for rule edits.
    pub fn cell_mut(&mut self, id: i32) -> Result<&mut Cell> {
        self.cells.get_mut(&id).ok_or(TrackError::UnknownCell(id))
    }

    /// Remove and return a cell.
    pub fn remove_cell(&mut self, id: i32) -> Result<Cell> {
        self.cells.remove(&id).ok_or(TrackError::UnknownCell(id))
    }

    /// Cells in ascending id order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.values()
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the model has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Rewrite surface `old` to `new` in every cell rule. Returns the
    /// number of replaced literals.
    pub fn renumber_surface(&mut self, old: i32, new: i32) -> Result<usize> {
        if !self.registry.contains(new) {
            return Err(SurfaceError::UnknownSurface(new.abs()).into());
        }
        let replaced: usize = self
            .cells
            .values_mut()
            .map(|cell| cell.update_rule(|rule| rule.substitute_surface(old, new)))
            .sum();
        Ok(replaced)
    }

    /// Replace every cell rule with its minimized form.
    ///
    /// Cells whose rules are always false are removed; their ids are
    /// returned in ascending order.
    pub fn simplify_cells(&mut self, algebra: &Algebra) -> Vec<i32> {
        let ids: Vec<i32> = self.cells.keys().copied().collect();
        let rules: Vec<HeadRule> = self.cells.values().map(|c| c.rule().clone()).collect();
        let results = algebra.simplify_all(&rules);

        let mut removed = Vec::new();
        for (id, result) in ids.into_iter().zip(results) {
            if !result.minimized {
                continue;
            }
            match result.outcome {
                Simplified::AlwaysFalse => {
                    self.cells.remove(&id);
                    removed.push(id);
                }
                Simplified::AlwaysTrue => {
                    if let Some(cell) = self.cells.get_mut(&id) {
                        cell.set_rule(HeadRule::new());
                    }
                }
                Simplified::Rule(rule) => {
                    if let Some(cell) = self.cells.get_mut(&id) {
                        cell.set_rule(rule);
                    }
                }
            }
        }
        if !removed.is_empty() {
            warn!(cells = ?removed, "removed always-false cells");
        }
        removed
    }

    /// Freeze with default tracking settings.
    pub fn freeze(self) -> FrozenModel {
        self.freeze_with(TrackConfig::default())
    }

    /// Build the surface ownership map and freeze the model for queries.
    pub fn freeze_with(self, config: TrackConfig) -> FrozenModel {
        let mut map = ObjSurfMap::new();
        for cell in self.cells.values() {
            map.register_cell(cell);
        }
        info!(
            cells = self.cells.len(),
            surfaces = self.registry.len(),
            owned_surfaces = map.surface_count(),
            "model frozen"
        );
        FrozenModel {
            registry: self.registry,
            cells: self.cells,
            map,
            config,
        }
    }
}

/// An immutable model, safe to share between tracing threads.
#[derive(Debug)]
pub struct FrozenModel {
    registry: SurfaceRegistry,
    cells: BTreeMap<i32, Cell>,
    map: ObjSurfMap,
    config: TrackConfig,
}

impl FrozenModel {
    /// The surface registry.
    pub fn registry(&self) -> &SurfaceRegistry {
        &self.registry
    }

    /// Look up a cell.
    pub fn cell(&self, id: i32) -> Option<&Cell> {
        self.cells.get(&id)
    }

    /// Cells in ascending id order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.values()
    }

    /// The surface ownership map.
    pub fn obj_surf_map(&self) -> &ObjSurfMap {
        &self.map
    }

    /// Tracking settings.
    pub fn config(&self) -> &TrackConfig {
        &self.config
    }

    /// See [`ObjSurfMap::find_neighbor`].
    pub fn find_neighbor(
        &self,
        surface: i32,
        point: &Point3,
        direction: &Dir3,
        current: i32,
    ) -> Result<i32> {
        self.map.find_neighbor(self, surface, point, direction, current)
    }

    /// Every cell containing `point`, ascending.
    pub fn cells_containing(&self, point: &Point3) -> Result<Vec<i32>> {
        let mut out = Vec::new();
        for cell in self.cells.values() {
            if cell.rule().is_valid(&self.registry, point)? {
                out.push(cell.id());
            }
        }
        Ok(out)
    }

    /// A cell containing `point`: `hint` if it does, else the first by id.
    pub fn find_cell(&self, point: &Point3, hint: Option<i32>) -> Result<Option<i32>> {
        if let Some(cell) = hint.and_then(|id| self.cells.get(&id)) {
            if cell.rule().is_valid(&self.registry, point)? {
                return Ok(Some(cell.id()));
            }
        }
        for cell in self.cells.values() {
            if Some(cell.id()) != hint && cell.rule().is_valid(&self.registry, point)? {
                return Ok(Some(cell.id()));
            }
        }
        Ok(None)
    }

    /// The single cell a track starting at `point` along `direction` begins in.
    ///
    /// The cell is chosen at a probe offset along the direction, so a start
    /// on a boundary lands in the cell the track actually enters. When the
    /// probe point is itself unresolved the start point decides.
    pub fn start_cell(&self, point: &Point3, direction: &Dir3) -> Result<i32> {
        let probe = offset(point, direction, self.registry.tolerance().probe);
        let ahead = self.cells_containing(&probe)?;
        if let [only] = ahead.as_slice() {
            return Ok(*only);
        }
        let matches = self.cells_containing(point)?;
        if let [only] = matches.as_slice() {
            return Ok(*only);
        }
        Err(TrackError::StartNotInAnyCell {
            point: *point,
            matches,
        })
    }

    /// Trace many `(start, end)` pairs in parallel, preserving order.
    pub fn trace_all(&self, pairs: &[(Point3, Point3)]) -> Vec<Result<LineTrack>> {
        pairs
            .par_iter()
            .map(|(start, end)| -> Result<LineTrack> {
                let mut track = LineTrack::new(*start, *end)?;
                track.calculate(self)?;
                Ok(track)
            })
            .collect()
    }
}
