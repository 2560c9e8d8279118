//! Surface-to-cell ownership for neighbour lookup.

use std::collections::{BTreeMap, BTreeSet};

use halfspace_math::{offset, Dir3, Point3};
use tracing::debug;

use crate::cell::Cell;
use crate::error::{Result, TrackError};
use crate::model::FrozenModel;

/// Multimap from surface id to the cells whose rules reference it.
///
/// Owners are indexed by surface magnitude, so both senses of a surface
/// share one entry.
#[derive(Debug, Clone, Default)]
pub struct ObjSurfMap {
    owners: BTreeMap<i32, BTreeSet<i32>>,
    surfaces: BTreeMap<i32, Vec<i32>>,
}

impl ObjSurfMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `cell` as an owner of each surface its rule references.
    pub fn register_cell(&mut self, cell: &Cell) {
        for surface in cell.surfaces() {
            self.owners
                .entry(surface.abs())
                .or_default()
                .insert(cell.id());
        }
        self.surfaces.insert(cell.id(), cell.surfaces().to_vec());
    }

    /// Forget a cell. Returns whether it was registered.
    pub fn remove_cell(&mut self, id: i32) -> bool {
        let Some(surfaces) = self.surfaces.remove(&id) else {
            return false;
        };
        for surface in surfaces {
            let key = surface.abs();
            if let Some(set) = self.owners.get_mut(&key) {
                set.remove(&id);
                if set.is_empty() {
                    self.owners.remove(&key);
                }
            }
        }
        true
    }

    /// Cells referencing either sense of `surface`, ascending.
    pub fn owners(&self, surface: i32) -> impl Iterator<Item = i32> + '_ {
        self.owners
            .get(&surface.abs())
            .into_iter()
            .flatten()
            .copied()
    }

    /// Signed surfaces of a registered cell.
    pub fn surfaces_of(&self, cell: i32) -> Option<&[i32]> {
        self.surfaces.get(&cell).map(Vec::as_slice)
    }

    /// Number of distinct surfaces with at least one owner.
    pub fn surface_count(&self) -> usize {
        self.owners.len()
    }

    /// The cell entered when leaving `current` across `surface` at `point`.
    ///
    /// Each owner other than `current` is tested at a point one probe
    /// offset past `point` along `direction`.
    pub fn find_neighbor(
        &self,
        model: &FrozenModel,
        surface: i32,
        point: &Point3,
        direction: &Dir3,
        current: i32,
    ) -> Result<i32> {
        let probe = offset(point, direction, model.registry().tolerance().probe);
        let mut matches = Vec::new();
        for id in self.owners(surface).filter(|id| *id != current) {
            let cell = model.cell(id).ok_or(TrackError::UnknownCell(id))?;
            if cell.rule().is_valid(model.registry(), &probe)? {
                matches.push(id);
            }
        }
        match matches.as_slice() {
            [] => Err(TrackError::NoNeighbor { surface }),
            [next] => {
                debug!(surface, from = current, to = *next, "neighbour resolved");
                Ok(*next)
            }
            _ => Err(TrackError::AmbiguousNeighbor {
                surface,
                cells: matches,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Model;
    use halfspace_math::Vec3;
    use halfspace_surface::{Plane, SurfaceRegistry};

    fn slabs() -> FrozenModel {
        let mut registry = SurfaceRegistry::new();
        registry.register(1, Plane::px(0.0)).unwrap();
        registry.register(2, Plane::px(1.0)).unwrap();
        let mut model = Model::new(registry);
        model.add_cell(1, "-1", "void").unwrap();
        model.add_cell(2, "1 -2", "iron").unwrap();
        model.add_cell(3, "2", "void").unwrap();
        model.freeze()
    }

    fn x_axis() -> Dir3 {
        Dir3::new_normalize(Vec3::x())
    }

    #[test]
    fn test_owners_by_magnitude() {
        let model = slabs();
        let map = model.obj_surf_map();
        assert_eq!(map.owners(1).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(map.owners(-2).collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(map.owners(9).count(), 0);
        assert_eq!(map.surfaces_of(2), Some(&[1, -2][..]));
        assert_eq!(map.surface_count(), 2);
    }

    #[test]
    fn test_find_neighbor() {
        let model = slabs();
        let map = model.obj_surf_map();
        let at = Point3::new(0.0, 0.0, 0.0);
        let next = map.find_neighbor(&model, 1, &at, &x_axis(), 1).unwrap();
        assert_eq!(next, 2);

        // Backwards across the same surface
        let back = Dir3::new_normalize(-Vec3::x());
        let prev = map.find_neighbor(&model, -1, &at, &back, 2).unwrap();
        assert_eq!(prev, 1);
    }

    #[test]
    fn test_no_neighbor_outside_model() {
        let mut registry = SurfaceRegistry::new();
        registry.register(1, Plane::px(0.0)).unwrap();
        let mut model = Model::new(registry);
        model.add_cell(1, "-1", "iron").unwrap();
        let model = model.freeze();

        let err = model
            .obj_surf_map()
            .find_neighbor(&model, 1, &Point3::origin(), &x_axis(), 1)
            .unwrap_err();
        assert_eq!(err, TrackError::NoNeighbor { surface: 1 });
    }

    #[test]
    fn test_three_owners_ambiguous() {
        let mut registry = SurfaceRegistry::new();
        registry.register(1, Plane::px(0.0)).unwrap();
        let mut model = Model::new(registry);
        model.add_cell(1, "-1", "iron").unwrap();
        model.add_cell(2, "1", "void").unwrap();
        model.add_cell(3, "1", "void").unwrap();
        let model = model.freeze();

        let err = model
            .obj_surf_map()
            .find_neighbor(&model, 1, &Point3::origin(), &x_axis(), 1)
            .unwrap_err();
        assert_eq!(
            err,
            TrackError::AmbiguousNeighbor {
                surface: 1,
                cells: vec![2, 3]
            }
        );
    }

    #[test]
    fn test_remove_cell() {
        let cell = Cell::parse(4, "1 -2", "iron").unwrap();
        let mut map = ObjSurfMap::new();
        map.register_cell(&cell);
        assert!(map.remove_cell(4));
        assert!(!map.remove_cell(4));
        assert_eq!(map.owners(1).count(), 0);
        assert_eq!(map.surface_count(), 0);
    }
}
