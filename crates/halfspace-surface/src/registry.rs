//! Id-indexed surface arena.

use std::collections::BTreeMap;

use halfspace_math::{Point3, Tolerance};

use crate::error::{Result, SurfaceError};
use crate::{HalfSpace, Ray, Side};

/// Owns every surface of a model, keyed by positive surface id.
///
/// Rule literals refer to surfaces only by id; the sign of a literal
/// selects the half-space and never appears as a registry key.
#[derive(Debug, Default)]
pub struct SurfaceRegistry {
    surfaces: BTreeMap<i32, Box<dyn HalfSpace>>,
    tolerance: Tolerance,
}

impl SurfaceRegistry {
    /// Create an empty registry with default tolerances.
    pub fn new() -> Self {
        Self::with_tolerance(Tolerance::DEFAULT)
    }

    /// Create an empty registry with the given tolerances.
    pub fn with_tolerance(tolerance: Tolerance) -> Self {
        Self {
            surfaces: BTreeMap::new(),
            tolerance,
        }
    }

    /// The tolerances used for classification and probing.
    pub fn tolerance(&self) -> &Tolerance {
        &self.tolerance
    }

    /// Register a surface under `id`.
    pub fn register<S: HalfSpace + 'static>(&mut self, id: i32, surface: S) -> Result<()> {
        self.register_boxed(id, Box::new(surface))
    }

    /// Register an already boxed surface under `id`.
    pub fn register_boxed(&mut self, id: i32, surface: Box<dyn HalfSpace>) -> Result<()> {
        if id <= 0 {
            return Err(SurfaceError::InvalidSurfaceId(id));
        }
        if self.surfaces.contains_key(&id) {
            return Err(SurfaceError::DuplicateSurface(id));
        }
        self.surfaces.insert(id, surface);
        Ok(())
    }

    /// Look up a surface. Negative ids resolve to their magnitude.
    pub fn get(&self, id: i32) -> Option<&dyn HalfSpace> {
        id.checked_abs()
            .and_then(|key| self.surfaces.get(&key))
            .map(|s| s.as_ref())
    }

    /// Whether a surface with this id (or its magnitude) is registered.
    pub fn contains(&self, id: i32) -> bool {
        self.get(id).is_some()
    }

    fn lookup(&self, id: i32) -> Result<&dyn HalfSpace> {
        self.get(id)
            .ok_or(SurfaceError::UnknownSurface(id.wrapping_abs()))
    }

    /// Classify `point` against surface `id`.
    pub fn side_of(&self, id: i32, point: &Point3) -> Result<Side> {
        Ok(Side::from_value(self.value_of(id, point)?, &self.tolerance))
    }

    /// Signed surface value at `point`.
    pub fn value_of(&self, id: i32, point: &Point3) -> Result<f64> {
        Ok(self.lookup(id)?.value(point))
    }

    /// Forward crossings of `ray` with surface `id`, ascending.
    pub fn intersect(&self, id: i32, ray: &Ray) -> Result<Vec<f64>> {
        Ok(self.lookup(id)?.intersect(ray))
    }

    /// Registered ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = i32> + '_ {
        self.surfaces.keys().copied()
    }

    /// Number of registered surfaces.
    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    /// Whether no surfaces are registered.
    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }
}
