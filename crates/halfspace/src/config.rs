//! Kernel-wide settings loaded from TOML.

use std::path::Path;

use halfspace_algebra::{Algebra, AlgebraConfig};
use halfspace_math::Tolerance;
use halfspace_surface::SurfaceRegistry;
use halfspace_track::{FrozenModel, Model, TrackConfig};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Settings for every kernel component.
///
/// Missing tables and keys take their defaults, so a partial file such as
///
/// ```toml
/// [algebra]
/// max_literals = 12
/// ```
///
/// is valid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    /// On-surface and probe tolerances.
    pub tolerance: Tolerance,
    /// Simplifier settings.
    pub algebra: AlgebraConfig,
    /// Line tracking settings.
    pub track: TrackConfig,
}

impl KernelConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Render as a TOML document.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        if !self.tolerance.is_consistent() {
            return Err(ConfigError::Invalid(
                "tolerance.linear must be positive and below tolerance.probe".into(),
            ));
        }
        self.algebra
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        self.track
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(())
    }

    /// An empty surface registry using these tolerances.
    pub fn registry(&self) -> SurfaceRegistry {
        SurfaceRegistry::with_tolerance(self.tolerance)
    }

    /// A simplifier using these settings.
    pub fn algebra(&self) -> Result<Algebra> {
        Algebra::new(self.algebra).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Freeze `model` with these tracking settings.
    pub fn freeze(&self, model: Model) -> FrozenModel {
        model.freeze_with(self.track)
    }
}
