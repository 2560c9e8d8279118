//! Error types for surface registration and lookup.

use thiserror::Error;

/// Errors raised by the surface registry and primitive constructors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SurfaceError {
    /// A surface with this id is already registered.
    #[error("surface {0} is already registered")]
    DuplicateSurface(i32),

    /// No surface with this id is registered.
    #[error("unknown surface {0}")]
    UnknownSurface(i32),

    /// Surface ids must be strictly positive; the sign belongs to literals.
    #[error("invalid surface id {0}: ids must be positive")]
    InvalidSurfaceId(i32),

    /// Primitive parameters do not describe a surface.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
}

/// Result type for surface operations.
pub type Result<T> = std::result::Result<T, SurfaceError>;
