//! Error types for rule parsing, evaluation and tracking.

use halfspace_surface::SurfaceError;
use thiserror::Error;

/// Errors that can occur while building or querying a rule.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuleError {
    /// Malformed rule expression.
    #[error("rule parse error at position {position}: unexpected `{token}`")]
    Parse {
        /// Byte offset of the offending token (0-indexed).
        position: usize,
        /// The offending token text, or `<end>` at end of input.
        token: String,
    },

    /// No boundary of the rule lies along the ray within the bound.
    #[error("no exit surface within distance {max_distance}")]
    NoExit {
        /// The distance that was searched.
        max_distance: f64,
    },

    /// Surface lookup failed during evaluation.
    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

impl RuleError {
    /// Create a parse error.
    pub fn parse(position: usize, token: impl Into<String>) -> Self {
        Self::Parse {
            position,
            token: token.into(),
        }
    }
}

/// Result type for rule operations.
pub type Result<T> = std::result::Result<T, RuleError>;
