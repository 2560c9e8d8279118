//! Error types for rule simplification.

use halfspace_rule::RuleError;
use thiserror::Error;

/// Errors that can occur while configuring or running the simplifier.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AlgebraError {
    /// The input expression did not parse.
    #[error(transparent)]
    Rule(#[from] RuleError),

    /// Invalid simplifier settings.
    #[error("invalid algebra settings: {0}")]
    InvalidConfig(String),
}

/// Result type for algebra operations.
pub type Result<T> = std::result::Result<T, AlgebraError>;
