//! Error types for kernel configuration.

use thiserror::Error;

/// Errors that can occur while loading or checking a [`KernelConfig`](crate::KernelConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration text is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),

    /// The configuration could not be written as TOML.
    #[error("failed to write config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A setting is out of range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
