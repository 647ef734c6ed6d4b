//! Core error types for sirru-core.
//!
//! The timing engines never fail; errors only arise at the edges where
//! user-supplied configuration or check-in input is accepted.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for sirru-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Dot-path key that does not exist in the configuration
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Home directory could not be resolved
    #[error("Could not determine the home directory")]
    NoHomeDir,
}

/// Validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Region code not in the fixed region list
    #[error("Unknown region code: {0}")]
    UnknownRegion(String),

    /// Nickname too short after trimming
    #[error("Nickname must be at least {min} characters")]
    NicknameTooShort { min: usize },

    /// Nickname too long after trimming
    #[error("Nickname must be at most {max} characters")]
    NicknameTooLong { max: usize },

    /// Script offsets went backwards
    #[error("Script event '{id}' at {offset_ms}ms precedes the previous event at {previous_ms}ms")]
    OffsetOutOfOrder {
        id: String,
        offset_ms: u64,
        previous_ms: u64,
    },

    /// Two script events share an id
    #[error("Duplicate script event id: {0}")]
    DuplicateId(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

impl From<toml::de::Error> for CoreError {
    fn from(err: toml::de::Error) -> Self {
        CoreError::Config(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
