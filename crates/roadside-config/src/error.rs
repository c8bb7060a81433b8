//! # Config Error Types
//!
//! Everything that can go wrong between a config file on disk and a built
//! `PricingEngine`.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Config Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │    File         │  │    Values       │  │     Tables              │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Io             │  │  Invalid        │  │  Pricing(PricingError)  │ │
//! │  │  Parse          │  │  (env, ranges)  │  │  MissingRule, ...       │ │
//! │  │  SaveFailed     │  │                 │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! None of these are retryable. A process that cannot build its engine
//! should refuse to start.

use std::path::PathBuf;

use roadside_pricing::{PricingError, ValidationError};
use thiserror::Error;

/// Result type alias for config operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML/JSON or does not match the schema.
    #[error("Failed to parse config: {0}")]
    Parse(String),

    /// A value parsed but is outside its domain.
    #[error("Invalid pricing configuration: {0}")]
    Invalid(String),

    /// The tables the values describe are unusable (e.g. incomplete matrix).
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Failed to write the config file.
    #[error("Failed to save config: {0}")]
    SaveFailed(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(err: toml::ser::Error) -> Self {
        ConfigError::SaveFailed(err.to_string())
    }
}

impl From<ValidationError> for ConfigError {
    fn from(err: ValidationError) -> Self {
        ConfigError::Invalid(err.to_string())
    }
}
