//! # Configuration Errors
//!
//! [`ConfigError`] covers reading, parsing and validating a
//! [`CompatConfig`](super::CompatConfig).
use std::path::PathBuf;

use thiserror::Error;

use crate::capability::VersionError;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown or unsupported config format for path: {path}")]
    UnsupportedFormat { path: PathBuf },

    #[error("Failed to parse {format} config: {message}")]
    Parse { format: &'static str, message: String },

    #[error("Failed to serialize config to {format}: {message}")]
    Serialize { format: &'static str, message: String },

    #[error("Invalid version bounds for capability '{capability}': {source}")]
    InvalidVersion {
        capability: String,
        #[source]
        source: VersionError,
    },

    #[error("Capability '{id}' is configured more than once")]
    DuplicateCapability { id: String },

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },
}

/// Shorthand for Result with ConfigError
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
