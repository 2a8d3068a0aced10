//! # Capability Errors
//!
//! Errors raised by module entry handles and by version parsing. None of
//! these ever escape [`probe`](super::probe): the probe turns every failure
//! into an unavailable capability.
use thiserror::Error;

use crate::tag::TagError;

/// Failure reported by (or while talking to) a module entry point.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EntryError {
    #[error("Module '{module}' does not support operation '{operation}'")]
    UnknownOperation { module: String, operation: String },

    #[error("Module '{module}' rejected arguments for '{operation}': {message}")]
    InvalidArguments { module: String, operation: String, message: String },

    #[error("Module '{module}' failed during '{operation}': {message}")]
    Failed { module: String, operation: String, message: String },

    #[error("Module '{module}' panicked during '{operation}': {message}")]
    Panicked { module: String, operation: String, message: String },

    #[error("Tag codec error crossing module boundary: {0}")]
    Codec(#[from] TagError),
}

/// Error type for version parsing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("Invalid version '{input}': {message}")]
    Invalid { input: String, message: String },

    #[error("Invalid version constraint '{input}': {message}")]
    InvalidConstraint { input: String, message: String },

    #[error("Version bounds are inverted: minimum {min} is above maximum {max}")]
    InvertedBounds { min: String, max: String },
}
