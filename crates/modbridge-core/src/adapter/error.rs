//! # Adapter Binding Errors
//!
//! [`BindingError`] is produced while binding a live adapter to a module
//! entry point. The registry never propagates it: a failed binding falls
//! back to the absent adapter and is recorded as a degraded-mode warning.
use thiserror::Error;

use crate::capability::{EntryError, VersionError};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BindingError {
    #[error("Module '{module}' version {found} is outside the supported range {supported}")]
    VersionMismatch { module: String, found: String, supported: String },

    #[error("Module '{module}' does not provide required operation '{operation}'")]
    MissingOperation { module: String, operation: String },

    #[error("Handshake with module '{module}' failed: {source}")]
    Handshake {
        module: String,
        #[source]
        source: EntryError,
    },

    #[error("Adapter version pin is invalid: {0}")]
    InvalidPin(#[from] VersionError),
}
