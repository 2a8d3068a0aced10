//! # Facade Errors
//!
//! [`FacadeError`] is everything the host can get back from the facade.
//! There is no "capability unavailable" variant: a missing module answers
//! with neutral results instead.
use thiserror::Error;

use crate::scheduler::SchedulerError;
use crate::tag::TagError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FacadeError {
    #[error("Invalid input for '{operation}': {message}")]
    InvalidInput { operation: String, message: String },

    #[error("Capability '{capability}' has no operation '{operation}'")]
    UnknownOperation { capability: String, operation: String },

    #[error("Scheduling error: {0}")]
    Scheduler(#[from] SchedulerError),

    #[error("Tag error: {0}")]
    Tag(#[from] TagError),
}

impl FacadeError {
    pub(crate) fn invalid(operation: &str, message: impl Into<String>) -> Self {
        FacadeError::InvalidInput { operation: operation.to_string(), message: message.into() }
    }
}

/// Shorthand for Result with FacadeError
pub type FacadeResult<T> = std::result::Result<T, FacadeError>;
