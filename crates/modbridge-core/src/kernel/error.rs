//! # Kernel Errors
//!
//! [`Error`] aggregates the error enums of every subsystem so callers that
//! drive the whole layer (the bootstrap, the CLI) can use one [`Result`].
use std::result::Result as StdResult;

use thiserror::Error as ThisError;

use crate::adapter::BindingError;
use crate::capability::{EntryError, VersionError};
use crate::config::ConfigError;
use crate::facade::FacadeError;
use crate::scheduler::SchedulerError;
use crate::tag::TagError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("Tag codec error: {0}")]
    Tag(#[from] TagError),

    #[error("Module entry error: {0}")]
    Entry(#[from] EntryError),

    #[error("Version error: {0}")]
    Version(#[from] VersionError),

    #[error("Adapter binding error: {0}")]
    Binding(#[from] BindingError),

    #[error("Scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),

    #[error("Facade error: {0}")]
    Facade(#[from] FacadeError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error occurring during a specific kernel lifecycle phase.
    #[error("Kernel lifecycle error during {phase}: {message}")]
    KernelLifecycleError {
        phase: KernelLifecyclePhase,
        message: String,
        #[source]
        source: Option<Box<Error>>,
    },
}

/// Represents a specific phase in the kernel's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
pub enum KernelLifecyclePhase {
    #[error("Probe")]
    Probe,
    #[error("Schedule")]
    Schedule,
}

impl Error {
    pub fn lifecycle(phase: KernelLifecyclePhase, message: impl Into<String>, source: Option<Error>) -> Self {
        Error::KernelLifecycleError { phase, message: message.into(), source: source.map(Box::new) }
    }
}

/// Shorthand for Result with our Error type
pub type Result<T> = StdResult<T, Error>;
