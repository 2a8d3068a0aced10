//! # Scheduling Bridge Errors
//!
//! [`SchedulerError`] covers misuse of execution contexts and the ways a
//! submitted task can end without producing its value.
use thiserror::Error;

use crate::scheduler::context::ExecutionContext;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    /// A region-scoped operation was called from a context that does not own it.
    #[error("Wrong execution context: operation requires {expected} but caller is on {actual}")]
    WrongContext { expected: ExecutionContext, actual: ExecutionContext },

    #[error("Task was cancelled before it started")]
    Cancelled,

    #[error("Task panicked: {message}")]
    Panicked { message: String },

    #[error("Scheduler has shut down")]
    ShutDown,

    #[error("Region shift {shift} exceeds the maximum of {max}")]
    InvalidRegionShift { shift: u32, max: u32 },

    #[error("Failed to start scheduler worker '{name}': {message}")]
    Spawn { name: String, message: String },
}
