//! # Scheduling Bridge
//!
//! Hides whether the host runs a single global tick thread or a
//! region-parallel scheduler. [`SchedulingBridge`] picks one strategy at
//! construction; callers only ever see [`ExecutionContext`] tokens and
//! [`TaskHandle`] futures.
pub mod bridge;
pub mod context;
pub mod error;
pub mod global;
pub mod region;
pub mod task;

pub use bridge::{SchedulerMode, SchedulingBridge};
pub use context::{BlockPos, ChunkPos, ExecutionContext, RegionKey};
pub use error::SchedulerError;
pub use task::TaskHandle;

#[cfg(test)]
mod tests;
