//! # Kernel
//!
//! Wires the subsystems together.
//!
//! - **Bootstrapping**: [`Application::bootstrap`] runs the probe, builds the
//!   adapter registry, starts the scheduling bridge and exposes the facade.
//! - **Constants**: names, the native entry symbol, scheduler defaults.
//! - **Error Handling**: the aggregate [`Error`](error::Error) and a
//!   `Result` alias.
pub mod bootstrap;
pub mod constants;
pub mod error;

pub use bootstrap::{scheduler_mode, Application};
pub use error::{Error, KernelLifecyclePhase, Result};
