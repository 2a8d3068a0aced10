//! # Configuration
//!
//! [`CompatConfig`] selects the scheduling strategy and lists the
//! capabilities to probe for, each with the module id that provides it and
//! optional version bounds. Files are JSON, YAML or TOML; the format is
//! picked from the extension by [`ConfigFormat`].
pub mod error;
pub mod format;
pub mod settings;

pub use error::{ConfigError, ConfigResult};
pub use format::ConfigFormat;
pub use settings::{CapabilityEntry, CompatConfig, SchedulerModeSetting, SchedulerSettings};
