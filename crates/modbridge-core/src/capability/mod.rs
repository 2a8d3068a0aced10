//! # Capability Probe
//!
//! Startup discovery of optional extension modules.
//!
//! - **[`known`]**: the recognized capability families ([`CapabilityKind`])
//!   and configured entries ([`KnownCapability`]).
//! - **[`lookup`]**: the [`EntryPointLookup`] seam to whatever loads modules,
//!   with static and chained implementations.
//! - **[`native`]**: a lookup that loads modules from shared libraries.
//! - **[`entry`]**: [`EntryHandle`], the callable binding to one module.
//! - **[`version`]**: lenient module version parsing, configured bounds and
//!   adapter version pins.
//! - **[`probe`]**: runs the lookup for every known capability and produces
//!   the immutable [`CapabilitySet`].
pub mod entry;
pub mod error;
pub mod known;
pub mod lookup;
pub mod native;
pub mod probe;
pub mod set;
pub mod version;

pub use entry::{EntryHandle, ModuleEntry, StaticEntry, DESCRIBE_OPERATION};
pub use error::{EntryError, VersionError};
pub use known::{default_capabilities, CapabilityKind, KnownCapability};
pub use lookup::{ChainedLookup, EntryPointLookup, StaticLookup};
pub use native::NativeLibraryLookup;
pub use probe::probe;
pub use set::{CapabilitySet, CapabilityStatus};
pub use version::{parse_module_version, VersionBounds, VersionRange};

#[cfg(test)]
mod tests;
