//! # Adapter Registry
//!
//! One adapter per recognized capability, chosen once from the
//! [`CapabilitySet`](crate::capability::CapabilitySet):
//!
//! - **[`traits`]**: the operation contract of each capability and the
//!   neutral value types it speaks in.
//! - **[`live`]**: adapters over a module entry handle, each pinned to the
//!   module versions and operations it was written against.
//! - **[`absent`]**: the stand-in returning neutral results.
//! - **[`registry`]**: binding, fallback to absent, and degraded-mode records.
pub mod absent;
pub mod error;
pub mod live;
pub mod registry;
pub mod traits;

pub use absent::AbsentAdapter;
pub use error::BindingError;
pub use live::{AdapterPin, LiveItemSource, LivePlaceholderEngine, LiveRegionProtection, LiveWorldStorage};
pub use registry::{AdapterRef, AdapterRegistry, BindingState, DegradedWarning};
pub use traits::{
    ItemDescriptor, ItemSource, PlaceholderEngine, RegionHandle, RegionProtection, SubstitutionContext, WorldStorage,
};

#[cfg(test)]
pub(crate) mod tests;
