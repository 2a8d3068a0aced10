//! # modbridge-core
//!
//! Compatibility layer between a host application and a variable set of
//! optional extension modules. At startup the [`capability`] probe records
//! which modules are present, the [`adapter`] registry binds a live or
//! absent adapter for each capability, and the [`facade`] becomes the only
//! surface the host calls. The [`scheduler`] bridge hides whether the host
//! runs a single tick thread or region-parallel workers, and the [`tag`]
//! codec carries structured data across module boundaries.
pub mod adapter;
pub mod capability;
pub mod config;
pub mod facade;
pub mod kernel;
pub mod scheduler;
pub mod tag;

pub use adapter::{AdapterRegistry, BindingState};
pub use capability::{CapabilityKind, CapabilitySet, EntryPointLookup};
pub use config::CompatConfig;
pub use facade::{Facade, FacadeError};
pub use kernel::error::Error as KernelError;
pub use kernel::Application;
pub use scheduler::{ExecutionContext, SchedulingBridge};
pub use tag::{TagError, TagValue};
