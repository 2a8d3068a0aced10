//! # Facade
//!
//! The single stable surface the host talks to. [`Facade`] offers one typed
//! method per capability operation plus [`Facade::submit`], which takes
//! structured [`TagValue`](crate::tag::TagValue) arguments for hosts that
//! dispatch by name. Module-specific types never cross this boundary.
pub mod api;
pub mod dispatch;
pub mod error;

pub use api::Facade;
pub use error::{FacadeError, FacadeResult};
