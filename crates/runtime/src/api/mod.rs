//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! other layers can stay focused on orchestration and workers.

pub mod errors;
pub mod providers;
pub mod requests;

pub use errors::{ErrorClass, Result, RuntimeError};
pub use providers::{DecisionProvider, DecisionRequest, ProviderError};
pub use requests::{PlayerInit, SideOverrides, StartConfig, StartReceipt, StartRequest};
