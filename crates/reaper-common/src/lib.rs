//! # Reaper Common
//!
//! Shared types and errors for the Pod Reaper rule engine.
//!
//! ## Core Types
//!
//! - [`Pod`]: Read-only pod descriptor (name, namespace, annotations)
//! - [`Decision`]: A single rule's vote on one pod
//! - [`Verdict`]: Aggregated outcome for one pod across all loaded rules
//!
//! ## Errors
//!
//! - [`ReaperError`]: Unified error type
//! - [`RuleError`]: Rule loading failures

pub mod error;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{ReaperError, Result, RuleError};
pub use types::{
    decision::{Decision, Verdict},
    pod::Pod,
};

/// Reaper version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment key holding the shared explicit load list
pub const ENV_EXPLICIT_LOAD: &str = "EXPLICIT_LOAD";
