//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `VsError` where a core
//! failure can surface through them.

use thiserror::Error;

use crate::AgentId;

/// The top-level error type for `vs-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum VsError {
    #[error("agent {0} not found")]
    AgentNotFound(AgentId),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for all `vs-*` crates.
pub type VsResult<T> = Result<T, VsError>;
