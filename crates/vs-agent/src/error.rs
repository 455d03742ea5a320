use thiserror::Error;
use vs_core::AgentId;

/// Initialisation faults.  Each one terminates the affected agent only.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("{0} has no navigation adapter")]
    MissingNavigation(AgentId),

    #[error("{0} has no queue coordinator to anchor on")]
    MissingQueue(AgentId),

    #[error("{0} has no spawn anchor")]
    MissingSpawnAnchor(AgentId),
}

pub type AgentResult<T> = Result<T, AgentError>;
