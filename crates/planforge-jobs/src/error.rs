//! Error types for the job layer.

use thiserror::Error;

use planforge_core::ProblemValidationError;

use crate::registry::JobId;

/// Errors surfaced by [`JobOrchestrator`](crate::JobOrchestrator) operations.
///
/// No operation is silently retried; retry policy belongs to the caller.
#[derive(Debug, Clone, Error)]
pub enum OrchestratorError {
    /// The submitted problem is malformed (duplicate entity ids, missing
    /// facts). Rejected at submission, never surfaced mid-solve.
    #[error("invalid problem: {0}")]
    InvalidProblem(String),

    /// No job with this identifier is registered.
    #[error("no job found with id `{0}`")]
    NotFound(JobId),

    /// Worker capacity is exhausted and the overflow policy rejects new
    /// submissions. The caller may retry later.
    #[error("solver capacity exhausted, retry later")]
    Overloaded,

    /// The orchestrator has been shut down and accepts no new work.
    #[error("orchestrator is shut down")]
    Shutdown,
}

impl From<ProblemValidationError> for OrchestratorError {
    fn from(err: ProblemValidationError) -> Self {
        OrchestratorError::InvalidProblem(err.0)
    }
}
