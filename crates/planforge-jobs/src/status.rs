//! Job lifecycle status.

/// Status of a solving job.
///
/// Lifecycle: `Scheduled` at submission, `Solving` once the background
/// task starts, then exactly one terminal status - `NotSolving` on
/// convergence/timeout/stop, or `Failed` when the solver raised an
/// unrecoverable error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    /// Accepted, waiting for a worker slot.
    Scheduled,
    /// Actively solving.
    Solving,
    /// Terminated normally (converged, timed out or stopped).
    NotSolving,
    /// The solver raised an unrecoverable error.
    Failed,
}

impl JobStatus {
    /// Returns the status as a string.
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Scheduled => "SCHEDULED",
            JobStatus::Solving => "SOLVING",
            JobStatus::NotSolving => "NOT_SOLVING",
            JobStatus::Failed => "FAILED",
        }
    }

    /// Returns true once the job can no longer change.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::NotSolving | JobStatus::Failed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
