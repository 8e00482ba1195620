//! The solver capability contract.
//!
//! PlanForge consumes metaheuristic search as an external capability: a
//! long-running function that, given a problem and the registered
//! constraint set, incrementally improves an assignment and can be asked
//! to stop. The orchestrator only ever talks to a solver through
//! [`SolverCapability`]; move generation and acceptance criteria are the
//! implementation's business.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;

use planforge_core::PlanningProblem;
use planforge_scoring::ConstraintSet;

/// Cooperative stop request shared between the orchestrator and a solver.
///
/// Cancellation is not preemptive: a solver must reach a checkpoint before
/// honouring the request, so status converges to not-solving
/// asynchronously.
///
/// # Example
///
/// ```
/// use planforge_solver::StopSignal;
///
/// let stop = StopSignal::new();
/// let shared = stop.clone();
///
/// assert!(!shared.is_stop_requested());
/// stop.request_stop();
/// assert!(shared.is_stop_requested());
/// ```
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    flag: Arc<AtomicBool>,
}

impl StopSignal {
    /// Creates a signal with no stop requested.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests the solver to stop at its next checkpoint.
    ///
    /// Thread-safe and idempotent.
    pub fn request_stop(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Returns true once a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// The solver raised an unrecoverable error.
///
/// The orchestrator records this on the owning job as status `FAILED`;
/// other jobs and the process itself are unaffected.
#[derive(Debug, Clone, Error)]
#[error("solver failed: {0}")]
pub struct SolveError(pub String);

impl SolveError {
    /// Creates a solve error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        SolveError(message.into())
    }
}

/// A pluggable, long-running solving function.
///
/// Contract:
/// - `solve` owns its copy of the problem and may mutate entity
///   assignments freely; facts and resources stay untouched.
/// - Progress is reported through `on_improved`; scores may transiently
///   regress while a construction phase places entities one by one. The
///   returned solution is the final, authoritative result.
/// - The stop signal is polled at checkpoints; once observed, the solver
///   returns its current best promptly instead of searching on.
/// - Termination: convergence, an internal time budget, or the stop
///   signal.
pub trait SolverCapability<P: PlanningProblem>: Send + Sync + 'static {
    /// Solves the problem, streaming intermediate solutions to `on_improved`.
    fn solve(
        &self,
        problem: P,
        constraints: Arc<ConstraintSet<P>>,
        stop: StopSignal,
        on_improved: &mut dyn FnMut(P),
    ) -> Result<P, SolveError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_signal_shared_across_clones() {
        let stop = StopSignal::new();
        let other = stop.clone();
        other.request_stop();
        assert!(stop.is_stop_requested());
        // Idempotent
        stop.request_stop();
        assert!(stop.is_stop_requested());
    }
}
