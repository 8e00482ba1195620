//! Read-only score analysis over arbitrary problems.

use std::sync::Arc;

use tracing::debug;

use planforge_core::PlanningProblem;

use crate::analysis::{FetchPolicy, ScoreAnalysis};
use crate::set::{ConstraintEvaluationError, ConstraintSet};

/// Wraps a [`ConstraintSet`] to explain scores.
///
/// The analyzer is a pure function over the given problem: it recomputes
/// the score from scratch, never mutates its input, and the problem does
/// not need to be registered as a job.
pub struct ScoreAnalyzer<P: PlanningProblem> {
    constraints: Arc<ConstraintSet<P>>,
}

impl<P: PlanningProblem> Clone for ScoreAnalyzer<P> {
    fn clone(&self) -> Self {
        Self {
            constraints: Arc::clone(&self.constraints),
        }
    }
}

impl<P: PlanningProblem> ScoreAnalyzer<P> {
    /// Creates an analyzer over the given constraint set.
    pub fn new(constraints: Arc<ConstraintSet<P>>) -> Self {
        Self { constraints }
    }

    /// Returns the aggregate score of the problem.
    pub fn score(&self, problem: &P) -> Result<P::Score, ConstraintEvaluationError> {
        self.constraints.evaluate(problem)
    }

    /// Produces the per-constraint score breakdown.
    ///
    /// With [`FetchPolicy::Full`] every constraint match is collected; with
    /// [`FetchPolicy::Shallow`] only aggregates and match counts are
    /// reported.
    pub fn analyze(
        &self,
        problem: &P,
        policy: FetchPolicy,
    ) -> Result<ScoreAnalysis<P::Score>, ConstraintEvaluationError> {
        let analysis = self.constraints.analyze(problem, policy)?;
        debug!(
            score = %analysis.score,
            constraints = analysis.constraints.len(),
            matches = analysis.total_match_count(),
            ?policy,
            "score analysis computed"
        );
        Ok(analysis)
    }
}
