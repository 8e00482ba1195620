//! Constraint definitions and the registered constraint set.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use planforge_core::score::Score;
use planforge_core::{ConstraintRef, ImpactType, PlanningProblem};

use crate::analysis::{
    ConstraintAnalysis, ConstraintJustification, ConstraintMatch, FetchPolicy, ScoreAnalysis,
};

/// A constraint matcher reported a failure for the given problem.
///
/// Raised by matcher functions themselves, e.g. on a malformed fact
/// reference. Indicates a data or constraint-definition bug; never retried.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct ConstraintFailure(pub String);

impl ConstraintFailure {
    /// Creates a failure with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        ConstraintFailure(message.into())
    }
}

/// Evaluation of a constraint set failed.
#[derive(Debug, Clone, Error)]
#[error("constraint `{constraint}` failed to evaluate: {message}")]
pub struct ConstraintEvaluationError {
    /// Fully qualified name of the failing constraint.
    pub constraint: String,
    /// What the matcher reported.
    pub message: String,
}

/// One place where a constraint matches, as reported by a matcher function.
///
/// The quantity is the match weight multiplier: a capacity constraint
/// overloaded by 3 units reports one hit with quantity 3 rather than three
/// separate hits.
#[derive(Debug, Clone)]
pub struct ConstraintHit {
    /// Which entities/facts are involved and why.
    pub justification: ConstraintJustification,
    /// Match weight multiplier, usually 1.
    pub quantity: i64,
}

impl ConstraintHit {
    /// A hit with quantity 1.
    pub fn new(justification: ConstraintJustification) -> Self {
        Self {
            justification,
            quantity: 1,
        }
    }

    /// A hit with an explicit quantity.
    pub fn weighted(justification: ConstraintJustification, quantity: i64) -> Self {
        Self {
            justification,
            quantity,
        }
    }
}

type Matcher<P> =
    Arc<dyn Fn(&P) -> Result<Vec<ConstraintHit>, ConstraintFailure> + Send + Sync>;

/// One registered constraint: identity, weight, impact direction and a pure
/// matcher function over the problem.
///
/// # Example
///
/// ```
/// use planforge_core::{HardSoftScore, PlanningProblem};
/// use planforge_scoring::{Constraint, ConstraintHit, ConstraintJustification};
/// # use planforge_core::EntityId;
/// # #[derive(Clone)]
/// # struct P;
/// # impl PlanningProblem for P {
/// #     type Score = HardSoftScore;
/// #     fn score(&self) -> Option<HardSoftScore> { None }
/// #     fn set_score(&mut self, _: Option<HardSoftScore>) {}
/// #     fn entity_ids(&self) -> Vec<EntityId> { vec![] }
/// #     fn is_assigned(&self, _: &EntityId) -> bool { true }
/// # }
///
/// let no_overlap: Constraint<P> =
///     Constraint::penalize("NoOverlap", HardSoftScore::ONE_HARD, |_problem| {
///         Ok(vec![])  // matcher finds overlapping pairs here
///     });
/// ```
pub struct Constraint<P: PlanningProblem> {
    constraint_ref: ConstraintRef,
    weight: P::Score,
    impact: ImpactType,
    matcher: Matcher<P>,
}

impl<P: PlanningProblem> Clone for Constraint<P> {
    fn clone(&self) -> Self {
        Self {
            constraint_ref: self.constraint_ref.clone(),
            weight: self.weight,
            impact: self.impact,
            matcher: Arc::clone(&self.matcher),
        }
    }
}

impl<P: PlanningProblem> fmt::Debug for Constraint<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constraint")
            .field("constraint_ref", &self.constraint_ref)
            .field("weight", &self.weight)
            .field("impact", &self.impact)
            .finish()
    }
}

impl<P: PlanningProblem> Constraint<P> {
    /// Creates a constraint with an explicit reference and impact type.
    pub fn new<F>(
        constraint_ref: ConstraintRef,
        impact: ImpactType,
        weight: P::Score,
        matcher: F,
    ) -> Self
    where
        F: Fn(&P) -> Result<Vec<ConstraintHit>, ConstraintFailure> + Send + Sync + 'static,
    {
        Self {
            constraint_ref,
            weight,
            impact,
            matcher: Arc::new(matcher),
        }
    }

    /// Creates a penalizing constraint (each hit subtracts the weight).
    pub fn penalize<F>(name: impl Into<String>, weight: P::Score, matcher: F) -> Self
    where
        F: Fn(&P) -> Result<Vec<ConstraintHit>, ConstraintFailure> + Send + Sync + 'static,
    {
        Self::new(
            ConstraintRef::new("", name),
            ImpactType::Penalty,
            weight,
            matcher,
        )
    }

    /// Creates a rewarding constraint (each hit adds the weight).
    pub fn reward<F>(name: impl Into<String>, weight: P::Score, matcher: F) -> Self
    where
        F: Fn(&P) -> Result<Vec<ConstraintHit>, ConstraintFailure> + Send + Sync + 'static,
    {
        Self::new(
            ConstraintRef::new("", name),
            ImpactType::Reward,
            weight,
            matcher,
        )
    }

    /// Returns the constraint reference.
    pub fn constraint_ref(&self) -> &ConstraintRef {
        &self.constraint_ref
    }

    /// Returns the signed weight: negative for penalties, positive for rewards.
    pub fn signed_weight(&self) -> P::Score {
        match self.impact {
            ImpactType::Penalty => -self.weight,
            ImpactType::Reward => self.weight,
        }
    }

    fn run_matcher(&self, problem: &P) -> Result<Vec<ConstraintHit>, ConstraintEvaluationError> {
        (self.matcher)(problem).map_err(|failure| ConstraintEvaluationError {
            constraint: self.constraint_ref.full_name(),
            message: failure.0,
        })
    }

    /// Evaluates this constraint, returning its analysis under the policy.
    pub fn analyze(
        &self,
        problem: &P,
        policy: FetchPolicy,
    ) -> Result<ConstraintAnalysis<P::Score>, ConstraintEvaluationError> {
        let hits = self.run_matcher(problem)?;
        let signed = self.signed_weight();

        let mut total = P::Score::zero();
        let mut matches = match policy {
            FetchPolicy::Full => Some(Vec::with_capacity(hits.len())),
            FetchPolicy::Shallow => None,
        };
        let match_count = hits.len();
        for hit in hits {
            let impact = signed.scale(hit.quantity);
            total = total + impact;
            if let Some(matches) = matches.as_mut() {
                matches.push(ConstraintMatch::new(
                    self.constraint_ref.clone(),
                    impact,
                    hit.justification,
                ));
            }
        }

        Ok(ConstraintAnalysis {
            constraint_ref: self.constraint_ref.clone(),
            weight: signed,
            score: total,
            match_count,
            matches,
        })
    }
}

/// The registered constraint capability of one vertical.
///
/// Constraints are independent and composable; evaluation simply aggregates
/// their contributions in registration order.
pub struct ConstraintSet<P: PlanningProblem> {
    constraints: Vec<Constraint<P>>,
}

impl<P: PlanningProblem> Default for ConstraintSet<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: PlanningProblem> fmt::Debug for ConstraintSet<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstraintSet")
            .field("constraints", &self.constraints)
            .finish()
    }
}

impl<P: PlanningProblem> ConstraintSet<P> {
    /// Creates an empty constraint set.
    pub fn new() -> Self {
        Self {
            constraints: Vec::new(),
        }
    }

    /// Registers a constraint, builder-style.
    pub fn with(mut self, constraint: Constraint<P>) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Returns the number of registered constraints.
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    /// Returns true if no constraints are registered.
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Iterates over the registered constraints.
    pub fn iter(&self) -> impl Iterator<Item = &Constraint<P>> {
        self.constraints.iter()
    }

    /// Computes the aggregate score of the problem.
    ///
    /// This is the shallow inner-loop path: no match enumeration, just the
    /// per-constraint totals summed up.
    pub fn evaluate(&self, problem: &P) -> Result<P::Score, ConstraintEvaluationError> {
        let mut total = P::Score::zero();
        for constraint in &self.constraints {
            total = total + constraint.analyze(problem, FetchPolicy::Shallow)?.score;
        }
        Ok(total)
    }

    /// Produces the per-constraint breakdown under the given fetch policy.
    pub fn analyze(
        &self,
        problem: &P,
        policy: FetchPolicy,
    ) -> Result<ScoreAnalysis<P::Score>, ConstraintEvaluationError> {
        let mut constraints = Vec::with_capacity(self.constraints.len());
        let mut total = P::Score::zero();
        for constraint in &self.constraints {
            let analysis = constraint.analyze(problem, policy)?;
            total = total + analysis.score;
            constraints.push(analysis);
        }
        Ok(ScoreAnalysis {
            score: total,
            constraints,
        })
    }
}
