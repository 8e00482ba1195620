//! What-if placement recommendations.
//!
//! Given an already-solved problem plus one new, unassigned entity, the
//! [`Recommender`] scores every legal placement of that entity and returns
//! them ranked, best first. The tried placements never touch the caller's
//! problem; each candidate is evaluated on its own copy, in parallel.
//!
//! This answers the operational question "a new task just arrived, where
//! does it hurt least?" without re-running a full solve.

use std::cmp::Ordering;
use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use planforge_core::{AssignmentDomain, AssignmentError, EntityId, ResourceId, Score};
use planforge_scoring::{ConstraintEvaluationError, ConstraintSet};

/// Error raised while producing or applying recommendations.
#[derive(Debug, Error)]
pub enum RecommendError {
    /// The requested entity is not part of the problem.
    #[error("unknown entity `{0}`")]
    UnknownEntity(EntityId),
    /// Recommendations need a solved base: exactly the requested entity
    /// unassigned, every other entity placed.
    #[error("problem is not in a recommendable state: {0}")]
    ProblemNotSolved(String),
    /// The recommendation no longer fits the problem it is applied to.
    #[error("recommendation cannot be applied: {0}")]
    InvalidRecommendation(#[from] AssignmentError),
    /// A constraint matcher failed during candidate evaluation.
    #[error(transparent)]
    Constraint(#[from] ConstraintEvaluationError),
}

/// One ranked placement proposal for a single entity.
///
/// `score` is the overall score the whole problem would have after the
/// placement, not the delta; callers comparing against the current score
/// can compute the difference themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation<Sc> {
    /// The resource to assign the entity to.
    pub resource: ResourceId,
    /// The insertion position within the resource.
    pub position: usize,
    /// The resulting problem score.
    pub score: Sc,
}

/// Evaluates every legal placement of one entity and ranks the outcomes.
///
/// Shares the constraint set with the rest of the system; recommendations
/// are therefore judged by exactly the rules solving used.
pub struct Recommender<P: AssignmentDomain> {
    constraints: Arc<ConstraintSet<P>>,
}

impl<P: AssignmentDomain> Recommender<P> {
    /// Creates a recommender over the given constraint set.
    pub fn new(constraints: Arc<ConstraintSet<P>>) -> Self {
        Recommender { constraints }
    }

    /// Ranks every legal placement of `entity`, best score first.
    ///
    /// The problem must have every entity except `entity` assigned. Each
    /// pair of an eligible resource and one of its insertion positions is
    /// tried exactly once, on a private copy of the problem. Ties are
    /// broken by resource id, then by position, so the ranking is fully
    /// deterministic.
    pub fn recommend(
        &self,
        problem: &P,
        entity: &EntityId,
    ) -> Result<Vec<Recommendation<P::Score>>, RecommendError> {
        self.check_base(problem, entity)?;

        let mut candidates = Vec::new();
        for resource in problem.eligible_resources(entity) {
            for position in 0..problem.insertion_positions(&resource) {
                candidates.push((resource.clone(), position));
            }
        }
        debug!(entity = %entity, candidates = candidates.len(), "ranking placements");

        let mut ranked = candidates
            .into_par_iter()
            .map(|(resource, position)| {
                let mut trial = problem.clone();
                trial.assign(entity, &resource, position)?;
                let score = self.constraints.evaluate(&trial)?;
                Ok(Recommendation {
                    resource,
                    position,
                    score,
                })
            })
            .collect::<Result<Vec<_>, RecommendError>>()?;

        ranked.sort_by(|a, b| match b.score.compare(&a.score) {
            Ordering::Equal => a
                .resource
                .cmp(&b.resource)
                .then(a.position.cmp(&b.position)),
            order => order,
        });
        Ok(ranked)
    }

    /// Applies one recommendation to a copy of the problem.
    ///
    /// Re-evaluates and stores the score, so the returned problem is
    /// immediately consistent. The input problem is left untouched.
    pub fn apply(
        &self,
        problem: &P,
        entity: &EntityId,
        recommendation: &Recommendation<P::Score>,
    ) -> Result<P, RecommendError> {
        let mut applied = problem.clone();
        applied.assign(entity, &recommendation.resource, recommendation.position)?;
        let score = self.constraints.evaluate(&applied)?;
        applied.set_score(Some(score));
        Ok(applied)
    }

    fn check_base(&self, problem: &P, entity: &EntityId) -> Result<(), RecommendError> {
        let ids = problem.entity_ids();
        if !ids.contains(entity) {
            return Err(RecommendError::UnknownEntity(entity.clone()));
        }
        if problem.is_assigned(entity) {
            return Err(RecommendError::ProblemNotSolved(format!(
                "entity `{entity}` is already assigned"
            )));
        }
        if let Some(unplaced) = ids.iter().find(|id| *id != entity && !problem.is_assigned(id)) {
            return Err(RecommendError::ProblemNotSolved(format!(
                "entity `{unplaced}` is still unassigned"
            )));
        }
        Ok(())
    }
}

impl<P: AssignmentDomain> Clone for Recommender<P> {
    fn clone(&self) -> Self {
        Recommender {
            constraints: Arc::clone(&self.constraints),
        }
    }
}
