//! A small reference solver for tests and demos.
//!
//! Greedy best-fit construction followed by first-improvement relocation
//! moves with a seeded RNG. Not the product solver - just enough search to
//! exercise the orchestration layer deterministically.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use planforge_core::{AssignmentDomain, EntityId, ResourceId, Score};
use planforge_scoring::{ConstraintEvaluationError, ConstraintSet};
use planforge_solver::{SolveError, SolverCapability, StopSignal};

/// Reference implementation of the solver capability.
///
/// Checks the stop signal before every candidate evaluation, so
/// cancellation is honoured within one move's worth of work.
#[derive(Debug, Clone)]
pub struct HillClimbSolver {
    /// Number of relocation attempts after construction.
    pub steps: usize,
    /// RNG seed; equal seeds give equal runs.
    pub seed: u64,
    /// Optional artificial delay per step, for tests that must observe a
    /// job mid-solve.
    pub step_delay: Option<Duration>,
}

impl Default for HillClimbSolver {
    fn default() -> Self {
        Self {
            steps: 200,
            seed: 0,
            step_delay: None,
        }
    }
}

impl HillClimbSolver {
    /// A solver doing `steps` relocation attempts with the given seed.
    pub fn new(steps: usize, seed: u64) -> Self {
        Self {
            steps,
            seed,
            step_delay: None,
        }
    }

    /// Adds an artificial per-step delay.
    pub fn with_step_delay(mut self, delay: Duration) -> Self {
        self.step_delay = Some(delay);
        self
    }
}

fn eval_err(err: ConstraintEvaluationError) -> SolveError {
    SolveError::new(err.to_string())
}

fn best_placement<P: AssignmentDomain>(
    problem: &P,
    entity: &EntityId,
    constraints: &ConstraintSet<P>,
) -> Result<Option<(ResourceId, usize, P::Score)>, SolveError> {
    let mut best: Option<(ResourceId, usize, P::Score)> = None;
    for resource in problem.eligible_resources(entity) {
        for position in 0..problem.insertion_positions(&resource) {
            let mut candidate = problem.clone();
            candidate
                .assign(entity, &resource, position)
                .map_err(|e| SolveError::new(e.to_string()))?;
            let score = constraints.evaluate(&candidate).map_err(eval_err)?;
            let better = match &best {
                Some((_, _, current)) => score > *current,
                None => true,
            };
            if better {
                best = Some((resource.clone(), position, score));
            }
        }
    }
    Ok(best)
}

impl<P: AssignmentDomain> SolverCapability<P> for HillClimbSolver {
    fn solve(
        &self,
        mut problem: P,
        constraints: Arc<ConstraintSet<P>>,
        stop: StopSignal,
        on_improved: &mut dyn FnMut(P),
    ) -> Result<P, SolveError> {
        // Construction: place every unassigned entity at its best slot.
        for entity in problem.entity_ids() {
            if stop.is_stop_requested() {
                return Ok(problem);
            }
            if problem.is_assigned(&entity) {
                continue;
            }
            if let Some((resource, position, score)) =
                best_placement(&problem, &entity, &constraints)?
            {
                problem
                    .assign(&entity, &resource, position)
                    .map_err(|e| SolveError::new(e.to_string()))?;
                problem.set_score(Some(score));
                on_improved(problem.clone());
            }
        }
        if problem.score().is_none() {
            let score = constraints.evaluate(&problem).map_err(eval_err)?;
            problem.set_score(Some(score));
            on_improved(problem.clone());
        }

        // Improvement: random relocations, first-improvement acceptance.
        let mut rng = StdRng::seed_from_u64(self.seed);
        let entities = problem.entity_ids();
        for _ in 0..self.steps {
            if stop.is_stop_requested() {
                break;
            }
            if let Some(delay) = self.step_delay {
                std::thread::sleep(delay);
            }
            if entities.is_empty() {
                break;
            }
            let entity = entities[rng.random_range(0..entities.len())].clone();
            if !problem.is_assigned(&entity) {
                continue;
            }
            let mut candidate = problem.clone();
            candidate
                .unassign(&entity)
                .map_err(|e| SolveError::new(e.to_string()))?;
            let resources = candidate.eligible_resources(&entity);
            if resources.is_empty() {
                continue;
            }
            let resource = resources[rng.random_range(0..resources.len())].clone();
            let slots = candidate.insertion_positions(&resource);
            if slots == 0 {
                continue;
            }
            let position = rng.random_range(0..slots);
            if candidate.assign(&entity, &resource, position).is_err() {
                continue;
            }
            let score = constraints.evaluate(&candidate).map_err(eval_err)?;
            let improved = match problem.score() {
                Some(current) => score.is_better_than(&current),
                None => true,
            };
            if improved {
                candidate.set_score(Some(score));
                problem = candidate;
                on_improved(problem.clone());
            }
        }
        Ok(problem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{task_constraints, TaskSchedule};
    use planforge_core::{HardSoftScore, PlanningProblem};

    #[test]
    fn test_construction_assigns_everything_feasibly() {
        let problem = TaskSchedule::new(
            &[("t1", 2), ("t2", 2), ("t3", 2)],
            &[("w1", 4), ("w2", 4)],
        );
        let constraints = Arc::new(task_constraints());
        let solver = HillClimbSolver::new(50, 17);

        let mut improvements = Vec::new();
        let solved = solver
            .solve(problem, constraints, StopSignal::new(), &mut |p| {
                improvements.push(p.score().unwrap())
            })
            .unwrap();

        assert!(solved.is_fully_assigned());
        assert_eq!(solved.score().unwrap(), HardSoftScore::of(0, 3));
        assert!(!improvements.is_empty());
        // Improving stream never regresses
        assert!(improvements.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_stop_signal_short_circuits() {
        let problem = TaskSchedule::new(&[("t1", 1)], &[("w1", 1)]);
        let constraints = Arc::new(task_constraints());
        let stop = StopSignal::new();
        stop.request_stop();

        let solved = HillClimbSolver::new(1_000_000, 0)
            .solve(problem, constraints, stop, &mut |_| {})
            .unwrap();
        // Stopped before construction touched anything.
        assert!(!solved.is_fully_assigned());
    }

    #[test]
    fn test_same_seed_same_result() {
        let build = || TaskSchedule::new(&[("a", 3), ("b", 1), ("c", 2)], &[("w1", 3), ("w2", 3)]);
        let constraints = Arc::new(task_constraints());

        let s1 = HillClimbSolver::new(100, 42)
            .solve(build(), constraints.clone(), StopSignal::new(), &mut |_| {})
            .unwrap();
        let s2 = HillClimbSolver::new(100, 42)
            .solve(build(), constraints, StopSignal::new(), &mut |_| {})
            .unwrap();
        assert_eq!(s1.queues, s2.queues);
        assert_eq!(s1.score(), s2.score());
    }
}
