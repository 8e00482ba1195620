//! Tests for the job orchestrator.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use planforge_core::{HardSoftScore, PlanningProblem, Score};
use planforge_scoring::ConstraintSet;
use planforge_solver::{SolveError, SolverCapability, StopSignal};
use planforge_test::{task::task_constraints, HillClimbSolver, TaskSchedule};

use crate::config::{OrchestratorConfig, OverflowPolicy};
use crate::error::OrchestratorError;
use crate::orchestrator::JobOrchestrator;
use crate::status::JobStatus;

const WAIT: Duration = Duration::from_secs(10);

fn problem() -> TaskSchedule {
    TaskSchedule::new(&[("t1", 2), ("t2", 2), ("t3", 2)], &[("w1", 4), ("w2", 4)])
}

fn orchestrator() -> JobOrchestrator<TaskSchedule> {
    JobOrchestrator::new(
        Arc::new(HillClimbSolver::new(50, 7)),
        Arc::new(task_constraints()),
    )
}

fn slow_orchestrator(config: OrchestratorConfig) -> JobOrchestrator<TaskSchedule> {
    let solver = HillClimbSolver::new(1_000, 7).with_step_delay(Duration::from_millis(5));
    JobOrchestrator::with_config(Arc::new(solver), Arc::new(task_constraints()), config)
}

/// Fails on problems whose first task is named "boom", panics on "bang",
/// otherwise delegates to the reference solver.
struct FlakySolver(HillClimbSolver);

impl SolverCapability<TaskSchedule> for FlakySolver {
    fn solve(
        &self,
        problem: TaskSchedule,
        constraints: Arc<ConstraintSet<TaskSchedule>>,
        stop: StopSignal,
        on_improved: &mut dyn FnMut(TaskSchedule),
    ) -> Result<TaskSchedule, SolveError> {
        match problem.tasks.first().map(|t| t.id.as_str()) {
            Some("boom") => Err(SolveError::new("synthetic failure")),
            Some("bang") => panic!("synthetic panic"),
            _ => self.0.solve(problem, constraints, stop, on_improved),
        }
    }
}

#[test]
fn test_submit_returns_fresh_ids_and_non_terminal_status() {
    let orchestrator = orchestrator();
    let mut seen = HashSet::new();
    for _ in 0..5 {
        let id = orchestrator.submit(problem()).unwrap();
        assert!(seen.insert(id), "job id issued twice");
        assert!(!orchestrator.status(&id).unwrap().is_terminal());
    }
    orchestrator.shutdown();
}

#[test]
fn test_duplicate_entity_ids_are_rejected() {
    let orchestrator = orchestrator();
    let bad = TaskSchedule::new(&[("t1", 1), ("t1", 2)], &[("w1", 4)]);

    let err = orchestrator.submit(bad).unwrap_err();
    assert!(matches!(err, OrchestratorError::InvalidProblem(_)));
    assert!(err.to_string().contains("t1"));
    orchestrator.shutdown();
}

#[test]
fn test_inconsistent_problem_is_rejected() {
    let orchestrator = orchestrator();
    let mut bad = problem();
    bad.queues
        .get_mut(&"w1".into())
        .unwrap()
        .push("ghost-task".into());

    let err = orchestrator.submit(bad).unwrap_err();
    assert!(matches!(err, OrchestratorError::InvalidProblem(_)));
    orchestrator.shutdown();
}

#[test]
fn test_job_terminates_with_solved_result() {
    let orchestrator = orchestrator();
    let id = orchestrator.submit(problem()).unwrap();

    let status = orchestrator.await_terminal(&id, WAIT).unwrap();
    assert_eq!(status, JobStatus::NotSolving);

    let solution = orchestrator.result(&id).unwrap();
    assert!(solution.is_fully_assigned());
    assert!(solution.score().unwrap().is_feasible());
    assert_eq!(orchestrator.error(&id).unwrap(), None);
    orchestrator.shutdown();
}

#[test]
fn test_final_result_lands_despite_transient_regression() {
    // One overloaded worker: the first placement scores 0hard/1soft, the
    // second drops to -1hard/2soft. The terminal snapshot must still be
    // the solver's full final assignment, not the higher-scoring partial.
    let orchestrator = orchestrator();
    let id = orchestrator
        .submit(TaskSchedule::new(&[("t1", 2), ("t2", 2)], &[("w1", 3)]))
        .unwrap();

    let status = orchestrator.await_terminal(&id, WAIT).unwrap();
    assert_eq!(status, JobStatus::NotSolving);

    let solution = orchestrator.result(&id).unwrap();
    assert!(solution.is_fully_assigned());
    assert_eq!(solution.score(), Some(HardSoftScore::of(-1, 2)));
    orchestrator.shutdown();
}

#[test]
fn test_polled_scores_never_regress() {
    let orchestrator = slow_orchestrator(OrchestratorConfig::default());
    let id = orchestrator.submit(problem()).unwrap();

    let mut observed = Vec::new();
    while !orchestrator.status(&id).unwrap().is_terminal() {
        if let Some(score) = orchestrator.result(&id).unwrap().score() {
            observed.push(score);
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    observed.push(orchestrator.result(&id).unwrap().score().unwrap());

    assert!(observed.windows(2).all(|w| w[0] <= w[1]));
    orchestrator.shutdown();
}

#[test]
fn test_unknown_job_id_is_not_found() {
    let orchestrator = orchestrator();
    let id = orchestrator.submit(problem()).unwrap();
    orchestrator.await_terminal(&id, WAIT).unwrap();
    orchestrator.shutdown();

    let ghost = crate::registry::JobId::random();
    assert!(matches!(
        orchestrator.status(&ghost),
        Err(OrchestratorError::NotFound(_))
    ));
    assert!(matches!(
        orchestrator.result(&ghost),
        Err(OrchestratorError::NotFound(_))
    ));
    assert!(matches!(
        orchestrator.cancel(&ghost),
        Err(OrchestratorError::NotFound(_))
    ));
}

#[test]
fn test_cancel_is_idempotent_and_preserves_the_result() {
    let orchestrator = slow_orchestrator(OrchestratorConfig::default());
    let id = orchestrator.submit(problem()).unwrap();

    orchestrator.cancel(&id).unwrap();
    let status = orchestrator.await_terminal(&id, WAIT).unwrap();
    assert_eq!(status, JobStatus::NotSolving);

    let frozen = orchestrator.result(&id).unwrap();
    orchestrator.cancel(&id).unwrap(); // terminal: no-op, no error
    orchestrator.cancel(&id).unwrap();
    let after = orchestrator.result(&id).unwrap();
    assert_eq!(frozen.queues, after.queues);
    assert_eq!(frozen.score(), after.score());
    orchestrator.shutdown();
}

#[test]
fn test_reject_policy_surfaces_overloaded() {
    let config = OrchestratorConfig {
        max_active_jobs: 1,
        overflow: OverflowPolicy::Reject,
        max_completed_jobs: None,
    };
    let orchestrator = slow_orchestrator(config);

    let first = orchestrator.submit(problem()).unwrap();
    let err = orchestrator.submit(problem()).unwrap_err();
    assert!(matches!(err, OrchestratorError::Overloaded));

    orchestrator.cancel(&first).unwrap();
    orchestrator.await_terminal(&first, WAIT).unwrap();
    orchestrator.shutdown();
}

#[test]
fn test_queue_policy_runs_jobs_in_turn() {
    let config = OrchestratorConfig {
        max_active_jobs: 1,
        overflow: OverflowPolicy::Queue,
        max_completed_jobs: None,
    };
    let orchestrator = JobOrchestrator::with_config(
        Arc::new(HillClimbSolver::new(20, 7)),
        Arc::new(task_constraints()),
        config,
    );

    let first = orchestrator.submit(problem()).unwrap();
    let second = orchestrator.submit(problem()).unwrap();

    assert_eq!(
        orchestrator.await_terminal(&first, WAIT).unwrap(),
        JobStatus::NotSolving
    );
    assert_eq!(
        orchestrator.await_terminal(&second, WAIT).unwrap(),
        JobStatus::NotSolving
    );
    assert!(orchestrator.result(&second).unwrap().is_fully_assigned());
    orchestrator.shutdown();
}

#[test]
fn test_cancel_pending_job_skips_solving() {
    let config = OrchestratorConfig {
        max_active_jobs: 1,
        overflow: OverflowPolicy::Queue,
        max_completed_jobs: None,
    };
    let orchestrator = slow_orchestrator(config);

    let running = orchestrator.submit(problem()).unwrap();
    let queued = orchestrator.submit(problem()).unwrap();
    assert_eq!(orchestrator.pending_jobs(), 1);

    orchestrator.cancel(&queued).unwrap();
    assert_eq!(orchestrator.status(&queued).unwrap(), JobStatus::NotSolving);
    // Never solved: the snapshot is still the submitted problem
    assert!(!orchestrator.result(&queued).unwrap().is_fully_assigned());

    orchestrator.cancel(&running).unwrap();
    orchestrator.await_terminal(&running, WAIT).unwrap();
    orchestrator.shutdown();
}

#[test]
fn test_solver_failure_is_isolated_to_its_job() {
    let orchestrator = JobOrchestrator::new(
        Arc::new(FlakySolver(HillClimbSolver::new(50, 7))),
        Arc::new(task_constraints()),
    );

    let failing = orchestrator
        .submit(TaskSchedule::new(&[("boom", 1)], &[("w1", 4)]))
        .unwrap();
    let healthy = orchestrator.submit(problem()).unwrap();

    assert_eq!(
        orchestrator.await_terminal(&failing, WAIT).unwrap(),
        JobStatus::Failed
    );
    let message = orchestrator.error(&failing).unwrap().unwrap();
    assert!(message.contains("synthetic failure"));

    assert_eq!(
        orchestrator.await_terminal(&healthy, WAIT).unwrap(),
        JobStatus::NotSolving
    );
    assert!(orchestrator.result(&healthy).unwrap().is_fully_assigned());
    orchestrator.shutdown();
}

#[test]
fn test_solver_panic_is_recorded_as_failed() {
    let orchestrator = JobOrchestrator::new(
        Arc::new(FlakySolver(HillClimbSolver::new(50, 7))),
        Arc::new(task_constraints()),
    );

    let id = orchestrator
        .submit(TaskSchedule::new(&[("bang", 1)], &[("w1", 4)]))
        .unwrap();
    assert_eq!(
        orchestrator.await_terminal(&id, WAIT).unwrap(),
        JobStatus::Failed
    );
    assert!(orchestrator
        .error(&id)
        .unwrap()
        .unwrap()
        .contains("synthetic panic"));
    orchestrator.shutdown();
}

#[test]
fn test_shutdown_refuses_new_work() {
    let orchestrator = slow_orchestrator(OrchestratorConfig::default());
    let id = orchestrator.submit(problem()).unwrap();
    orchestrator.shutdown();

    assert!(orchestrator.status(&id).unwrap().is_terminal());
    assert!(matches!(
        orchestrator.submit(problem()),
        Err(OrchestratorError::Shutdown)
    ));
}

#[test]
fn test_completed_jobs_are_evicted_oldest_first() {
    let config = OrchestratorConfig {
        max_active_jobs: 1,
        overflow: OverflowPolicy::Queue,
        max_completed_jobs: Some(1),
    };
    let orchestrator = JobOrchestrator::with_config(
        Arc::new(HillClimbSolver::new(10, 7)),
        Arc::new(task_constraints()),
        config,
    );

    let first = orchestrator.submit(problem()).unwrap();
    orchestrator.await_terminal(&first, WAIT).unwrap();
    std::thread::sleep(Duration::from_millis(2));
    let second = orchestrator.submit(problem()).unwrap();
    orchestrator.await_terminal(&second, WAIT).unwrap();

    // Submitting a third evicts the oldest completed job
    let third = orchestrator.submit(problem()).unwrap();
    assert!(matches!(
        orchestrator.status(&first),
        Err(OrchestratorError::NotFound(_))
    ));
    assert!(orchestrator.status(&second).is_ok());

    orchestrator.await_terminal(&third, WAIT).unwrap();
    orchestrator.shutdown();
}
