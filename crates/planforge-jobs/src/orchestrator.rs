//! Job orchestration: submission, lifecycle transitions, cancellation.

use std::collections::{HashMap, HashSet, VecDeque};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::{debug, info, warn};

use planforge_core::PlanningProblem;
use planforge_scoring::ConstraintSet;
use planforge_solver::SolverCapability;

use crate::config::{OrchestratorConfig, OverflowPolicy};
use crate::error::OrchestratorError;
use crate::registry::{JobId, JobRegistry};
use crate::status::JobStatus;

/// Accepts planning problems and manages their background solving tasks.
///
/// One background task per job, many jobs concurrently, bounded by
/// [`OrchestratorConfig::max_active_jobs`]. The orchestrator is a
/// cheap-clone handle; clones share the same registry and scheduler.
///
/// `submit` never blocks on solving, `status`/`result` are non-blocking
/// snapshot reads, and `cancel` is cooperative: it returns immediately and
/// the job converges to `NOT_SOLVING` once the solver acknowledges.
///
/// # Example
///
/// ```ignore
/// let orchestrator = JobOrchestrator::new(solver, constraints);
/// let job_id = orchestrator.submit(problem)?;
/// while !orchestrator.status(&job_id)?.is_terminal() {
///     let best_so_far = orchestrator.result(&job_id)?;
///     // render best_so_far ...
/// }
/// orchestrator.shutdown();
/// ```
pub struct JobOrchestrator<P: PlanningProblem> {
    inner: Arc<Inner<P>>,
}

impl<P: PlanningProblem> Clone for JobOrchestrator<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct Inner<P: PlanningProblem> {
    registry: JobRegistry<P>,
    solver: Arc<dyn SolverCapability<P>>,
    constraints: Arc<ConstraintSet<P>>,
    config: OrchestratorConfig,
    scheduler: Mutex<Scheduler>,
}

/// Worker bookkeeping. Lock ordering: scheduler before any registry or
/// job-cell lock, never the other way around.
struct Scheduler {
    active: usize,
    pending: VecDeque<JobId>,
    workers: HashMap<JobId, JoinHandle<()>>,
    shutting_down: bool,
}

impl<P: PlanningProblem> JobOrchestrator<P> {
    /// Creates an orchestrator with the default configuration.
    pub fn new(solver: Arc<dyn SolverCapability<P>>, constraints: Arc<ConstraintSet<P>>) -> Self {
        Self::with_config(solver, constraints, OrchestratorConfig::default())
    }

    /// Creates an orchestrator with an explicit configuration.
    pub fn with_config(
        solver: Arc<dyn SolverCapability<P>>,
        constraints: Arc<ConstraintSet<P>>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                registry: JobRegistry::new(),
                solver,
                constraints,
                config,
                scheduler: Mutex::new(Scheduler {
                    active: 0,
                    pending: VecDeque::new(),
                    workers: HashMap::new(),
                    shutting_down: false,
                }),
            }),
        }
    }

    /// Submits a problem for background solving and returns its job id.
    ///
    /// Validates entity-id uniqueness and the domain's own consistency
    /// check, stores a deep copy of the problem, and starts (or queues) a
    /// worker. Returns before the solver makes any progress.
    pub fn submit(&self, problem: P) -> Result<JobId, OrchestratorError> {
        check_unique_entity_ids(&problem)?;
        problem.validate()?;

        if let Some(keep) = self.inner.config.max_completed_jobs {
            let evicted = self.inner.registry.evict_completed(keep);
            if !evicted.is_empty() {
                debug!(count = evicted.len(), "evicted oldest completed jobs");
            }
        }

        let (job_id, _cell) = self.inner.registry.register(problem);
        let mut scheduler = self.inner.scheduler.lock().unwrap();
        if scheduler.shutting_down {
            drop(scheduler);
            self.inner.registry.remove(&job_id);
            return Err(OrchestratorError::Shutdown);
        }
        if scheduler.active < self.inner.config.max_active_jobs {
            scheduler.active += 1;
            let handle = spawn_worker(&self.inner, job_id);
            scheduler.workers.insert(job_id, handle);
            info!(%job_id, "job submitted, worker started");
        } else {
            match self.inner.config.overflow {
                OverflowPolicy::Queue => {
                    scheduler.pending.push_back(job_id);
                    info!(%job_id, queued = scheduler.pending.len(), "job submitted, queued");
                }
                OverflowPolicy::Reject => {
                    drop(scheduler);
                    self.inner.registry.remove(&job_id);
                    warn!("submission rejected, capacity exhausted");
                    return Err(OrchestratorError::Overloaded);
                }
            }
        }
        Ok(job_id)
    }

    /// Returns the current status of a job.
    pub fn status(&self, job_id: &JobId) -> Result<JobStatus, OrchestratorError> {
        self.inner
            .registry
            .status(job_id)
            .ok_or(OrchestratorError::NotFound(*job_id))
    }

    /// Returns a copy of the most recent solution snapshot.
    ///
    /// The snapshot may still be improving while the status is `SOLVING`.
    pub fn result(&self, job_id: &JobId) -> Result<P, OrchestratorError> {
        self.inner
            .registry
            .snapshot(job_id)
            .ok_or(OrchestratorError::NotFound(*job_id))
    }

    /// Returns the error message of a job, if it failed.
    pub fn error(&self, job_id: &JobId) -> Result<Option<String>, OrchestratorError> {
        self.inner
            .registry
            .cell(job_id)
            .map(|cell| cell.error())
            .ok_or(OrchestratorError::NotFound(*job_id))
    }

    /// Requests the job's solving task to stop at its next checkpoint.
    ///
    /// Idempotent: cancelling an already-terminal job is a no-op. Pending
    /// jobs leave the queue and go straight to `NOT_SOLVING`; solving jobs
    /// converge asynchronously - callers that need certainty should use
    /// [`JobOrchestrator::await_terminal`] or poll [`JobOrchestrator::status`].
    pub fn cancel(&self, job_id: &JobId) -> Result<(), OrchestratorError> {
        let cell = self
            .inner
            .registry
            .cell(job_id)
            .ok_or(OrchestratorError::NotFound(*job_id))?;

        {
            let mut scheduler = self.inner.scheduler.lock().unwrap();
            if let Some(pos) = scheduler.pending.iter().position(|p| p == job_id) {
                scheduler.pending.remove(pos);
                drop(scheduler);
                cell.transition(JobStatus::NotSolving, None);
                info!(%job_id, "pending job cancelled");
                return Ok(());
            }
        }

        if cell.status().is_terminal() {
            return Ok(());
        }
        cell.stop_signal().request_stop();
        info!(%job_id, "stop requested");
        Ok(())
    }

    /// Blocks until the job reaches a terminal status or the timeout
    /// elapses, returning the last observed status.
    ///
    /// Backed by a per-job condition variable; polling `status` in a loop
    /// remains the external contract, this is the efficient form of it.
    pub fn await_terminal(
        &self,
        job_id: &JobId,
        timeout: Duration,
    ) -> Result<JobStatus, OrchestratorError> {
        let cell = self
            .inner
            .registry
            .cell(job_id)
            .ok_or(OrchestratorError::NotFound(*job_id))?;
        Ok(cell.await_terminal(timeout))
    }

    /// Number of jobs currently running a worker.
    pub fn active_jobs(&self) -> usize {
        self.inner.scheduler.lock().unwrap().active
    }

    /// Number of jobs accepted but still waiting for a worker slot.
    pub fn pending_jobs(&self) -> usize {
        self.inner.scheduler.lock().unwrap().pending.len()
    }

    /// All registered job ids, including completed ones.
    pub fn job_ids(&self) -> Vec<JobId> {
        self.inner.registry.job_ids()
    }

    /// Stops all in-flight tasks, drains the queue and joins every worker.
    ///
    /// After shutdown, `submit` fails with
    /// [`OrchestratorError::Shutdown`]; reads of existing jobs keep
    /// working.
    pub fn shutdown(&self) {
        let (pending, workers) = {
            let mut scheduler = self.inner.scheduler.lock().unwrap();
            scheduler.shutting_down = true;
            let pending: Vec<JobId> = scheduler.pending.drain(..).collect();
            let workers: Vec<(JobId, JoinHandle<()>)> = scheduler.workers.drain().collect();
            (pending, workers)
        };

        for job_id in pending {
            if let Some(cell) = self.inner.registry.cell(&job_id) {
                cell.transition(JobStatus::NotSolving, None);
            }
        }
        for job_id in self.inner.registry.job_ids() {
            if let Some(cell) = self.inner.registry.cell(&job_id) {
                cell.stop_signal().request_stop();
            }
        }
        for (job_id, handle) in workers {
            if handle.join().is_err() {
                warn!(%job_id, "worker panicked during shutdown");
            }
        }
        info!("orchestrator shut down");
    }
}

fn check_unique_entity_ids<P: PlanningProblem>(problem: &P) -> Result<(), OrchestratorError> {
    let mut seen = HashSet::new();
    for id in problem.entity_ids() {
        if !seen.insert(id.clone()) {
            return Err(OrchestratorError::InvalidProblem(format!(
                "duplicate entity id `{id}`"
            )));
        }
    }
    Ok(())
}

fn spawn_worker<P: PlanningProblem>(inner: &Arc<Inner<P>>, job_id: JobId) -> JoinHandle<()> {
    let inner = Arc::clone(inner);
    std::thread::spawn(move || {
        run_job(&inner, job_id);
        on_worker_done(&inner, job_id);
    })
}

fn run_job<P: PlanningProblem>(inner: &Arc<Inner<P>>, job_id: JobId) {
    let Some(cell) = inner.registry.cell(&job_id) else {
        return;
    };
    let stop = cell.stop_signal();
    if stop.is_stop_requested() {
        // Cancelled between submission and worker start.
        cell.transition(JobStatus::NotSolving, None);
        return;
    }

    cell.transition(JobStatus::Solving, None);
    debug!(%job_id, "solving started");
    let problem = cell.snapshot();
    let constraints = Arc::clone(&inner.constraints);
    let solver = Arc::clone(&inner.solver);

    let outcome = catch_unwind(AssertUnwindSafe(|| {
        let mut on_improved = |improved: P| cell.offer_snapshot(improved);
        solver.solve(problem, constraints, stop, &mut on_improved)
    }));

    match outcome {
        Ok(Ok(best)) => {
            cell.complete(best);
            info!(%job_id, "solving finished");
        }
        Ok(Err(err)) => {
            warn!(%job_id, %err, "solver reported an error");
            cell.transition(JobStatus::Failed, Some(err.to_string()));
        }
        Err(panic) => {
            let message = panic_message(panic.as_ref());
            warn!(%job_id, panic = message, "solver panicked");
            cell.transition(JobStatus::Failed, Some(message.to_string()));
        }
    }
}

fn on_worker_done<P: PlanningProblem>(inner: &Arc<Inner<P>>, job_id: JobId) {
    let mut scheduler = inner.scheduler.lock().unwrap();
    scheduler.workers.remove(&job_id);
    scheduler.active -= 1;
    if scheduler.shutting_down {
        return;
    }
    while scheduler.active < inner.config.max_active_jobs {
        let Some(next) = scheduler.pending.pop_front() else {
            break;
        };
        let Some(cell) = inner.registry.cell(&next) else {
            continue;
        };
        if cell.status().is_terminal() {
            // Cancelled while pending.
            continue;
        }
        scheduler.active += 1;
        let handle = spawn_worker(inner, next);
        scheduler.workers.insert(next, handle);
        debug!(job_id = %next, "pending job dequeued");
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message
    } else {
        "solver panicked"
    }
}
