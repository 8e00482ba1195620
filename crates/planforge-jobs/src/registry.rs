//! The in-memory job table.
//!
//! The registry is the only shared mutable state in the job layer. All
//! mutation is confined to replacing one job's snapshot or status under
//! that job's own lock; readers always receive clones, never live
//! references, so polling can never race with an in-progress mutation.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

use tracing::debug;
use uuid::Uuid;

use planforge_core::PlanningProblem;
use planforge_solver::StopSignal;

use crate::status::JobStatus;

/// Opaque job identifier, generated at submission.
///
/// Not durable across process restarts; clients must not persist these
/// unless an external store is layered on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct JobId(Uuid);

impl JobId {
    /// Generates a fresh, previously unissued identifier.
    pub fn random() -> Self {
        JobId(Uuid::new_v4())
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

struct JobState<P: PlanningProblem> {
    status: JobStatus,
    snapshot: P,
    error: Option<String>,
}

/// One job's slot: state under its own lock, a condvar signalled on every
/// status change, and the cooperative stop signal for its solving task.
pub(crate) struct JobCell<P: PlanningProblem> {
    state: Mutex<JobState<P>>,
    changed: Condvar,
    stop: StopSignal,
    submitted_at: Instant,
}

impl<P: PlanningProblem> JobCell<P> {
    fn new(snapshot: P) -> Self {
        Self {
            state: Mutex::new(JobState {
                status: JobStatus::Scheduled,
                snapshot,
                error: None,
            }),
            changed: Condvar::new(),
            stop: StopSignal::new(),
            submitted_at: Instant::now(),
        }
    }

    pub(crate) fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    pub(crate) fn status(&self) -> JobStatus {
        self.state.lock().unwrap().status
    }

    pub(crate) fn snapshot(&self) -> P {
        self.state.lock().unwrap().snapshot.clone()
    }

    pub(crate) fn error(&self) -> Option<String> {
        self.state.lock().unwrap().error.clone()
    }

    /// Moves the job to a new status; no-op if already terminal.
    pub(crate) fn transition(&self, status: JobStatus, error: Option<String>) {
        let mut state = self.state.lock().unwrap();
        if state.status.is_terminal() {
            return;
        }
        state.status = status;
        state.error = error;
        self.changed.notify_all();
    }

    /// Installs the final solution and terminates the job in one step.
    ///
    /// Unlike [`JobCell::offer_snapshot`], the monotonicity guard does not
    /// apply here: the solver's returned best is authoritative, even when
    /// an intermediate snapshot happened to carry a higher score (a search
    /// may stream partial assignments whose scores transiently regress as
    /// placements introduce penalties). No-op if already terminal.
    pub(crate) fn complete(&self, solution: P) {
        let mut state = self.state.lock().unwrap();
        if state.status.is_terminal() {
            return;
        }
        state.snapshot = solution;
        state.status = JobStatus::NotSolving;
        state.error = None;
        self.changed.notify_all();
    }

    /// Atomically replaces the snapshot with an improving solution.
    ///
    /// The update is dropped when the job is already terminal (a terminal
    /// snapshot is immutable) or when it would regress the score, which
    /// keeps successive `result` reads monotonically non-decreasing while
    /// the job is still solving.
    pub(crate) fn offer_snapshot(&self, solution: P) {
        let mut state = self.state.lock().unwrap();
        if state.status.is_terminal() {
            debug!("dropping snapshot update for terminal job");
            return;
        }
        match (state.snapshot.score(), solution.score()) {
            (Some(current), Some(offered)) if offered < current => {
                debug!(%current, %offered, "dropping regressing snapshot update");
            }
            _ => state.snapshot = solution,
        }
    }

    /// Blocks until the job reaches a terminal status or the timeout
    /// elapses; returns the status observed last.
    pub(crate) fn await_terminal(&self, timeout: Duration) -> JobStatus {
        let deadline = Instant::now() + timeout;
        let mut state = self.state.lock().unwrap();
        while !state.status.is_terminal() {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            let (next, wait) = self
                .changed
                .wait_timeout(state, deadline - now)
                .unwrap();
            state = next;
            if wait.timed_out() {
                break;
            }
        }
        state.status
    }
}

/// In-memory table of jobs keyed by [`JobId`].
pub struct JobRegistry<P: PlanningProblem> {
    jobs: Mutex<HashMap<JobId, Arc<JobCell<P>>>>,
}

impl<P: PlanningProblem> Default for JobRegistry<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: PlanningProblem> JobRegistry<P> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            jobs: Mutex::new(HashMap::new()),
        }
    }

    /// Registers a new job around a deep copy of the problem, in status
    /// `Scheduled`.
    pub(crate) fn register(&self, problem: P) -> (JobId, Arc<JobCell<P>>) {
        let id = JobId::random();
        let cell = Arc::new(JobCell::new(problem));
        self.jobs.lock().unwrap().insert(id, cell.clone());
        (id, cell)
    }

    pub(crate) fn cell(&self, id: &JobId) -> Option<Arc<JobCell<P>>> {
        self.jobs.lock().unwrap().get(id).cloned()
    }

    /// Returns the status of a job.
    pub fn status(&self, id: &JobId) -> Option<JobStatus> {
        self.cell(id).map(|cell| cell.status())
    }

    /// Returns a copy of the most recent solution snapshot.
    pub fn snapshot(&self, id: &JobId) -> Option<P> {
        self.cell(id).map(|cell| cell.snapshot())
    }

    /// Returns the error message of a failed job, if any.
    pub fn error(&self, id: &JobId) -> Option<String> {
        self.cell(id).and_then(|cell| cell.error())
    }

    /// Returns all registered job ids.
    pub fn job_ids(&self) -> Vec<JobId> {
        self.jobs.lock().unwrap().keys().copied().collect()
    }

    /// Returns the number of jobs currently registered.
    pub fn len(&self) -> usize {
        self.jobs.lock().unwrap().len()
    }

    /// Returns true when no jobs are registered.
    pub fn is_empty(&self) -> bool {
        self.jobs.lock().unwrap().is_empty()
    }

    /// Removes a job, returning its final snapshot.
    pub(crate) fn remove(&self, id: &JobId) -> Option<P> {
        self.jobs
            .lock()
            .unwrap()
            .remove(id)
            .map(|cell| cell.snapshot())
    }

    /// Evicts the oldest terminal jobs until at most `keep` remain.
    ///
    /// Active jobs are never evicted. Returns the evicted ids.
    pub(crate) fn evict_completed(&self, keep: usize) -> Vec<JobId> {
        let mut jobs = self.jobs.lock().unwrap();
        let mut completed: Vec<(JobId, Instant)> = jobs
            .iter()
            .filter(|(_, cell)| cell.status().is_terminal())
            .map(|(id, cell)| (*id, cell.submitted_at))
            .collect();
        if completed.len() <= keep {
            return Vec::new();
        }
        completed.sort_by_key(|(_, at)| *at);
        let evicted: Vec<JobId> = completed[..completed.len() - keep]
            .iter()
            .map(|(id, _)| *id)
            .collect();
        for id in &evicted {
            jobs.remove(id);
        }
        evicted
    }
}
