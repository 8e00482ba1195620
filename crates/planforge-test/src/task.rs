//! Task-assignment fixture domain.
//!
//! Workers hold an ordered queue of tasks. Overloading a worker beyond its
//! capacity breaks a hard constraint; every assigned task earns a soft
//! reward, so fuller schedules score better.

use std::collections::HashMap;

use planforge_core::{
    AssignmentDomain, AssignmentError, EntityId, HardSoftScore, PlanningProblem,
    ProblemValidationError, ResourceId,
};
use planforge_scoring::{
    Constraint, ConstraintHit, ConstraintJustification, ConstraintSet, EntityRef,
};

/// A unit of work to be assigned.
#[derive(Debug, Clone)]
pub struct Task {
    pub id: EntityId,
    pub len: i64,
}

/// An assignable worker with a capacity in task length units.
#[derive(Debug, Clone)]
pub struct Worker {
    pub id: ResourceId,
    pub capacity: i64,
}

/// The fixture problem: tasks, workers, and per-worker ordered queues.
#[derive(Debug, Clone)]
pub struct TaskSchedule {
    pub tasks: Vec<Task>,
    pub workers: Vec<Worker>,
    pub queues: HashMap<ResourceId, Vec<EntityId>>,
    pub score: Option<HardSoftScore>,
}

impl TaskSchedule {
    /// Builds an unassigned schedule from `(task id, len)` and
    /// `(worker id, capacity)` tuples.
    pub fn new(tasks: &[(&str, i64)], workers: &[(&str, i64)]) -> Self {
        let tasks: Vec<Task> = tasks
            .iter()
            .map(|(id, len)| Task {
                id: EntityId::new(*id),
                len: *len,
            })
            .collect();
        let workers: Vec<Worker> = workers
            .iter()
            .map(|(id, capacity)| Worker {
                id: ResourceId::new(*id),
                capacity: *capacity,
            })
            .collect();
        let queues = workers.iter().map(|w| (w.id.clone(), Vec::new())).collect();
        Self {
            tasks,
            workers,
            queues,
            score: None,
        }
    }

    /// Total queued task length for one worker.
    pub fn load_of(&self, worker: &ResourceId) -> i64 {
        self.queues
            .get(worker)
            .map(|queue| {
                queue
                    .iter()
                    .filter_map(|id| self.task(id))
                    .map(|t| t.len)
                    .sum()
            })
            .unwrap_or(0)
    }

    fn task(&self, id: &EntityId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    fn worker(&self, id: &ResourceId) -> Option<&Worker> {
        self.workers.iter().find(|w| &w.id == id)
    }
}

impl PlanningProblem for TaskSchedule {
    type Score = HardSoftScore;

    fn score(&self) -> Option<HardSoftScore> {
        self.score
    }

    fn set_score(&mut self, score: Option<HardSoftScore>) {
        self.score = score;
    }

    fn entity_ids(&self) -> Vec<EntityId> {
        self.tasks.iter().map(|t| t.id.clone()).collect()
    }

    fn is_assigned(&self, entity: &EntityId) -> bool {
        self.queues.values().any(|queue| queue.contains(entity))
    }

    fn validate(&self) -> Result<(), ProblemValidationError> {
        for queue in self.queues.values() {
            for id in queue {
                if self.task(id).is_none() {
                    return Err(ProblemValidationError::new(format!(
                        "queued task `{id}` does not exist"
                    )));
                }
            }
        }
        Ok(())
    }
}

impl AssignmentDomain for TaskSchedule {
    fn eligible_resources(&self, _entity: &EntityId) -> Vec<ResourceId> {
        self.workers.iter().map(|w| w.id.clone()).collect()
    }

    fn insertion_positions(&self, resource: &ResourceId) -> usize {
        self.queues
            .get(resource)
            .map(|queue| queue.len() + 1)
            .unwrap_or(0)
    }

    fn assign(
        &mut self,
        entity: &EntityId,
        resource: &ResourceId,
        position: usize,
    ) -> Result<(), AssignmentError> {
        if self.task(entity).is_none() {
            return Err(AssignmentError::UnknownEntity(entity.clone()));
        }
        if self.is_assigned(entity) {
            return Err(AssignmentError::AlreadyAssigned(entity.clone()));
        }
        if self.worker(resource).is_none() {
            return Err(AssignmentError::UnknownResource(resource.clone()));
        }
        let queue = self
            .queues
            .get_mut(resource)
            .ok_or_else(|| AssignmentError::UnknownResource(resource.clone()))?;
        if position > queue.len() {
            return Err(AssignmentError::PositionOutOfRange {
                resource: resource.clone(),
                position,
                slots: queue.len() + 1,
            });
        }
        queue.insert(position, entity.clone());
        Ok(())
    }

    fn unassign(&mut self, entity: &EntityId) -> Result<(), AssignmentError> {
        for queue in self.queues.values_mut() {
            if let Some(pos) = queue.iter().position(|id| id == entity) {
                queue.remove(pos);
                return Ok(());
            }
        }
        Err(AssignmentError::NotAssigned(entity.clone()))
    }
}

/// The fixture's registered constraint set.
pub fn task_constraints() -> ConstraintSet<TaskSchedule> {
    ConstraintSet::new()
        .with(Constraint::penalize(
            "WorkerOverload",
            HardSoftScore::ONE_HARD,
            |p: &TaskSchedule| {
                let mut hits = Vec::new();
                for worker in &p.workers {
                    let overload = p.load_of(&worker.id) - worker.capacity;
                    if overload > 0 {
                        hits.push(ConstraintHit::weighted(
                            ConstraintJustification::new(vec![EntityRef::new(worker)]),
                            overload,
                        ));
                    }
                }
                Ok(hits)
            },
        ))
        .with(Constraint::reward(
            "TaskAssigned",
            HardSoftScore::ONE_SOFT,
            |p: &TaskSchedule| {
                Ok(p.tasks
                    .iter()
                    .filter(|t| p.is_assigned(&t.id))
                    .map(|t| {
                        ConstraintHit::new(ConstraintJustification::new(vec![EntityRef::new(t)]))
                    })
                    .collect())
            },
        ))
}
