//! Crew scheduling domain model.

use std::collections::HashMap;

use planforge::{
    AssignmentDomain, AssignmentError, EntityId, HardSoftScore, PlanningProblem,
    ProblemValidationError, ResourceId,
};

/// A job with a time window and a required skill.
#[derive(Debug, Clone)]
pub struct Job {
    pub id: EntityId,
    pub required_skill: String,
    /// Start of the time window, in whole hours.
    pub start: i64,
    /// Exclusive end of the time window.
    pub end: i64,
}

impl Job {
    /// True when the two time windows share at least one hour.
    pub fn overlaps(&self, other: &Job) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// An assignable crew with the skills it can perform.
#[derive(Debug, Clone)]
pub struct Crew {
    pub id: ResourceId,
    pub skills: Vec<String>,
}

impl Crew {
    pub fn has_skill(&self, skill: &str) -> bool {
        self.skills.iter().any(|s| s == skill)
    }
}

/// The planning problem: jobs, crews, and per-crew rosters.
///
/// Rosters are ordered only to give insertion positions stable meaning;
/// the constraints look at time windows, not roster order.
#[derive(Debug, Clone)]
pub struct CrewSchedule {
    pub jobs: Vec<Job>,
    pub crews: Vec<Crew>,
    pub rosters: HashMap<ResourceId, Vec<EntityId>>,
    pub score: Option<HardSoftScore>,
}

impl CrewSchedule {
    /// Builds an unassigned schedule.
    pub fn new(jobs: Vec<Job>, crews: Vec<Crew>) -> Self {
        let rosters = crews.iter().map(|c| (c.id.clone(), Vec::new())).collect();
        Self {
            jobs,
            crews,
            rosters,
            score: None,
        }
    }

    /// The jobs currently rostered on one crew.
    pub fn jobs_of(&self, crew: &ResourceId) -> Vec<&Job> {
        self.rosters
            .get(crew)
            .map(|roster| roster.iter().filter_map(|id| self.job(id)).collect())
            .unwrap_or_default()
    }

    pub fn job(&self, id: &EntityId) -> Option<&Job> {
        self.jobs.iter().find(|j| &j.id == id)
    }

    pub fn crew(&self, id: &ResourceId) -> Option<&Crew> {
        self.crews.iter().find(|c| &c.id == id)
    }
}

impl PlanningProblem for CrewSchedule {
    type Score = HardSoftScore;

    fn score(&self) -> Option<HardSoftScore> {
        self.score
    }

    fn set_score(&mut self, score: Option<HardSoftScore>) {
        self.score = score;
    }

    fn entity_ids(&self) -> Vec<EntityId> {
        self.jobs.iter().map(|j| j.id.clone()).collect()
    }

    fn is_assigned(&self, entity: &EntityId) -> bool {
        self.rosters.values().any(|roster| roster.contains(entity))
    }

    fn validate(&self) -> Result<(), ProblemValidationError> {
        for roster in self.rosters.values() {
            for id in roster {
                if self.job(id).is_none() {
                    return Err(ProblemValidationError::new(format!(
                        "rostered job `{id}` does not exist"
                    )));
                }
            }
        }
        for job in &self.jobs {
            if job.start >= job.end {
                return Err(ProblemValidationError::new(format!(
                    "job `{}` has an empty time window",
                    job.id
                )));
            }
        }
        Ok(())
    }
}

impl AssignmentDomain for CrewSchedule {
    fn eligible_resources(&self, _entity: &EntityId) -> Vec<ResourceId> {
        self.crews.iter().map(|c| c.id.clone()).collect()
    }

    fn insertion_positions(&self, resource: &ResourceId) -> usize {
        self.rosters
            .get(resource)
            .map(|roster| roster.len() + 1)
            .unwrap_or(0)
    }

    fn assign(
        &mut self,
        entity: &EntityId,
        resource: &ResourceId,
        position: usize,
    ) -> Result<(), AssignmentError> {
        if self.job(entity).is_none() {
            return Err(AssignmentError::UnknownEntity(entity.clone()));
        }
        if self.is_assigned(entity) {
            return Err(AssignmentError::AlreadyAssigned(entity.clone()));
        }
        let roster = self
            .rosters
            .get_mut(resource)
            .ok_or_else(|| AssignmentError::UnknownResource(resource.clone()))?;
        if position > roster.len() {
            return Err(AssignmentError::PositionOutOfRange {
                resource: resource.clone(),
                position,
                slots: roster.len() + 1,
            });
        }
        roster.insert(position, entity.clone());
        Ok(())
    }

    fn unassign(&mut self, entity: &EntityId) -> Result<(), AssignmentError> {
        for roster in self.rosters.values_mut() {
            if let Some(pos) = roster.iter().position(|id| id == entity) {
                roster.remove(pos);
                return Ok(());
            }
        }
        Err(AssignmentError::NotAssigned(entity.clone()))
    }
}
