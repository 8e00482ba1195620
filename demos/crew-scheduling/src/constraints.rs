//! Constraint set for crew scheduling.

use planforge::{
    Constraint, ConstraintHit, ConstraintJustification, ConstraintSet, EntityRef, HardSoftScore,
    PlanningProblem,
};

use crate::domain::CrewSchedule;

/// Registers the vertical's constraints.
///
/// A missing skill outweighs an overlap, so when a skill forces two jobs
/// onto the same crew the solver accepts the overlap rather than sending
/// an unqualified crew.
pub fn crew_constraints() -> ConstraintSet<CrewSchedule> {
    ConstraintSet::new()
        .with(Constraint::penalize(
            "JobOverlap",
            HardSoftScore::ONE_HARD,
            |p: &CrewSchedule| {
                let mut hits = Vec::new();
                for crew in &p.crews {
                    let jobs = p.jobs_of(&crew.id);
                    for (i, a) in jobs.iter().enumerate() {
                        for b in &jobs[i + 1..] {
                            if a.overlaps(b) {
                                hits.push(ConstraintHit::new(ConstraintJustification::new(vec![
                                    EntityRef::new(*a),
                                    EntityRef::new(*b),
                                ])));
                            }
                        }
                    }
                }
                Ok(hits)
            },
        ))
        .with(Constraint::penalize(
            "MissingSkill",
            HardSoftScore::of_hard(2),
            |p: &CrewSchedule| {
                let mut hits = Vec::new();
                for crew in &p.crews {
                    for job in p.jobs_of(&crew.id) {
                        if !crew.has_skill(&job.required_skill) {
                            hits.push(ConstraintHit::new(ConstraintJustification::new(vec![
                                EntityRef::new(job),
                                EntityRef::new(crew),
                            ])));
                        }
                    }
                }
                Ok(hits)
            },
        ))
        .with(Constraint::reward(
            "JobAssigned",
            HardSoftScore::ONE_SOFT,
            |p: &CrewSchedule| {
                Ok(p.jobs
                    .iter()
                    .filter(|j| p.is_assigned(&j.id))
                    .map(|j| {
                        ConstraintHit::new(ConstraintJustification::new(vec![EntityRef::new(j)]))
                    })
                    .collect())
            },
        ))
}
