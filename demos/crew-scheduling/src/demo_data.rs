//! Demo data generation.

use planforge::{EntityId, ResourceId};

use crate::domain::{Crew, CrewSchedule, Job};

/// Three jobs, two crews, one unavoidable overlap.
///
/// Both welding jobs fall in overlapping windows and only crew alpha can
/// weld, so the best reachable plan carries exactly one overlap.
pub fn overlap_scenario() -> CrewSchedule {
    let jobs = vec![
        job("repair-hull", "welding", 8, 12),
        job("patch-deck", "welding", 10, 14),
        job("rewire-bridge", "electrical", 8, 12),
    ];
    let crews = vec![
        crew("alpha", &["welding"]),
        crew("bravo", &["electrical"]),
    ];
    CrewSchedule::new(jobs, crews)
}

fn job(id: &str, skill: &str, start: i64, end: i64) -> Job {
    Job {
        id: EntityId::new(id),
        required_skill: skill.to_string(),
        start,
        end,
    }
}

fn crew(id: &str, skills: &[&str]) -> Crew {
    Crew {
        id: ResourceId::new(id),
        skills: skills.iter().map(|s| s.to_string()).collect(),
    }
}
