//! End-to-end scenario: a skill bottleneck forces two jobs to overlap.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use crew_scheduling::{crew_constraints, demo_data, Job};
use planforge::prelude::*;
use planforge_test::HillClimbSolver;

#[test]
fn test_forced_overlap_is_attributed_to_the_two_jobs() {
    let constraints = Arc::new(crew_constraints());
    let orchestrator = JobOrchestrator::with_config(
        Arc::new(HillClimbSolver::new(300, 42)),
        Arc::clone(&constraints),
        OrchestratorConfig::default(),
    );

    let job_id = orchestrator.submit(demo_data::overlap_scenario()).unwrap();
    let status = orchestrator
        .await_terminal(&job_id, Duration::from_secs(30))
        .unwrap();
    assert_eq!(status, JobStatus::NotSolving);

    let solved = orchestrator.result(&job_id).unwrap();
    assert!(solved.is_fully_assigned());
    // One unavoidable overlap, three assigned jobs.
    assert_eq!(solved.score(), Some(HardSoftScore::of(-1, 3)));

    let analysis = ScoreAnalyzer::new(constraints)
        .analyze(&solved, FetchPolicy::Full)
        .unwrap();
    assert_eq!(analysis.score, HardSoftScore::of(-1, 3));

    // No crew was sent out without the required skill.
    assert_eq!(
        analysis.constraint("MissingSkill").unwrap().score,
        HardSoftScore::ZERO
    );

    // The overlap penalty names exactly the two welding jobs.
    let overlap = analysis.constraint("JobOverlap").unwrap();
    assert_eq!(overlap.match_count, 1);
    assert_eq!(overlap.score, HardSoftScore::of(-1, 0));

    let matches = overlap.matches.as_ref().unwrap();
    let involved: BTreeSet<&str> = matches[0]
        .justification
        .entities
        .iter()
        .filter_map(|e| e.as_entity::<Job>())
        .map(|j| j.id.as_str())
        .collect();
    let expected: BTreeSet<&str> = ["repair-hull", "patch-deck"].into_iter().collect();
    assert_eq!(involved, expected);

    orchestrator.shutdown();
}
