//! Crew scheduling demo.
//!
//! Run with: cargo run -p crew-scheduling

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use crew_scheduling::{crew_constraints, demo_data};
use planforge::prelude::*;
use planforge_test::HillClimbSolver;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let constraints = Arc::new(crew_constraints());
    let orchestrator = JobOrchestrator::with_config(
        Arc::new(HillClimbSolver::new(300, 42)),
        Arc::clone(&constraints),
        OrchestratorConfig::default(),
    );

    let schedule = demo_data::overlap_scenario();
    let job_id = orchestrator.submit(schedule).unwrap();
    let status = orchestrator
        .await_terminal(&job_id, Duration::from_secs(30))
        .unwrap();
    let solved = orchestrator.result(&job_id).unwrap();

    println!("job {job_id} finished as {status}");
    println!("score: {}", solved.score().unwrap());
    for crew in &solved.crews {
        let jobs: Vec<&str> = solved
            .jobs_of(&crew.id)
            .iter()
            .map(|j| j.id.as_str())
            .collect();
        println!("  {}: {}", crew.id, jobs.join(", "));
    }

    let analysis = ScoreAnalyzer::new(constraints)
        .analyze(&solved, FetchPolicy::Full)
        .unwrap();
    println!("\nscore analysis ({}):", analysis.score);
    for constraint in &analysis.constraints {
        println!(
            "  {} ({} matches, {})",
            constraint.name(),
            constraint.match_count,
            constraint.score
        );
        for m in constraint.matches.iter().flatten() {
            println!("    {} -> {}", m.justification.description, m.score);
        }
    }

    orchestrator.shutdown();
}
