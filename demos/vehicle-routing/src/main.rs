//! Vehicle routing demo.
//!
//! Solves a small delivery plan, then shows the what-if flow: a walk-in
//! visit arrives and the recommender ranks every legal insertion.
//!
//! Run with: cargo run -p vehicle-routing

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use planforge::prelude::*;
use planforge_test::HillClimbSolver;
use vehicle_routing::{demo_data, routing_constraints};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let constraints = Arc::new(routing_constraints());
    let orchestrator = JobOrchestrator::with_config(
        Arc::new(HillClimbSolver::new(500, 42)),
        Arc::clone(&constraints),
        OrchestratorConfig::default(),
    );

    let job_id = orchestrator.submit(demo_data::delivery_scenario()).unwrap();
    let status = orchestrator
        .await_terminal(&job_id, Duration::from_secs(30))
        .unwrap();
    let mut plan = orchestrator.result(&job_id).unwrap();
    orchestrator.shutdown();

    println!("job {job_id} finished as {status}");
    println!("score: {}", plan.score().unwrap());
    print_routes(&plan);

    let analysis = ScoreAnalyzer::new(Arc::clone(&constraints))
        .analyze(&plan, FetchPolicy::Full)
        .unwrap();
    println!("\nscore analysis ({}):", analysis.score);
    for constraint in &analysis.constraints {
        println!(
            "  {} ({} matches, {})",
            constraint.name(),
            constraint.match_count,
            constraint.score
        );
    }

    // A walk-in customer shows up: where does the new visit hurt least?
    let walk_in = demo_data::walk_in_visit();
    let entity = walk_in.id.clone();
    plan.add_visit(walk_in);

    let recommender = Recommender::new(constraints);
    let ranked = recommender.recommend(&plan, &entity).unwrap();
    println!("\nplacements for {entity}, best first:");
    for rec in &ranked {
        println!(
            "  {} at position {} -> {}",
            rec.resource, rec.position, rec.score
        );
    }

    let applied = recommender.apply(&plan, &entity, &ranked[0]).unwrap();
    println!("\napplied best placement, score: {}", applied.score().unwrap());
    print_routes(&applied);
}

fn print_routes(plan: &vehicle_routing::RoutePlan) {
    for vehicle in &plan.vehicles {
        let stops: Vec<&str> = plan.routes[&vehicle.id]
            .iter()
            .map(|id| id.as_str())
            .collect();
        println!(
            "  {} (load {}, distance {}): {}",
            vehicle.id,
            plan.load_of(&vehicle.id),
            plan.route_distance(vehicle),
            stops.join(" -> ")
        );
    }
}
