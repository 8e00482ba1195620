//! Constraint set for vehicle routing.

use planforge::{
    Constraint, ConstraintHit, ConstraintJustification, ConstraintSet, EntityRef, HardSoftScore,
    PlanningProblem,
};

use crate::domain::RoutePlan;

/// Soft reward for serving one visit. Chosen well above any plausible
/// detour on the demo grid so serving is always worth driving.
pub const SERVICE_REWARD: i64 = 100;

/// Registers the vertical's constraints.
pub fn routing_constraints() -> ConstraintSet<RoutePlan> {
    ConstraintSet::new()
        .with(Constraint::penalize(
            "VehicleOverCapacity",
            HardSoftScore::ONE_HARD,
            |p: &RoutePlan| {
                let mut hits = Vec::new();
                for vehicle in &p.vehicles {
                    let excess = p.load_of(&vehicle.id) - vehicle.capacity;
                    if excess > 0 {
                        hits.push(ConstraintHit::weighted(
                            ConstraintJustification::new(vec![EntityRef::new(vehicle)]),
                            excess,
                        ));
                    }
                }
                Ok(hits)
            },
        ))
        .with(Constraint::reward(
            "VisitServed",
            HardSoftScore::of_soft(SERVICE_REWARD),
            |p: &RoutePlan| {
                Ok(p.visits
                    .iter()
                    .filter(|v| p.is_assigned(&v.id))
                    .map(|v| {
                        ConstraintHit::new(ConstraintJustification::new(vec![EntityRef::new(v)]))
                    })
                    .collect())
            },
        ))
        .with(Constraint::penalize(
            "TravelDistance",
            HardSoftScore::ONE_SOFT,
            |p: &RoutePlan| {
                let mut hits = Vec::new();
                for vehicle in &p.vehicles {
                    let distance = p.route_distance(vehicle);
                    if distance > 0 {
                        hits.push(ConstraintHit::weighted(
                            ConstraintJustification::new(vec![EntityRef::with_display(
                                vehicle,
                                format!("{} drives {distance}", vehicle.id),
                            )]),
                            distance,
                        ));
                    }
                }
                Ok(hits)
            },
        ))
}
