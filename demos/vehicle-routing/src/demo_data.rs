//! Demo data generation.

use planforge::{EntityId, ResourceId};

use crate::domain::{RoutePlan, Vehicle, Visit};

/// Two vehicles with four visits clustered around their depots.
pub fn delivery_scenario() -> RoutePlan {
    let visits = vec![
        visit("bakery", 4, 1, 0),
        visit("grocer", 4, 2, 1),
        visit("florist", 4, 11, 0),
        visit("butcher", 4, 12, 1),
    ];
    let vehicles = vec![
        vehicle("van-east", 15, 0, 0),
        vehicle("van-west", 15, 10, 0),
    ];
    RoutePlan::new(visits, vehicles)
}

/// The visit that arrives after the plan is solved.
pub fn walk_in_visit() -> Visit {
    visit("deli", 4, 1, 1)
}

fn visit(id: &str, demand: i64, x: i64, y: i64) -> Visit {
    Visit {
        id: EntityId::new(id),
        demand,
        x,
        y,
    }
}

fn vehicle(id: &str, capacity: i64, depot_x: i64, depot_y: i64) -> Vehicle {
    Vehicle {
        id: ResourceId::new(id),
        capacity,
        depot_x,
        depot_y,
    }
}
