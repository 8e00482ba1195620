//! Vehicle routing domain model.

use std::collections::HashMap;

use planforge::{
    AssignmentDomain, AssignmentError, EntityId, HardSoftScore, PlanningProblem,
    ProblemValidationError, ResourceId,
};

/// A customer visit with a demand and a location on a grid.
#[derive(Debug, Clone)]
pub struct Visit {
    pub id: EntityId,
    pub demand: i64,
    pub x: i64,
    pub y: i64,
}

/// A vehicle with a capacity, starting and ending at its depot.
#[derive(Debug, Clone)]
pub struct Vehicle {
    pub id: ResourceId,
    pub capacity: i64,
    pub depot_x: i64,
    pub depot_y: i64,
}

fn manhattan(ax: i64, ay: i64, bx: i64, by: i64) -> i64 {
    (ax - bx).abs() + (ay - by).abs()
}

/// The planning problem: visits, vehicles, and per-vehicle ordered routes.
#[derive(Debug, Clone)]
pub struct RoutePlan {
    pub visits: Vec<Visit>,
    pub vehicles: Vec<Vehicle>,
    pub routes: HashMap<ResourceId, Vec<EntityId>>,
    pub score: Option<HardSoftScore>,
}

impl RoutePlan {
    /// Builds a plan with empty routes.
    pub fn new(visits: Vec<Visit>, vehicles: Vec<Vehicle>) -> Self {
        let routes = vehicles.iter().map(|v| (v.id.clone(), Vec::new())).collect();
        Self {
            visits,
            vehicles,
            routes,
            score: None,
        }
    }

    /// Registers a newly arrived visit, unassigned.
    ///
    /// Invalidates the stored score; re-evaluate before comparing.
    pub fn add_visit(&mut self, visit: Visit) {
        self.visits.push(visit);
        self.score = None;
    }

    /// Total demand routed to one vehicle.
    pub fn load_of(&self, vehicle: &ResourceId) -> i64 {
        self.routes
            .get(vehicle)
            .map(|route| {
                route
                    .iter()
                    .filter_map(|id| self.visit(id))
                    .map(|v| v.demand)
                    .sum()
            })
            .unwrap_or(0)
    }

    /// Round-trip distance of one vehicle's route: depot, each visit in
    /// order, back to the depot. An empty route has distance zero.
    pub fn route_distance(&self, vehicle: &Vehicle) -> i64 {
        let Some(route) = self.routes.get(&vehicle.id) else {
            return 0;
        };
        let stops: Vec<&Visit> = route.iter().filter_map(|id| self.visit(id)).collect();
        if stops.is_empty() {
            return 0;
        }
        let mut distance = 0;
        let (mut x, mut y) = (vehicle.depot_x, vehicle.depot_y);
        for stop in &stops {
            distance += manhattan(x, y, stop.x, stop.y);
            (x, y) = (stop.x, stop.y);
        }
        distance + manhattan(x, y, vehicle.depot_x, vehicle.depot_y)
    }

    pub fn visit(&self, id: &EntityId) -> Option<&Visit> {
        self.visits.iter().find(|v| &v.id == id)
    }

    pub fn vehicle(&self, id: &ResourceId) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| &v.id == id)
    }
}

impl PlanningProblem for RoutePlan {
    type Score = HardSoftScore;

    fn score(&self) -> Option<HardSoftScore> {
        self.score
    }

    fn set_score(&mut self, score: Option<HardSoftScore>) {
        self.score = score;
    }

    fn entity_ids(&self) -> Vec<EntityId> {
        self.visits.iter().map(|v| v.id.clone()).collect()
    }

    fn is_assigned(&self, entity: &EntityId) -> bool {
        self.routes.values().any(|route| route.contains(entity))
    }

    fn validate(&self) -> Result<(), ProblemValidationError> {
        for route in self.routes.values() {
            for id in route {
                if self.visit(id).is_none() {
                    return Err(ProblemValidationError::new(format!(
                        "routed visit `{id}` does not exist"
                    )));
                }
            }
        }
        Ok(())
    }
}

impl AssignmentDomain for RoutePlan {
    fn eligible_resources(&self, _entity: &EntityId) -> Vec<ResourceId> {
        self.vehicles.iter().map(|v| v.id.clone()).collect()
    }

    fn insertion_positions(&self, resource: &ResourceId) -> usize {
        self.routes
            .get(resource)
            .map(|route| route.len() + 1)
            .unwrap_or(0)
    }

    fn assign(
        &mut self,
        entity: &EntityId,
        resource: &ResourceId,
        position: usize,
    ) -> Result<(), AssignmentError> {
        if self.visit(entity).is_none() {
            return Err(AssignmentError::UnknownEntity(entity.clone()));
        }
        if self.is_assigned(entity) {
            return Err(AssignmentError::AlreadyAssigned(entity.clone()));
        }
        let route = self
            .routes
            .get_mut(resource)
            .ok_or_else(|| AssignmentError::UnknownResource(resource.clone()))?;
        if position > route.len() {
            return Err(AssignmentError::PositionOutOfRange {
                resource: resource.clone(),
                position,
                slots: route.len() + 1,
            });
        }
        route.insert(position, entity.clone());
        Ok(())
    }

    fn unassign(&mut self, entity: &EntityId) -> Result<(), AssignmentError> {
        for route in self.routes.values_mut() {
            if let Some(pos) = route.iter().position(|id| id == entity) {
                route.remove(pos);
                return Ok(());
            }
        }
        Err(AssignmentError::NotAssigned(entity.clone()))
    }
}
