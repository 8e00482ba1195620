//! Vehicle routing vertical.
//!
//! Vehicles drive an ordered route of visits from their depot and back.
//! Exceeding a vehicle's capacity breaks a hard constraint; the soft level
//! trades the reward for serving visits against travel distance, so a
//! served visit is always worth a short detour.

pub mod constraints;
pub mod demo_data;
pub mod domain;

pub use constraints::routing_constraints;
pub use domain::{RoutePlan, Vehicle, Visit};
