//! Crew scheduling vertical.
//!
//! Crews carry skills; jobs carry a time window and a required skill. A
//! crew cannot work two overlapping jobs, and sending a crew without the
//! required skill is worse than accepting an overlap.

pub mod constraints;
pub mod demo_data;
pub mod domain;

pub use constraints::crew_constraints;
pub use domain::{Crew, CrewSchedule, Job};
