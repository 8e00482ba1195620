//! PlanForge Core - Core types and traits for planning problems
//!
//! This crate provides the fundamental abstractions for PlanForge:
//! - Score types for representing solution quality
//! - Domain traits for defining planning problems and assignment capabilities
//! - Constraint identity types shared by the scoring layer

pub mod constraint;
pub mod domain;
pub mod error;
pub mod score;

pub use constraint::{ConstraintRef, ImpactType};
pub use domain::{AssignmentDomain, EntityId, PlanningProblem, ResourceId};
pub use error::{AssignmentError, ProblemValidationError};
pub use score::{HardMediumSoftScore, HardSoftScore, Score, ScoreLevel, SimpleScore};
