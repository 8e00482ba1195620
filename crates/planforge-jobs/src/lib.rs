//! Job management for long-running PlanForge solves.
//!
//! A client submits a planning problem, gets back an opaque job id, and
//! from then on polls: status, the evolving best-solution snapshot, or a
//! cancellation request. Each job owns exactly one background solving
//! task; failures inside one job never affect another.
//!
//! - [`JobRegistry`] - the in-memory table of jobs, the only shared
//!   mutable state in the system
//! - [`JobOrchestrator`] - submission, lifecycle transitions, capacity
//!   policy and shutdown
//! - [`OrchestratorConfig`] - capacity and retention knobs, loadable from
//!   TOML

mod config;
mod error;
mod orchestrator;
mod registry;
mod status;

#[cfg(test)]
mod orchestrator_tests;

pub use config::{ConfigError, OrchestratorConfig, OverflowPolicy};
pub use error::OrchestratorError;
pub use orchestrator::JobOrchestrator;
pub use registry::{JobId, JobRegistry};
pub use status::JobStatus;
