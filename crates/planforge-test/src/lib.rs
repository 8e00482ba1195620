//! Shared test fixtures for PlanForge crates.
//!
//! - [`task`] - a minimal task-assignment domain (workers with ordered
//!   task queues) plus its constraint set
//! - [`solver`] - `HillClimbSolver`, a small reference implementation of
//!   the solver capability for tests and demos
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! planforge-test = { workspace = true }
//! ```

pub mod solver;
pub mod task;

pub use solver::HillClimbSolver;
pub use task::{Task, TaskSchedule, Worker};
