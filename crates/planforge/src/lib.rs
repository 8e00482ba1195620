//! PlanForge - job-oriented orchestration for combinatorial assignment
//! solving.
//!
//! Submit a planning problem, poll the evolving best solution, analyze
//! where its score comes from, and ask for ranked what-if placements of a
//! new entity. The heavy lifting lives in the member crates; this crate
//! re-exports the user-facing surface.
//!
//! # Example
//!
//! ```rust
//! use planforge::prelude::*;
//!
//! // Score types are re-exported
//! let score = HardSoftScore::of(0, -100);
//! assert_eq!(score.hard(), 0);
//! assert_eq!(score.soft(), -100);
//! ```

// Score types
pub use planforge_core::score::{
    HardMediumSoftScore, HardSoftScore, Score, ScoreLevel, SimpleScore,
};

// Domain traits and identifiers
pub use planforge_core::{
    AssignmentDomain, AssignmentError, EntityId, PlanningProblem, ProblemValidationError,
    ResourceId,
};

// Constraint definition and score analysis
pub use planforge_scoring::{
    Constraint, ConstraintAnalysis, ConstraintHit, ConstraintJustification, ConstraintMatch,
    ConstraintSet, EntityRef, FetchPolicy, ScoreAnalysis, ScoreAnalyzer,
};

// Solver seam
pub use planforge_solver::{SolveError, SolverCapability, StopSignal};

// Job management
pub use planforge_jobs::{
    JobId, JobOrchestrator, JobStatus, OrchestratorConfig, OrchestratorError, OverflowPolicy,
};

// What-if recommendations
pub use planforge_recommend::{Recommendation, RecommendError, Recommender};

/// One-line import of the types most programs touch.
pub mod prelude {
    pub use planforge_core::{
        AssignmentDomain, EntityId, HardMediumSoftScore, HardSoftScore, PlanningProblem,
        ResourceId, Score, SimpleScore,
    };
    pub use planforge_jobs::{JobOrchestrator, JobStatus, OrchestratorConfig};
    pub use planforge_recommend::Recommender;
    pub use planforge_scoring::{Constraint, ConstraintSet, FetchPolicy, ScoreAnalyzer};
    pub use planforge_solver::{SolverCapability, StopSignal};
}
