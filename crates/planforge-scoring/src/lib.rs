//! Constraint evaluation and score analysis for PlanForge.
//!
//! The constraint capability is a registered set of pure functions: each
//! [`Constraint`] maps a problem to the list of places where it matches.
//! [`ConstraintSet::evaluate`] aggregates them into a score (the cheap,
//! shallow path) and [`ScoreAnalyzer::analyze`] produces the per-constraint
//! breakdown, optionally with every concrete match (the full fetch policy).
//!
//! The analyzer itself carries no domain knowledge; verticals register
//! their rules and the analyzer only aggregates their outputs.

mod analysis;
mod analyzer;
mod set;

#[cfg(test)]
mod tests;

pub use analysis::{
    ConstraintAnalysis, ConstraintJustification, ConstraintMatch, EntityRef, FetchPolicy,
    ScoreAnalysis,
};
pub use analyzer::ScoreAnalyzer;
pub use set::{
    Constraint, ConstraintEvaluationError, ConstraintFailure, ConstraintHit, ConstraintSet,
};
