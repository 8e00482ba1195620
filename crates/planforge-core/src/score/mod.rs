//! Score types for representing solution quality
//!
//! Scores compare solutions lexicographically, most restrictive level first.
//! All score types are immutable and implement arithmetic operations.

mod hard_medium_soft;
mod hard_soft;
mod simple;
mod traits;

#[cfg(test)]
mod tests;

pub use hard_medium_soft::HardMediumSoftScore;
pub use hard_soft::HardSoftScore;
pub use simple::SimpleScore;
pub use traits::Score;

/// Score level representing different constraint priorities.
///
/// Maps to the semantic meaning of each level index within a [`Score`].
/// Used by [`Score::level_label`] to classify what a given level index
/// represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreLevel {
    /// Hard constraints - must be satisfied for feasibility.
    Hard,
    /// Medium constraints - secondary priority.
    Medium,
    /// Soft constraints - optimization objectives.
    Soft,
}
