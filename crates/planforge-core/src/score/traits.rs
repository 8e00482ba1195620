//! Core Score trait definition

use std::cmp::Ordering;
use std::fmt::{Debug, Display};
use std::ops::{Add, Neg, Sub};

use super::ScoreLevel;

/// Core trait for all score types in PlanForge.
///
/// Scores represent the quality of a planning solution. They are used to:
/// - Compare solutions (better/worse/equal)
/// - Decide feasibility
/// - Rank recommendation candidates
///
/// All score implementations must be:
/// - Immutable (operations return new instances)
/// - Thread-safe (`Send + Sync`)
/// - Totally ordered
///
/// # Score Levels
///
/// Scores can have multiple levels (e.g. hard/soft constraints). When
/// comparing scores, higher-priority levels are compared first; two scores
/// are equal only when every level matches.
pub trait Score:
    Copy
    + Debug
    + Display
    + Default
    + Send
    + Sync
    + PartialEq
    + Eq
    + PartialOrd
    + Ord
    + Add<Output = Self>
    + Sub<Output = Self>
    + Neg<Output = Self>
    + 'static
{
    /// Returns true if this score represents a feasible solution.
    ///
    /// A solution is feasible when all hard constraints are satisfied,
    /// i.e. every level above the lowest is >= 0.
    fn is_feasible(&self) -> bool;

    /// Returns the zero score (identity element for addition).
    fn zero() -> Self;

    /// Returns the number of score levels.
    fn levels_count() -> usize;

    /// Returns the score values as a vector of i64, highest priority first.
    ///
    /// For `HardSoftScore`: `[hard, soft]`.
    fn to_level_numbers(&self) -> Vec<i64>;

    /// Creates a score from level numbers.
    ///
    /// # Panics
    /// Panics if the number of levels doesn't match [`Score::levels_count`].
    fn from_level_numbers(levels: &[i64]) -> Self;

    /// Multiplies every level of this score by an integer factor.
    ///
    /// Used to apply a constraint weight once per match.
    fn scale(&self, factor: i64) -> Self;

    /// Returns the semantic label for the score level at the given index.
    ///
    /// Level indices follow the same order as [`Score::to_level_numbers`]:
    /// highest priority first.
    ///
    /// # Panics
    /// Panics if `index >= levels_count()`.
    fn level_label(index: usize) -> ScoreLevel;

    /// Compares two scores, returning the ordering.
    fn compare(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }

    /// Returns true if this score is better than the other.
    ///
    /// "Better" means greater under the lexicographic level order.
    fn is_better_than(&self, other: &Self) -> bool {
        self > other
    }
}
