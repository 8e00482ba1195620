//! Score analysis types for detailed constraint tracking.
//!
//! These types report which constraints contribute to a score and, under
//! the full fetch policy, which entities are involved in each match.

use std::any::Any;
use std::fmt::Debug;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use planforge_core::score::Score;
use planforge_core::ConstraintRef;

/// Controls how much detail a score analysis carries.
///
/// Full analysis is `O(matches)` in result size and meant for explanation
/// UIs; shallow analysis is `O(constraints)` and meant for high-frequency
/// callers (the recommendation engine's inner loop) where only aggregates
/// matter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FetchPolicy {
    /// Collect every constraint match with its justification.
    Full,
    /// Aggregate contributions and match counts only.
    Shallow,
}

/// Reference to an entity or fact involved in a constraint match.
///
/// Uses type erasure so matches over different entity types can share a
/// single collection.
#[derive(Clone)]
pub struct EntityRef {
    /// Type name of the entity (e.g. "Shift", "Visit").
    pub type_name: String,
    /// String representation for display.
    pub display: String,
    /// Type-erased entity for programmatic access.
    entity: Arc<dyn Any + Send + Sync>,
}

impl EntityRef {
    /// Creates a new entity reference from a concrete entity.
    pub fn new<T: Clone + Debug + Send + Sync + 'static>(entity: &T) -> Self {
        Self {
            type_name: std::any::type_name::<T>().to_string(),
            display: format!("{:?}", entity),
            entity: Arc::new(entity.clone()),
        }
    }

    /// Creates an entity reference with a custom display string.
    pub fn with_display<T: Clone + Send + Sync + 'static>(entity: &T, display: String) -> Self {
        Self {
            type_name: std::any::type_name::<T>().to_string(),
            display,
            entity: Arc::new(entity.clone()),
        }
    }

    /// Attempts to downcast to the concrete entity type.
    pub fn as_entity<T: 'static>(&self) -> Option<&T> {
        self.entity.downcast_ref::<T>()
    }

    /// Returns the short type name (without module path).
    pub fn short_type_name(&self) -> &str {
        self.type_name
            .rsplit("::")
            .next()
            .unwrap_or(&self.type_name)
    }
}

impl Debug for EntityRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityRef")
            .field("type", &self.short_type_name())
            .field("display", &self.display)
            .finish()
    }
}

impl PartialEq for EntityRef {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name && self.display == other.display
    }
}

impl Eq for EntityRef {}

impl Hash for EntityRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_name.hash(state);
        self.display.hash(state);
    }
}

/// Justification for why a constraint matched.
#[derive(Debug, Clone)]
pub struct ConstraintJustification {
    /// Entities and facts involved in the match.
    pub entities: Vec<EntityRef>,
    /// Human-readable description of why the constraint matched.
    pub description: String,
}

impl ConstraintJustification {
    /// Creates a justification from entities, auto-generating a description.
    pub fn new(entities: Vec<EntityRef>) -> Self {
        let description = if entities.is_empty() {
            "No entities".to_string()
        } else {
            entities
                .iter()
                .map(|e| e.display.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };
        Self {
            entities,
            description,
        }
    }

    /// Creates a justification with a custom description.
    pub fn with_description(entities: Vec<EntityRef>, description: String) -> Self {
        Self {
            entities,
            description,
        }
    }
}

/// One concrete constraint match with its score impact.
#[derive(Debug, Clone)]
pub struct ConstraintMatch<Sc: Score> {
    /// Reference to the constraint that matched.
    pub constraint_ref: ConstraintRef,
    /// Score impact of this match (already signed by impact type).
    pub score: Sc,
    /// Justification with involved entities.
    pub justification: ConstraintJustification,
}

impl<Sc: Score> ConstraintMatch<Sc> {
    /// Creates a new constraint match.
    pub fn new(
        constraint_ref: ConstraintRef,
        score: Sc,
        justification: ConstraintJustification,
    ) -> Self {
        Self {
            constraint_ref,
            score,
            justification,
        }
    }
}

/// Per-constraint breakdown in a score analysis.
#[derive(Debug, Clone)]
pub struct ConstraintAnalysis<Sc: Score> {
    /// Constraint reference.
    pub constraint_ref: ConstraintRef,
    /// Constraint weight (signed score per unit match).
    pub weight: Sc,
    /// Aggregate score from this constraint.
    pub score: Sc,
    /// Number of matches, present under both fetch policies.
    pub match_count: usize,
    /// Concrete matches; `None` under the shallow fetch policy.
    pub matches: Option<Vec<ConstraintMatch<Sc>>>,
}

impl<Sc: Score> ConstraintAnalysis<Sc> {
    /// Returns the constraint name.
    pub fn name(&self) -> &str {
        &self.constraint_ref.name
    }
}

/// Complete score analysis with per-constraint breakdown.
#[derive(Debug, Clone)]
pub struct ScoreAnalysis<Sc: Score> {
    /// The total score.
    pub score: Sc,
    /// Per-constraint breakdown, in registration order.
    pub constraints: Vec<ConstraintAnalysis<Sc>>,
}

impl<Sc: Score> ScoreAnalysis<Sc> {
    /// Looks up the analysis of one constraint by name.
    pub fn constraint(&self, name: &str) -> Option<&ConstraintAnalysis<Sc>> {
        self.constraints.iter().find(|a| a.name() == name)
    }

    /// Returns constraints with non-zero contribution.
    pub fn non_zero_constraints(&self) -> Vec<&ConstraintAnalysis<Sc>> {
        self.constraints
            .iter()
            .filter(|a| a.score != Sc::zero())
            .collect()
    }

    /// Returns the total match count across all constraints.
    pub fn total_match_count(&self) -> usize {
        self.constraints.iter().map(|a| a.match_count).sum()
    }
}
