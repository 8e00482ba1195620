//! Core domain traits and identifiers
//!
//! A planning problem aggregates immutable facts, assignable resources and
//! planning entities. Only entity assignments are mutated during solving;
//! facts and resources stay exactly as the caller supplied them.

use std::fmt;

use crate::error::{AssignmentError, ProblemValidationError};
use crate::score::Score;

/// Stable identifier of a planning entity, unique within a problem.
///
/// Equality between entities is identifier-based; an entity's identifier
/// never changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct EntityId(String);

impl EntityId {
    /// Creates an entity identifier.
    pub fn new(id: impl Into<String>) -> Self {
        EntityId(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        EntityId::new(id)
    }
}

/// Identifier of an assignable target (employee, vehicle, crew, room).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ResourceId(String);

impl ResourceId {
    /// Creates a resource identifier.
    pub fn new(id: impl Into<String>) -> Self {
        ResourceId(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(id: &str) -> Self {
        ResourceId::new(id)
    }
}

/// A planning problem: facts, resources, entities and a current score.
///
/// The concrete type owns its facts and resources; PlanForge never mutates
/// anything but entity assignments and the score. Implementations must be
/// cheaply cloneable value types - the job registry, the score analyzer and
/// the recommendation engine all hand out copies, never live references.
///
/// # Example
///
/// ```
/// use planforge_core::{EntityId, PlanningProblem, SimpleScore};
///
/// #[derive(Clone)]
/// struct Toy {
///     assigned: Vec<(EntityId, Option<u32>)>,
///     score: Option<SimpleScore>,
/// }
///
/// impl PlanningProblem for Toy {
///     type Score = SimpleScore;
///
///     fn score(&self) -> Option<SimpleScore> {
///         self.score
///     }
///
///     fn set_score(&mut self, score: Option<SimpleScore>) {
///         self.score = score;
///     }
///
///     fn entity_ids(&self) -> Vec<EntityId> {
///         self.assigned.iter().map(|(id, _)| id.clone()).collect()
///     }
///
///     fn is_assigned(&self, entity: &EntityId) -> bool {
///         self.assigned
///             .iter()
///             .any(|(id, slot)| id == entity && slot.is_some())
///     }
/// }
/// ```
pub trait PlanningProblem: Clone + Send + Sync + 'static {
    /// The score type used to evaluate this problem.
    type Score: Score;

    /// Returns the current score, if calculated.
    fn score(&self) -> Option<Self::Score>;

    /// Sets the score of this problem.
    fn set_score(&mut self, score: Option<Self::Score>);

    /// Returns the identifiers of every planning entity, in a stable order.
    fn entity_ids(&self) -> Vec<EntityId>;

    /// Returns true if the given entity has all required assignment fields set.
    fn is_assigned(&self, entity: &EntityId) -> bool;

    /// Returns true when every entity is assigned.
    fn is_fully_assigned(&self) -> bool {
        self.entity_ids().iter().all(|e| self.is_assigned(e))
    }

    /// Checks internal consistency beyond entity-id uniqueness.
    ///
    /// Domains override this to reject problems whose entities reference
    /// missing facts or resources. Called once at job submission.
    fn validate(&self) -> Result<(), ProblemValidationError> {
        Ok(())
    }
}

/// Declared assignment capability of a problem's entity types.
///
/// This replaces annotation-driven reflection over domain fields: the
/// domain states explicitly which resources an entity may go to, how many
/// legal insertion slots each resource currently has, and how a placement
/// is carried out. The recommendation engine and construction heuristics
/// drive the domain purely through this trait.
///
/// Positions for a resource are `0..insertion_positions(resource)`, each
/// denoting one legal slot exactly once. For an ordered sequence of `k`
/// assigned entities that is typically `k + 1` (before each, and at the
/// end); for a single-occupancy resource it is 1 when free and 0 when
/// taken.
pub trait AssignmentDomain: PlanningProblem {
    /// Resources the given entity may be assigned to, in a stable order.
    fn eligible_resources(&self, entity: &EntityId) -> Vec<ResourceId>;

    /// Number of legal insertion slots the resource currently offers.
    fn insertion_positions(&self, resource: &ResourceId) -> usize;

    /// Assigns the entity to the resource at the given insertion position.
    fn assign(
        &mut self,
        entity: &EntityId,
        resource: &ResourceId,
        position: usize,
    ) -> Result<(), AssignmentError>;

    /// Clears the entity's assignment fields.
    fn unassign(&mut self, entity: &EntityId) -> Result<(), AssignmentError>;
}
