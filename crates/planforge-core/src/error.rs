//! Error types for PlanForge core

use thiserror::Error;

use crate::domain::{EntityId, ResourceId};

/// Error raised by [`AssignmentDomain`](crate::AssignmentDomain) operations.
#[derive(Debug, Clone, Error)]
pub enum AssignmentError {
    /// The problem contains no entity with this identifier.
    #[error("unknown entity `{0}`")]
    UnknownEntity(EntityId),

    /// The problem contains no resource with this identifier.
    #[error("unknown resource `{0}`")]
    UnknownResource(ResourceId),

    /// The insertion position does not exist on the resource.
    #[error("position {position} out of range for resource `{resource}` ({slots} slots)")]
    PositionOutOfRange {
        resource: ResourceId,
        position: usize,
        slots: usize,
    },

    /// The entity already has an assignment; unassign it first.
    #[error("entity `{0}` is already assigned")]
    AlreadyAssigned(EntityId),

    /// The entity has no assignment to clear.
    #[error("entity `{0}` is not assigned")]
    NotAssigned(EntityId),
}

/// A problem failed its consistency check at submission.
#[derive(Debug, Clone, Error)]
#[error("invalid problem: {0}")]
pub struct ProblemValidationError(pub String);

impl ProblemValidationError {
    /// Creates a validation error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        ProblemValidationError(message.into())
    }
}
