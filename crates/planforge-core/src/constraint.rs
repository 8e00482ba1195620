//! Constraint identity types.
//!
//! Shared between the scoring layer (which evaluates constraints) and the
//! analysis DTOs (which report per-constraint contributions).

/// Reference to a constraint for identification.
///
/// # Example
///
/// ```
/// use planforge_core::ConstraintRef;
///
/// let cr = ConstraintRef::new("crew-scheduling", "NoOverlap");
/// assert_eq!(cr.full_name(), "crew-scheduling/NoOverlap");
///
/// let simple = ConstraintRef::new("", "Simple");
/// assert_eq!(simple.full_name(), "Simple");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstraintRef {
    /// Package/vertical containing the constraint.
    pub package: String,
    /// Name of the constraint.
    pub name: String,
}

impl ConstraintRef {
    /// Creates a new constraint reference.
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            name: name.into(),
        }
    }

    /// Returns the fully qualified name.
    pub fn full_name(&self) -> String {
        if self.package.is_empty() {
            self.name.clone()
        } else {
            format!("{}/{}", self.package, self.name)
        }
    }
}

/// Type of impact a constraint has on the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ImpactType {
    /// Penalize (subtract from the score).
    Penalty,
    /// Reward (add to the score).
    Reward,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_ref_full_name() {
        let cr = ConstraintRef::new("vehicle-routing", "VehicleCapacity");
        assert_eq!(cr.full_name(), "vehicle-routing/VehicleCapacity");
    }

    #[test]
    fn test_constraint_ref_empty_package() {
        let cr = ConstraintRef::new("", "Simple");
        assert_eq!(cr.full_name(), "Simple");
    }
}
