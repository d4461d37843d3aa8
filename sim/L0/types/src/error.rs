//! Error types for articulated-body operations.

use thiserror::Error;

/// Errors that can occur while building or simulating a skeleton.
///
/// Every error aborts only the operation that produced it. State that was
/// consistent before the call stays consistent after it.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ArticError {
    /// A frame could not resolve a required ancestor (for example an
    /// end-effector whose reference chain never reaches a body node).
    #[error("structural error: {reason}")]
    Structural {
        /// Description of the broken structure.
        reason: String,
    },

    /// A vector's length disagrees with a joint's or skeleton's arity.
    #[error("dimension mismatch in {context}: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// What was being assigned.
        context: String,
        /// Required length.
        expected: usize,
        /// Supplied length.
        actual: usize,
    },

    /// Geometric input (axes, planes) that cannot form a usable basis.
    #[error("degenerate geometry: {reason}")]
    DegenerateGeometry {
        /// Description of the degeneracy.
        reason: String,
    },

    /// Invalid mass properties.
    #[error("invalid mass properties: {reason}")]
    InvalidMassProperties {
        /// Description of what's wrong.
        reason: String,
    },

    /// Invalid timestep.
    #[error("invalid timestep: {0} (must be positive and finite)")]
    InvalidTimestep(f64),

    /// Invalid configuration.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the configuration error.
        reason: String,
    },

    /// No factory registered under the requested joint type name.
    #[error("unknown joint type: {name}")]
    UnknownJointType {
        /// The requested type name.
        name: String,
    },

    /// Body node index out of range for its skeleton.
    #[error("invalid body node: {0}")]
    InvalidBodyNode(usize),

    /// End-effector index out of range for its skeleton.
    #[error("invalid end-effector: {0}")]
    InvalidEndEffector(usize),

    /// Skeleton id not present in the world.
    #[error("invalid skeleton: {0}")]
    InvalidSkeleton(u64),

    /// The joint-space mass matrix is not positive definite.
    #[error("mass matrix of skeleton '{skeleton}' is not positive definite")]
    SingularMassMatrix {
        /// Name of the offending skeleton.
        skeleton: String,
    },

    /// Simulation diverged (`NaN` or `Inf` detected).
    #[error("simulation diverged: {reason}")]
    Diverged {
        /// Description of what went wrong.
        reason: String,
    },
}

impl ArticError {
    /// Create a structural error.
    #[must_use]
    pub fn structural(reason: impl Into<String>) -> Self {
        Self::Structural {
            reason: reason.into(),
        }
    }

    /// Create a dimension mismatch error.
    #[must_use]
    pub fn dimension_mismatch(context: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            context: context.into(),
            expected,
            actual,
        }
    }

    /// Create a degenerate geometry error.
    #[must_use]
    pub fn degenerate(reason: impl Into<String>) -> Self {
        Self::DegenerateGeometry {
            reason: reason.into(),
        }
    }

    /// Create an invalid mass properties error.
    #[must_use]
    pub fn invalid_mass(reason: impl Into<String>) -> Self {
        Self::InvalidMassProperties {
            reason: reason.into(),
        }
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Create a diverged error.
    #[must_use]
    pub fn diverged(reason: impl Into<String>) -> Self {
        Self::Diverged {
            reason: reason.into(),
        }
    }

    /// Check if this is a structural error.
    #[must_use]
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::Structural { .. })
    }

    /// Check if this is a dimension mismatch.
    #[must_use]
    pub fn is_dimension_mismatch(&self) -> bool {
        matches!(self, Self::DimensionMismatch { .. })
    }

    /// Check if this is a degenerate geometry error.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        matches!(self, Self::DegenerateGeometry { .. })
    }

    /// Check if this is a divergence error.
    #[must_use]
    pub fn is_diverged(&self) -> bool {
        matches!(self, Self::Diverged { .. })
    }
}
