use thiserror::Error;

use crate::operator::Capability;

/// Unified error type for `fpmrs` operations.
///
/// Every variant is raised eagerly, before any operator evaluation. Running out
/// of iterations without meeting the tolerance is not an error.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FixedPointError {
    /// Raised when call-site input is malformed (empty operator list, empty
    /// initial point, non-positive tolerance, unrecognized option, ...).
    #[error("invalid argument in {context}: {reason}")]
    InvalidArgument {
        /// Human-readable context describing the operation.
        context: &'static str,
        /// What was wrong with the supplied value.
        reason: String,
    },

    /// Raised when an operator does not declare the required capability level.
    #[error("expected {expected}, but got {found}")]
    TypeMismatch {
        /// The capability level the caller requires.
        expected: Capability,
        /// Concrete type of the operator and the capability it declares.
        found: String,
    },

    /// Raised when declared vector dimensions conflict.
    #[error("expected {expected}-dimensional vector, but got {found}-dimensional one")]
    DimensionMismatch {
        /// The dimension declared by the operator.
        expected: usize,
        /// The dimension that was actually supplied.
        found: usize,
    },

    /// Raised when an unknown algorithm name is requested.
    #[error("unknown algorithm `{method}` is specified")]
    UnsupportedMethod { method: String },
}

impl FixedPointError {
    /// Helper to format an [`InvalidArgument`](FixedPointError::InvalidArgument) error.
    pub fn invalid_argument(context: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            context,
            reason: reason.into(),
        }
    }

    /// Helper to format a [`DimensionMismatch`](FixedPointError::DimensionMismatch) error.
    pub fn dimension_mismatch(expected: usize, found: usize) -> Self {
        Self::DimensionMismatch { expected, found }
    }

    /// Helper to format a [`TypeMismatch`](FixedPointError::TypeMismatch) error.
    pub fn type_mismatch(expected: Capability, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected,
            found: found.into(),
        }
    }
}

/// Type alias for results returned by this crate.
pub type Result<T> = std::result::Result<T, FixedPointError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_both_sides() {
        let err = FixedPointError::dimension_mismatch(10, 15);
        assert_eq!(
            err.to_string(),
            "expected 10-dimensional vector, but got 15-dimensional one"
        );

        let err = FixedPointError::type_mismatch(Capability::MetricProjection, "Identity");
        assert!(err.to_string().starts_with("expected MetricProjection,"));
    }
}
