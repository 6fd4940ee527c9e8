//! Error types for Agrupar operations.
//!
//! Provides rich error context for library consumers.

use std::fmt;

/// Main error type for Agrupar operations.
///
/// Covers the two failure classes of the crate: malformed input data
/// (non-square matrices, label-count mismatches, asymmetry) and invalid
/// call-time arguments (a cluster count outside `[1, n]`).
///
/// # Examples
///
/// ```
/// use agrupar::error::AgruparError;
///
/// let err = AgruparError::InvalidInput {
///     expected: "square matrix".to_string(),
///     actual: "3x4".to_string(),
/// };
/// assert!(err.to_string().contains("invalid input"));
/// ```
#[derive(Debug)]
pub enum AgruparError {
    /// Input data violates a construction invariant.
    InvalidInput {
        /// Expected shape/property description
        expected: String,
        /// Actual shape/property found
        actual: String,
    },

    /// Invalid argument value provided at call time.
    InvalidArgument {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// Generic error with string message.
    Other(String),
}

impl fmt::Display for AgruparError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgruparError::InvalidInput { expected, actual } => {
                write!(f, "invalid input: expected {expected}, got {actual}")
            }
            AgruparError::InvalidArgument {
                param,
                value,
                constraint,
            } => {
                write!(
                    f,
                    "invalid argument: {param} = {value}, expected {constraint}"
                )
            }
            AgruparError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for AgruparError {}

impl From<&str> for AgruparError {
    fn from(msg: &str) -> Self {
        AgruparError::Other(msg.to_string())
    }
}

impl From<String> for AgruparError {
    fn from(msg: String) -> Self {
        AgruparError::Other(msg)
    }
}

impl AgruparError {
    /// Create an invalid-input error with descriptive context.
    #[must_use]
    pub fn invalid_input(expected: &str, actual: &str) -> Self {
        Self::InvalidInput {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Create an invalid-argument error for an out-of-range parameter.
    #[must_use]
    pub fn invalid_argument(param: &str, value: impl fmt::Display, constraint: &str) -> Self {
        Self::InvalidArgument {
            param: param.to_string(),
            value: value.to_string(),
            constraint: constraint.to_string(),
        }
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, AgruparError>;
