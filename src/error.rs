//! Error types for the market-analytics library.

use crate::models::glm::FittedModel;
use thiserror::Error;

/// Result type alias for analytics operations.
pub type Result<T> = std::result::Result<T, AnalyticsError>;

/// Broad classification of an [`AnalyticsError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or inconsistent input, rejected before any computation.
    InvalidInput,
    /// An iterative fit exhausted its iteration budget.
    Convergence,
}

/// Errors that can occur while computing metrics or fitting models.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Insufficient observations for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Index out of bounds.
    #[error("index out of bounds: {index} (size: {size})")]
    IndexOutOfBounds { index: usize, size: usize },

    /// A cluster label has no corresponding center.
    #[error("no center supplied for cluster label {0}")]
    UnknownLabel(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Timestamps are not strictly increasing or not finite.
    #[error("invalid timestamps: {0}")]
    InvalidTimestamps(String),

    /// Weighted normal equations could not be solved.
    #[error("weighted normal equations are singular")]
    SingularSystem,

    /// IRLS did not reach tolerance within the iteration budget.
    #[error("fit did not converge after {iterations} iterations")]
    NotConverged {
        iterations: usize,
        last: Box<FittedModel>,
    },
}

impl AnalyticsError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalyticsError::NotConverged { .. } => ErrorKind::Convergence,
            _ => ErrorKind::InvalidInput,
        }
    }

    /// The last IRLS iterate, if this is a convergence failure.
    pub fn last_iterate(&self) -> Option<&FittedModel> {
        match self {
            AnalyticsError::NotConverged { last, .. } => Some(last),
            _ => None,
        }
    }

    /// Consume the error and take the last IRLS iterate, if any.
    pub fn into_last_iterate(self) -> Option<FittedModel> {
        match self {
            AnalyticsError::NotConverged { last, .. } => Some(*last),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_descriptive() {
        let err = AnalyticsError::EmptyData;
        assert_eq!(err.to_string(), "empty input data");

        let err = AnalyticsError::InsufficientData { needed: 5, got: 3 };
        assert_eq!(err.to_string(), "insufficient data: need at least 5, got 3");

        let err = AnalyticsError::InvalidParameter("period must be positive".to_string());
        assert_eq!(err.to_string(), "invalid parameter: period must be positive");

        let err = AnalyticsError::DimensionMismatch {
            expected: 3,
            got: 2,
        };
        assert_eq!(err.to_string(), "dimension mismatch: expected 3, got 2");

        let err = AnalyticsError::UnknownLabel("\"B\"".to_string());
        assert_eq!(err.to_string(), "no center supplied for cluster label \"B\"");
    }

    #[test]
    fn input_errors_classify_as_invalid_input() {
        assert_eq!(AnalyticsError::EmptyData.kind(), ErrorKind::InvalidInput);
        assert_eq!(AnalyticsError::SingularSystem.kind(), ErrorKind::InvalidInput);
        assert_eq!(
            AnalyticsError::IndexOutOfBounds { index: 4, size: 4 }.kind(),
            ErrorKind::InvalidInput
        );
        assert!(AnalyticsError::EmptyData.last_iterate().is_none());
    }

    #[test]
    fn errors_are_clonable_and_comparable() {
        let err1 = AnalyticsError::SingularSystem;
        let err2 = err1.clone();
        assert_eq!(err1, err2);
    }
}
