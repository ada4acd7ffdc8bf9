//! Error taxonomy for employee operations.

use thiserror::Error;

use crate::upstream::UpstreamError;

/// Result type for employee operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced by [`crate::employees::EmployeeAggregator`].
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Talking to the upstream provider failed.
    #[error("{operation} failed: {source}")]
    Upstream {
        operation: String,
        #[source]
        source: UpstreamError,
    },

    /// Upstream confirmed there is no such employee.
    #[error("no employee with id {id}")]
    NotFound { id: String },

    /// Caller-supplied creation fields are missing or mistyped.
    #[error("invalid employee input: {0}")]
    Validation(String),

    /// The employee exists but upstream refused to delete it.
    #[error("employee {id} ({name}) is present but delete was rejected by upstream")]
    DeletionFailed { id: String, name: String },
}

impl ServiceError {
    /// Wrap an upstream failure with the operation that hit it.
    pub fn upstream(operation: impl Into<String>, source: UpstreamError) -> Self {
        Self::Upstream {
            operation: operation.into(),
            source,
        }
    }

    /// Stable machine-readable kind, used in response bodies and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Upstream { .. } => "upstream_error",
            Self::NotFound { .. } => "not_found",
            Self::Validation(_) => "validation_error",
            Self::DeletionFailed { .. } => "deletion_failed",
        }
    }

    /// True when the underlying upstream call ran out of time.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::Upstream {
                source: UpstreamError::Timeout(_),
                ..
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ServiceError::NotFound { id: "99".into() };
        assert_eq!(err.to_string(), "no employee with id 99");

        let err = ServiceError::upstream("fetch all employees", UpstreamError::Timeout(10));
        assert_eq!(
            err.to_string(),
            "fetch all employees failed: upstream call timed out after 10 seconds"
        );
        assert!(err.is_timeout());
        assert_eq!(err.kind(), "upstream_error");
    }
}
