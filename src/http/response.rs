//! Error-to-response mapping.
//!
//! | error                 | status |
//! |-----------------------|--------|
//! | validation            | 400    |
//! | auth                  | 401    |
//! | not found             | 404    |
//! | deletion rejected     | 409    |
//! | upstream failure      | 502    |
//! | upstream timeout      | 504    |
//!
//! Errors are logged here, once, at the boundary.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::AuthError;
use crate::employees::ServiceError;

/// JSON body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
    pub code: String,
}

impl ErrorBody {
    fn new(error: impl Into<String>, code: &str) -> Self {
        Self {
            error: error.into(),
            code: code.to_string(),
        }
    }
}

/// Status code a service error is reported with.
pub fn status_for(error: &ServiceError) -> StatusCode {
    match error {
        ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
        ServiceError::DeletionFailed { .. } => StatusCode::CONFLICT,
        ServiceError::Upstream { .. } if error.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
        ServiceError::Upstream { .. } => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = status_for(&self);

        // Upstream details stay in the logs.
        let message = match &self {
            ServiceError::Upstream { operation, .. } => {
                tracing::error!(status = status.as_u16(), error = %self, "Upstream failure");
                format!("{operation} failed: upstream provider unavailable")
            }
            _ => {
                tracing::warn!(status = status.as_u16(), error = %self, "Request failed");
                self.to_string()
            }
        };

        (status, Json(ErrorBody::new(message, self.kind()))).into_response()
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match self {
            AuthError::TokenGenerationFailed => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        };
        (status, Json(ErrorBody::new(self.to_string(), "unauthorized"))).into_response()
    }
}
