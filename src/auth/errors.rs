//! Error types for the authentication module.

use thiserror::Error;

/// Result type for auth operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Authentication errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Username/password pair does not match the configured identity
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No bearer token on a protected request
    #[error("Missing bearer token")]
    MissingToken,

    /// JWT token is malformed
    #[error("Malformed token")]
    MalformedToken,

    /// JWT token has expired
    #[error("Token expired")]
    TokenExpired,

    /// JWT signature is invalid
    #[error("Invalid token signature")]
    InvalidSignature,

    /// Signing failed
    #[error("Token generation failed")]
    TokenGenerationFailed,
}
