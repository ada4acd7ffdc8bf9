//! Authentication collaborator.
//!
//! # Data Flow
//! ```text
//! POST /api/v1/auth/token
//!     → jwt.rs (check configured credentials, sign token)
//!
//! Protected request
//!     → middleware.rs (extract bearer token)
//!     → jwt.rs (validate signature, expiry, issuer)
//!     → Identity in request extensions → handler
//! ```
//!
//! The employee core performs no authentication of its own.

pub mod errors;
pub mod jwt;
pub mod middleware;

pub use errors::{AuthError, AuthResult};
pub use jwt::{TokenResponse, TokenService};
pub use middleware::{require_bearer, Identity};
