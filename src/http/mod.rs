//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID, span, metrics)
//!     → auth middleware (protected routes)
//!     → employees.rs / auth.rs / health.rs (handlers)
//!     → response.rs (error → status code)
//!     → Send to client
//! ```

pub mod auth;
pub mod employees;
pub mod health;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::ErrorBody;
pub use server::{AppState, HttpServer};
