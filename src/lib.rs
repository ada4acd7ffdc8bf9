//! Employee façade service library.

pub mod auth;
pub mod config;
pub mod employees;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod upstream;

pub use config::schema::ServiceConfig;
pub use employees::{Employee, EmployeeAggregator, ServiceError};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use upstream::{EmployeeSource, UpstreamClient, UpstreamError};
