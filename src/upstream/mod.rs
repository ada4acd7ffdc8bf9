//! Upstream provider subsystem.
//!
//! # Data Flow
//! ```text
//! EmployeeAggregator
//!     → EmployeeSource (trait seam)
//!     → client.rs (reqwest pool, deadlines, retry.rs policy)
//!     → provider HTTP API
//!     → types.rs (envelope unwrapping, record mapping)
//!     → Employee
//! ```

pub mod client;
pub mod retry;
pub mod types;

use async_trait::async_trait;

use crate::employees::{CreateEmployeeInput, Employee};

pub use client::UpstreamClient;
pub use types::{UpstreamError, UpstreamResult};

/// Source of employee records the aggregator is built on.
#[async_trait]
pub trait EmployeeSource: Send + Sync {
    /// Every employee, in provider order.
    async fn list_all(&self) -> UpstreamResult<Vec<Employee>>;

    /// One employee; `Ok(None)` when the provider confirms it does not exist.
    async fn get_by_id(&self, id: &str) -> UpstreamResult<Option<Employee>>;

    /// Create an employee and return the provider's canonical record.
    async fn create(&self, input: &CreateEmployeeInput) -> UpstreamResult<Employee>;

    /// Delete by name; `Ok(false)` when the provider did not delete anything.
    async fn delete_by_name(&self, name: &str) -> UpstreamResult<bool>;
}
