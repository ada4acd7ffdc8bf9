//! Employee domain: records, creation input, error taxonomy and the aggregator.

pub mod aggregator;
pub mod error;
pub mod model;

pub use aggregator::EmployeeAggregator;
pub use error::{ServiceError, ServiceResult};
pub use model::{CreateEmployeeInput, Employee};
