//! Employee records and the validated creation input.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::employees::error::{ServiceError, ServiceResult};

/// An employee as exposed to callers of this service.
///
/// `id` and `email` are always assigned by the upstream provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub salary: u32,
    pub age: u32,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Fields accepted when creating an employee.
///
/// Also the exact payload sent upstream; `email` is deliberately absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateEmployeeInput {
    pub name: String,
    pub salary: u32,
    pub age: u32,
    pub title: String,
}

impl CreateEmployeeInput {
    /// Validate a loosely-typed JSON field bag.
    ///
    /// Unknown keys are ignored. Missing keys, wrong JSON types, negative or
    /// fractional numbers and blank names are rejected.
    pub fn from_fields(fields: Value) -> ServiceResult<Self> {
        if !fields.is_object() {
            return Err(ServiceError::Validation(
                "expected a JSON object with name, salary, age and title".to_string(),
            ));
        }

        let input: Self = serde_json::from_value(fields)
            .map_err(|e| ServiceError::Validation(e.to_string()))?;

        if input.name.trim().is_empty() {
            return Err(ServiceError::Validation("name must not be empty".to_string()));
        }

        Ok(input)
    }
}
