//! Upstream wire types, record mapping and error definitions.

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::employees::Employee;

/// Errors that can occur while talking to the upstream provider.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Connection or protocol failure.
    #[error("upstream transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The call did not complete within the configured deadline.
    #[error("upstream call timed out after {0} seconds")]
    Timeout(u64),

    /// Upstream answered with an unexpected status code.
    #[error("upstream returned status {status} for {url}")]
    Status { status: u16, url: String },

    /// The response body is not a `{ "data": ... }` envelope of the expected shape.
    #[error("malformed upstream envelope: {0}")]
    MalformedEnvelope(String),

    /// A record inside the envelope is missing a field or has the wrong type.
    #[error("cannot map upstream field '{field}': {reason}")]
    Mapping { field: &'static str, reason: String },

    /// The configured base URL cannot address single records.
    #[error("invalid upstream URL: {0}")]
    InvalidUrl(String),
}

/// Result type for upstream operations.
pub type UpstreamResult<T> = Result<T, UpstreamError>;

/// Response wrapper used by every upstream operation.
///
/// Other envelope members (such as `status`) are ignored.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    pub data: Value,
}

impl Envelope {
    pub fn from_slice(bytes: &[u8]) -> UpstreamResult<Self> {
        serde_json::from_slice(bytes).map_err(|e| UpstreamError::MalformedEnvelope(e.to_string()))
    }
}

/// Map a list payload into employees, failing on the first bad record.
pub fn employees_from_data(data: Value) -> UpstreamResult<Vec<Employee>> {
    match data {
        Value::Array(records) => records.iter().map(employee_from_record).collect(),
        other => Err(UpstreamError::MalformedEnvelope(format!(
            "expected an array under 'data', found {}",
            json_type(&other)
        ))),
    }
}

/// Map one upstream record (`employee_name`, `employee_salary`, ...) into an [`Employee`].
pub fn employee_from_record(record: &Value) -> UpstreamResult<Employee> {
    let fields = record.as_object().ok_or_else(|| {
        UpstreamError::MalformedEnvelope(format!(
            "expected an employee object, found {}",
            json_type(record)
        ))
    })?;

    Ok(Employee {
        id: string_field(fields, "id")?,
        name: string_field(fields, "employee_name")?,
        salary: int_field(fields, "employee_salary")?,
        age: int_field(fields, "employee_age")?,
        title: string_field(fields, "employee_title")?,
        email: optional_string_field(fields, "employee_email")?,
    })
}

fn string_field(fields: &Map<String, Value>, field: &'static str) -> UpstreamResult<String> {
    match fields.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(mapping(field, format!("expected string, found {}", json_type(other)))),
        None => Err(mapping(field, "missing")),
    }
}

fn optional_string_field(
    fields: &Map<String, Value>,
    field: &'static str,
) -> UpstreamResult<Option<String>> {
    match fields.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(mapping(field, format!("expected string, found {}", json_type(other)))),
    }
}

/// Accepts any JSON number without a fractional part that fits in `u32`.
fn int_field(fields: &Map<String, Value>, field: &'static str) -> UpstreamResult<u32> {
    let number = match fields.get(field) {
        Some(Value::Number(n)) => n,
        Some(other) => {
            return Err(mapping(field, format!("expected number, found {}", json_type(other))))
        }
        None => return Err(mapping(field, "missing")),
    };

    if let Some(n) = number.as_u64() {
        return u32::try_from(n).map_err(|_| mapping(field, format!("{n} is out of range")));
    }

    match number.as_f64() {
        Some(f) if f.fract() == 0.0 && f >= 0.0 && f <= f64::from(u32::MAX) => Ok(f as u32),
        _ => Err(mapping(field, format!("{number} is not a non-negative integer"))),
    }
}

fn mapping(field: &'static str, reason: impl Into<String>) -> UpstreamError {
    UpstreamError::Mapping {
        field,
        reason: reason.into(),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
