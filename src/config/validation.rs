//! Configuration validation.
//!
//! Serde handles syntax; this module checks value ranges and formats.
//! Every problem is reported, not just the first one.

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::ServiceConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field, e.g. `upstream.base_url`.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "server.bind_address",
            format!("'{}' is not a socket address", config.server.bind_address),
        ));
    }
    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::new("server.request_timeout_secs", "must be > 0"));
    }

    let upstream = &config.upstream;
    match url::Url::parse(&upstream.base_url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError::new(
            "upstream.base_url",
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new("upstream.base_url", e.to_string())),
    }
    if upstream.request_timeout_secs == 0 {
        errors.push(ValidationError::new("upstream.request_timeout_secs", "must be > 0"));
    }
    if upstream.connect_timeout_secs == 0 {
        errors.push(ValidationError::new("upstream.connect_timeout_secs", "must be > 0"));
    }
    if upstream.retry.max_attempts == 0 {
        errors.push(ValidationError::new("upstream.retry.max_attempts", "must be >= 1"));
    }
    if upstream.retry.base_delay_ms > upstream.retry.max_delay_ms {
        errors.push(ValidationError::new(
            "upstream.retry.base_delay_ms",
            "must not exceed max_delay_ms",
        ));
    }

    if config.auth.username.trim().is_empty() {
        errors.push(ValidationError::new("auth.username", "must not be empty"));
    }
    if config.auth.jwt_secret.is_empty() {
        errors.push(ValidationError::new("auth.jwt_secret", "must not be empty"));
    }
    if config.auth.token_ttl_secs == 0 {
        errors.push(ValidationError::new("auth.token_ttl_secs", "must be > 0"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
