//! Transport-level retry policy for upstream calls.
//!
//! # Design Decisions
//! - Off by default; a single failure surfaces immediately
//! - Only connection failures and 429/502/503 are retried
//! - POST/DELETE are retried only when the provider never handled them
//!   (connection failure or 429); a 502/503 may follow a committed write
//! - Jittered backoff prevents thundering herd against the provider

use std::time::Duration;

use rand::Rng;
use reqwest::{Method, StatusCode};

use crate::config::RetryConfig;

/// Decides whether and when an upstream call is attempted again.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Whether attempt number `attempt` (1-based) may be followed by another.
    ///
    /// `status` is `None` when the request failed before a response arrived.
    pub fn should_retry(
        &self,
        method: &Method,
        attempt: u32,
        status: Option<StatusCode>,
        connect_error: bool,
    ) -> bool {
        if !self.config.enabled || attempt >= self.config.max_attempts {
            return false;
        }
        match status {
            Some(StatusCode::TOO_MANY_REQUESTS) => true,
            Some(status) => method.is_safe() && is_retryable_status(status),
            None => connect_error,
        }
    }

    /// Delay before the attempt following `attempt`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        calculate_backoff(attempt, self.config.base_delay_ms, self.config.max_delay_ms)
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS | StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE
    )
}

/// Calculate exponential backoff delay with jitter.
pub fn calculate_backoff(attempt: u32, base_ms: u64, max_ms: u64) -> Duration {
    if attempt == 0 {
        return Duration::from_millis(0);
    }

    let exponential_base = 2u64.saturating_pow(attempt - 1);
    let delay_ms = base_ms.saturating_mul(exponential_base);
    let capped_delay = delay_ms.min(max_ms);

    // Jitter: 0 to 10% of the delay
    let jitter_range = capped_delay / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(capped_delay + jitter)
}
