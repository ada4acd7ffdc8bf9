//! HTTP client for the upstream employee provider.
//!
//! # Responsibilities
//! - Issue list/get/create/delete calls against the provider
//! - Unwrap the `{ "data": ... }` envelope and map records
//! - Classify failures: 404 on reads is "absent", everything else is an error
//! - Enforce per-call deadlines; retries only when the policy allows

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::config::UpstreamConfig;
use crate::employees::{CreateEmployeeInput, Employee};
use crate::observability::metrics;
use crate::upstream::retry::RetryPolicy;
use crate::upstream::types::{
    employee_from_record, employees_from_data, Envelope, UpstreamError, UpstreamResult,
};
use crate::upstream::EmployeeSource;

/// Pooled HTTP client bound to one provider base URL.
#[derive(Clone)]
pub struct UpstreamClient {
    http: Client,
    base_url: Url,
    retry: RetryPolicy,
    timeout_secs: u64,
}

#[derive(Serialize)]
struct DeleteByName<'a> {
    name: &'a str,
}

impl UpstreamClient {
    /// Create a new client.
    ///
    /// Fails if the base URL is unusable or the connection pool cannot be built.
    pub fn new(config: UpstreamConfig) -> UpstreamResult<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| UpstreamError::InvalidUrl(format!("'{}': {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(UpstreamError::InvalidUrl(format!(
                "'{}' cannot address single records",
                config.base_url
            )));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .build()
            .map_err(UpstreamError::Transport)?;

        tracing::info!(
            base_url = %base_url,
            timeout_secs = config.request_timeout_secs,
            retries_enabled = config.retry.enabled,
            "Upstream client initialized"
        );

        Ok(Self {
            http,
            base_url,
            retry: RetryPolicy::new(config.retry),
            timeout_secs: config.request_timeout_secs,
        })
    }

    /// The collection URL this client talks to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetch the full employee collection.
    pub async fn list_all(&self) -> UpstreamResult<Vec<Employee>> {
        let url = self.base_url.clone();
        tracing::debug!(url = %url, "Fetching all employees from upstream");

        let response = self.send("list", || self.http.get(url.clone())).await?;
        let envelope = self.read_envelope(response, &url).await?;
        employees_from_data(envelope.data)
    }

    /// Fetch one employee. `Ok(None)` means upstream reported it absent.
    pub async fn get_by_id(&self, id: &str) -> UpstreamResult<Option<Employee>> {
        let url = self.record_url(id)?;
        tracing::debug!(url = %url, id = %id, "Fetching employee from upstream");

        let response = self.send("get", || self.http.get(url.clone())).await?;
        if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!(id = %id, "Upstream reports employee absent");
            return Ok(None);
        }

        let envelope = self.read_envelope(response, &url).await?;
        match envelope.data {
            Value::Null => Ok(None),
            record => employee_from_record(&record).map(Some),
        }
    }

    /// Create an employee; upstream assigns `id` and `email`.
    pub async fn create(&self, input: &CreateEmployeeInput) -> UpstreamResult<Employee> {
        let url = self.base_url.clone();
        tracing::debug!(name = %input.name, "Creating employee upstream");

        let response = self
            .send("create", || self.http.post(url.clone()).json(input))
            .await?;
        let envelope = self.read_envelope(response, &url).await?;
        employee_from_record(&envelope.data)
    }

    /// Delete an employee by name. Returns whether upstream confirmed the delete.
    pub async fn delete_by_name(&self, name: &str) -> UpstreamResult<bool> {
        let url = self.base_url.clone();
        tracing::debug!(name = %name, "Deleting employee upstream");

        let body = DeleteByName { name };
        let response = self
            .send("delete", || self.http.delete(url.clone()).json(&body))
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!(name = %name, "Upstream has no employee to delete");
            return Ok(false);
        }

        let envelope = self.read_envelope(response, &url).await?;
        Ok(envelope.data == Value::Bool(true))
    }

    fn record_url(&self, id: &str) -> UpstreamResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| UpstreamError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }

    /// Send a request built by `build`, retrying per policy.
    ///
    /// Any received response is returned as-is; status handling belongs to the caller.
    /// Writes are only re-sent when the provider cannot have acted on them.
    async fn send<F>(&self, operation: &'static str, build: F) -> UpstreamResult<Response>
    where
        F: Fn() -> RequestBuilder,
    {
        let started = Instant::now();
        let mut attempt = 0;

        loop {
            attempt += 1;

            let request = build().build().map_err(UpstreamError::Transport)?;
            let method = request.method().clone();

            match self.http.execute(request).await {
                Ok(response) => {
                    let status = response.status();
                    if self.retry.should_retry(&method, attempt, Some(status), false) {
                        let delay = self.retry.backoff(attempt);
                        tracing::info!(operation, attempt, status = %status, delay = ?delay, "Retrying upstream call");
                        tokio::time::sleep(delay).await;
                        continue;
                    }

                    metrics::record_upstream_call(operation, status.as_str(), started);
                    return Ok(response);
                }
                Err(e) => {
                    if self.retry.should_retry(&method, attempt, None, e.is_connect()) {
                        let delay = self.retry.backoff(attempt);
                        tracing::info!(operation, attempt, error = %e, delay = ?delay, "Retrying upstream call after transport error");
                        tokio::time::sleep(delay).await;
                        continue;
                    }

                    let err = self.classify(e);
                    let outcome = match err {
                        UpstreamError::Timeout(_) => "timeout",
                        _ => "transport",
                    };
                    metrics::record_upstream_call(operation, outcome, started);
                    tracing::debug!(operation, attempt, error = %err, "Upstream call failed");
                    return Err(err);
                }
            }
        }
    }

    /// Check status and decode the envelope of a response.
    async fn read_envelope(&self, response: Response, url: &Url) -> UpstreamResult<Envelope> {
        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let bytes = response.bytes().await.map_err(|e| self.classify(e))?;
        Envelope::from_slice(&bytes)
    }

    fn classify(&self, error: reqwest::Error) -> UpstreamError {
        if error.is_timeout() {
            UpstreamError::Timeout(self.timeout_secs)
        } else {
            UpstreamError::Transport(error)
        }
    }
}

#[async_trait]
impl EmployeeSource for UpstreamClient {
    async fn list_all(&self) -> UpstreamResult<Vec<Employee>> {
        UpstreamClient::list_all(self).await
    }

    async fn get_by_id(&self, id: &str) -> UpstreamResult<Option<Employee>> {
        UpstreamClient::get_by_id(self, id).await
    }

    async fn create(&self, input: &CreateEmployeeInput) -> UpstreamResult<Employee> {
        UpstreamClient::create(self, input).await
    }

    async fn delete_by_name(&self, name: &str) -> UpstreamResult<bool> {
        UpstreamClient::delete_by_name(self, name).await
    }
}

impl std::fmt::Debug for UpstreamClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamClient")
            .field("base_url", &self.base_url.as_str())
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
