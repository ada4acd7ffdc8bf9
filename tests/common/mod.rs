//! Shared utilities for integration testing.
//!
//! [`MockUpstream`] is an in-process stand-in for the employee provider. It
//! speaks the provider's wire format (`{ "status", "data" }` envelopes and
//! `employee_*` record keys) and can be told to misbehave.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use employee_api::config::ServiceConfig;

#[derive(Default)]
pub struct MockState {
    pub records: Mutex<Vec<Value>>,
    /// Status every call answers with, when set.
    pub fail_with: Mutex<Option<u16>>,
    /// Body returned by list calls instead of the records, when set.
    pub raw_list_body: Mutex<Option<String>>,
    /// Body returned by single-record reads instead of the record, when set.
    pub raw_record_body: Mutex<Option<String>>,
    /// Statuses for upcoming calls, consumed one per call.
    pub pending_failures: Mutex<VecDeque<u16>>,
    pub delay_ms: AtomicU64,
    pub reject_deletes: AtomicBool,
    pub list_calls: AtomicUsize,
    pub get_calls: AtomicUsize,
    pub create_calls: AtomicUsize,
    pub delete_calls: AtomicUsize,
    pub created: Mutex<Vec<Value>>,
}

#[derive(Clone)]
pub struct MockUpstream {
    pub addr: SocketAddr,
    pub state: Arc<MockState>,
}

impl MockUpstream {
    /// Start a provider on an ephemeral port, seeded with `records`.
    pub async fn start(records: Vec<Value>) -> Self {
        let state = Arc::new(MockState::default());
        *state.records.lock().unwrap() = records;

        let app = Router::new()
            .route(
                "/api/v1/employee",
                get(list).post(create).delete(delete_by_name),
            )
            .route("/api/v1/employee/{id}", get(get_one))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, state }
    }

    /// Start a provider holding the four-employee listing.
    pub async fn with_staff() -> Self {
        Self::start(staff()).await
    }

    pub fn base_url(&self) -> String {
        format!("http://{}/api/v1/employee", self.addr)
    }

    pub fn fail_with(&self, status: u16) {
        *self.state.fail_with.lock().unwrap() = Some(status);
    }

    pub fn serve_raw_list(&self, body: &str) {
        *self.state.raw_list_body.lock().unwrap() = Some(body.to_string());
    }

    pub fn serve_raw_record(&self, body: &str) {
        *self.state.raw_record_body.lock().unwrap() = Some(body.to_string());
    }

    /// Answer the next `calls` requests with `status`, whatever they are.
    pub fn fail_next(&self, calls: usize, status: u16) {
        self.state
            .pending_failures
            .lock()
            .unwrap()
            .extend(std::iter::repeat(status).take(calls));
    }

    pub fn throttle(&self, calls: usize) {
        self.fail_next(calls, 429);
    }

    pub fn delay(&self, delay: Duration) {
        self.state.delay_ms.store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn reject_deletes(&self) {
        self.state.reject_deletes.store(true, Ordering::SeqCst);
    }

    pub fn delete_calls(&self) -> usize {
        self.state.delete_calls.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.state.list_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.state.create_calls.load(Ordering::SeqCst)
    }

    pub fn created(&self) -> Vec<Value> {
        self.state.created.lock().unwrap().clone()
    }

    pub fn names(&self) -> Vec<String> {
        self.state
            .records
            .lock()
            .unwrap()
            .iter()
            .filter_map(|r| r["employee_name"].as_str().map(str::to_string))
            .collect()
    }
}

/// Service config pointed at `upstream`, with short deadlines for tests.
pub fn service_config(upstream: &MockUpstream) -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.server.bind_address = "127.0.0.1:0".to_string();
    config.upstream.base_url = upstream.base_url();
    config.upstream.request_timeout_secs = 2;
    config.upstream.connect_timeout_secs = 1;
    config.auth.jwt_secret = "integration-test-secret".to_string();
    config.observability.metrics_enabled = false;
    config
}

pub fn record(id: &str, name: &str, salary: u32, age: u32, title: &str) -> Value {
    json!({
        "id": id,
        "employee_name": name,
        "employee_salary": salary,
        "employee_age": age,
        "employee_title": title,
        "employee_email": format!("{}@company.com", name.to_lowercase()),
    })
}

pub fn staff() -> Vec<Value> {
    vec![
        record("1", "John", 1000, 30, "Engineer"),
        record("2", "Jane", 2000, 35, "Manager"),
        record("3", "Bob", 1500, 28, "Analyst"),
        record("4", "Alice", 3000, 41, "Director"),
    ]
}

fn envelope(data: Value) -> Response {
    Json(json!({ "status": "Successfully processed request.", "data": data })).into_response()
}

/// Apply the configured misbehaviour, if any, before a handler runs.
async fn interfere(state: &MockState) -> Option<Response> {
    let delay = state.delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    let pending = state.pending_failures.lock().unwrap().pop_front();
    let forced = pending.or(*state.fail_with.lock().unwrap());
    forced.map(|status| {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, "injected failure").into_response()
    })
}

async fn list(State(state): State<Arc<MockState>>) -> Response {
    state.list_calls.fetch_add(1, Ordering::SeqCst);
    if let Some(response) = interfere(&state).await {
        return response;
    }

    let raw = state.raw_list_body.lock().unwrap().clone();
    if let Some(body) = raw {
        return body.into_response();
    }

    let records = state.records.lock().unwrap().clone();
    envelope(Value::Array(records))
}

async fn get_one(State(state): State<Arc<MockState>>, Path(id): Path<String>) -> Response {
    state.get_calls.fetch_add(1, Ordering::SeqCst);
    if let Some(response) = interfere(&state).await {
        return response;
    }

    let raw = state.raw_record_body.lock().unwrap().clone();
    if let Some(body) = raw {
        return body.into_response();
    }

    let found = state
        .records
        .lock()
        .unwrap()
        .iter()
        .find(|r| r["id"] == id.as_str())
        .cloned();
    match found {
        Some(record) => envelope(record),
        None => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    }
}

async fn create(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    state.create_calls.fetch_add(1, Ordering::SeqCst);
    if let Some(response) = interfere(&state).await {
        return response;
    }
    state.created.lock().unwrap().push(body.clone());

    let name = body["name"].as_str().unwrap_or_default().to_string();
    let mut records = state.records.lock().unwrap();
    let next_id = records
        .iter()
        .filter_map(|r| r["id"].as_str().and_then(|id| id.parse::<u64>().ok()))
        .max()
        .unwrap_or(0)
        + 1;

    let created = json!({
        "id": next_id.to_string(),
        "employee_name": name,
        "employee_salary": body["salary"],
        "employee_age": body["age"],
        "employee_title": body["title"],
        "employee_email": format!("{}@company.com", name.to_lowercase()),
    });
    records.push(created.clone());
    envelope(created)
}

async fn delete_by_name(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    state.delete_calls.fetch_add(1, Ordering::SeqCst);
    if let Some(response) = interfere(&state).await {
        return response;
    }
    if state.reject_deletes.load(Ordering::SeqCst) {
        return envelope(Value::Bool(false));
    }

    let name = body["name"].as_str().unwrap_or_default();
    let mut records = state.records.lock().unwrap();
    let before = records.len();
    records.retain(|r| r["employee_name"] != name);
    if records.len() == before {
        return (StatusCode::NOT_FOUND, "Not Found").into_response();
    }
    envelope(Value::Bool(true))
}
