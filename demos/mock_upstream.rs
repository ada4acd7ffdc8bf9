//! Stand-alone employee provider for trying the service locally.
//!
//! ```text
//! cargo run --example mock_upstream
//! cargo run -- --config config.example.toml
//! ```

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

type Store = Arc<Mutex<BTreeMap<u64, Value>>>;

#[derive(Deserialize)]
struct NewEmployee {
    name: String,
    salary: u32,
    age: u32,
    title: String,
}

#[derive(Deserialize)]
struct DeleteRequest {
    name: String,
}

fn envelope(data: Value) -> Response {
    Json(json!({ "status": "Successfully processed request.", "data": data })).into_response()
}

fn record(id: u64, name: &str, salary: u32, age: u32, title: &str) -> Value {
    json!({
        "id": id.to_string(),
        "employee_name": name,
        "employee_salary": salary,
        "employee_age": age,
        "employee_title": title,
        "employee_email": format!("{}@company.com", name.to_lowercase().replace(' ', ".")),
    })
}

async fn list(State(store): State<Store>) -> Response {
    let records: Vec<Value> = store.lock().unwrap().values().cloned().collect();
    envelope(Value::Array(records))
}

async fn get_one(State(store): State<Store>, Path(id): Path<u64>) -> Response {
    match store.lock().unwrap().get(&id) {
        Some(record) => envelope(record.clone()),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn create(State(store): State<Store>, Json(input): Json<NewEmployee>) -> Response {
    let mut store = store.lock().unwrap();
    let id = store.keys().next_back().copied().unwrap_or(0) + 1;
    let created = record(id, &input.name, input.salary, input.age, &input.title);
    store.insert(id, created.clone());
    println!("created {} ({})", input.name, id);
    envelope(created)
}

async fn delete(State(store): State<Store>, Json(input): Json<DeleteRequest>) -> Response {
    let mut store = store.lock().unwrap();
    let id = store
        .iter()
        .find(|(_, r)| r["employee_name"] == input.name.as_str())
        .map(|(id, _)| *id);
    match id {
        Some(id) => {
            store.remove(&id);
            println!("deleted {} ({})", input.name, id);
            envelope(Value::Bool(true))
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

#[tokio::main]
async fn main() {
    let seed = [
        ("Tiger Nixon", 320_800, 61, "System Architect"),
        ("Garrett Winters", 170_750, 63, "Accountant"),
        ("Ashton Cox", 86_000, 66, "Junior Technical Author"),
        ("Cedric Kelly", 433_060, 22, "Senior Javascript Developer"),
        ("Airi Satou", 162_700, 33, "Accountant"),
    ];
    let store: Store = Arc::new(Mutex::new(
        seed.iter()
            .zip(1..)
            .map(|(&(name, salary, age, title), id)| (id, record(id, name, salary, age, title)))
            .collect(),
    ));

    let app = Router::new()
        .route("/api/v1/employee", get(list).post(create).delete(delete))
        .route("/api/v1/employee/{id}", get(get_one))
        .with_state(store);

    let addr = SocketAddr::from(([127, 0, 0, 1], 8112));
    println!("Mock employee provider listening on http://{}/api/v1/employee", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
