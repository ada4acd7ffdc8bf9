//! Employee endpoint handlers.
//!
//! Each handler is a thin adapter over one aggregator operation; errors turn
//! into responses through [`ServiceError`]'s `IntoResponse`.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

use crate::employees::{Employee, ServiceError};
use crate::http::server::AppState;

pub async fn get_all(State(state): State<AppState>) -> Result<Json<Vec<Employee>>, ServiceError> {
    state.aggregator.get_all().await.map(Json)
}

pub async fn search_by_name(
    State(state): State<AppState>,
    Path(fragment): Path<String>,
) -> Result<Json<Vec<Employee>>, ServiceError> {
    state.aggregator.search_by_name(&fragment).await.map(Json)
}

pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Employee>, ServiceError> {
    state.aggregator.get_by_id(&id).await.map(Json)
}

pub async fn highest_salary(State(state): State<AppState>) -> Result<Json<u32>, ServiceError> {
    state.aggregator.highest_salary().await.map(Json)
}

pub async fn top_ten_by_earning(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, ServiceError> {
    state.aggregator.top_ten_by_earning().await.map(Json)
}

/// Bodies that are not JSON at all are validation failures too.
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Employee>), ServiceError> {
    let Json(fields) = payload.map_err(|e| ServiceError::Validation(e.body_text()))?;
    let created = state.aggregator.create(fields).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn delete_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<String>, ServiceError> {
    state.aggregator.delete_by_id(&id).await.map(Json)
}
