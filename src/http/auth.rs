use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::auth::{AuthError, TokenResponse};
use crate::http::server::AppState;

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

/// Exchange the configured credentials for a bearer token.
pub async fn issue_token(
    State(state): State<AppState>,
    Query(request): Query<TokenRequest>,
) -> Result<Json<TokenResponse>, AuthError> {
    match state.tokens.login(&request.username, &request.password) {
        Ok(token) => {
            tracing::info!(username = %request.username, "Issued token");
            Ok(Json(token))
        }
        Err(e) => {
            tracing::warn!(username = %request.username, error = %e, "Token request rejected");
            Err(e)
        }
    }
}
