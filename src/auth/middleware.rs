//! Bearer token middleware for protected routes.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::errors::AuthError;
use super::jwt::TokenService;

/// Identity of the caller, attached to authenticated requests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity(pub String);

pub async fn require_bearer(
    State(tokens): State<Arc<TokenService>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    let result = match token {
        Some(token) => tokens.validate(token.trim()),
        None => Err(AuthError::MissingToken),
    };

    match result {
        Ok(identity) => {
            request.extensions_mut().insert(Identity(identity));
            next.run(request).await
        }
        Err(e) => {
            tracing::warn!(path = %request.uri().path(), error = %e, "Rejected unauthenticated request");
            e.into_response()
        }
    }
}
