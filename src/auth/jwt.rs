//! JSON Web Token issuance and validation.
//!
//! The signing secret is injected at construction and lives as long as the
//! service; there is no process-wide key.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

use super::errors::{AuthError, AuthResult};
use crate::config::AuthConfig;

/// Upper bound on token lifetime (ten years).
const MAX_TTL_SECS: i64 = 10 * 365 * 24 * 3600;

/// Claims carried by access tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (authenticated identity)
    pub sub: String,

    /// Issued at (Unix epoch seconds)
    pub iat: i64,

    /// Expiration (Unix epoch seconds)
    pub exp: i64,

    /// Issuer
    pub iss: String,
}

/// Token response returned to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Issues and validates bearer tokens for the configured identity.
#[derive(Clone)]
pub struct TokenService {
    username: String,
    password: String,
    issuer: String,
    ttl: Duration,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        let ttl = i64::try_from(config.token_ttl_secs)
            .unwrap_or(MAX_TTL_SECS)
            .min(MAX_TTL_SECS);

        Self {
            username: config.username.clone(),
            password: config.password.clone(),
            issuer: config.issuer.clone(),
            ttl: Duration::seconds(ttl),
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        }
    }

    /// Check credentials and issue a token for them.
    pub fn login(&self, username: &str, password: &str) -> AuthResult<TokenResponse> {
        let username_ok = constant_time_str_eq(username, &self.username);
        let password_ok = constant_time_str_eq(password, &self.password);
        if !(username_ok & password_ok) {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(TokenResponse {
            token: self.issue(username)?,
            token_type: "Bearer".to_string(),
            expires_in: self.ttl.num_seconds(),
        })
    }

    /// Issue a signed token for `identity`.
    pub fn issue(&self, identity: &str) -> AuthResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: identity.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
            iss: self.issuer.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|_| AuthError::TokenGenerationFailed)
    }

    /// Validate a token and return the identity it was issued for.
    pub fn validate(&self, token: &str) -> AuthResult<String> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                _ => AuthError::MalformedToken,
            }
        })?;

        Ok(data.claims.sub)
    }
}

/// Compare secrets without short-circuiting on the first differing byte.
fn constant_time_str_eq(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("username", &self.username)
            .field("issuer", &self.issuer)
            .field("ttl_secs", &self.ttl.num_seconds())
            .finish()
    }
}
