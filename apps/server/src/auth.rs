//! Password hashing and JWT issuance/verification, plus the middleware that
//! turns a Bearer token into a `CurrentUser` extension.

use std::sync::Arc;

use argon2::password_hash::{PasswordHash, PasswordHasher, SaltString};
use argon2::{Argon2, PasswordVerifier};
use rand::rngs::OsRng;
use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ApiError;
use crate::main_lib::AppState;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Missing bearer token")]
    MissingToken,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Password hashing failed: {0}")]
    Hashing(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum TokenKind {
    Access,
    Refresh,
}

#[derive(Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
    kind: TokenKind,
}

/// Access/refresh token pair returned by register and login.
#[derive(Serialize, Deserialize, Debug, Clone, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// The authenticated caller, injected by `require_auth`. Handlers take the
/// user id from here and never from the request body.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
}

pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
}

impl AuthManager {
    pub fn new(secret: &str, access_ttl_secs: i64, refresh_ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl_secs,
            refresh_ttl_secs,
        }
    }

    pub fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::Hashing(e.to_string()))
    }

    pub fn verify_password(&self, password_hash: &str, password: &str) -> bool {
        PasswordHash::new(password_hash)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }

    fn issue(&self, user_id: &str, kind: TokenKind, ttl_secs: i64) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now,
            exp: now + ttl_secs,
            kind,
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|_| AuthError::InvalidToken)
    }

    pub fn issue_tokens(&self, user_id: &str) -> Result<TokenPair, AuthError> {
        Ok(TokenPair {
            access: self.issue(user_id, TokenKind::Access, self.access_ttl_secs)?,
            refresh: self.issue(user_id, TokenKind::Refresh, self.refresh_ttl_secs)?,
        })
    }

    fn verify(&self, token: &str, expected: TokenKind) -> Result<String, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|_| AuthError::InvalidToken)?;
        if data.claims.kind != expected {
            return Err(AuthError::InvalidToken);
        }
        Ok(data.claims.sub)
    }

    /// Returns the user id carried by a valid access token.
    pub fn verify_access(&self, token: &str) -> Result<String, AuthError> {
        self.verify(token, TokenKind::Access)
    }

    /// Returns the user id carried by a valid refresh token.
    pub fn verify_refresh(&self, token: &str) -> Result<String, AuthError> {
        self.verify(token, TokenKind::Refresh)
    }
}

/// Middleware guarding every protected route: resolves the Bearer token to a
/// `CurrentUser` or fails with 401.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(AuthError::MissingToken)?;

    let user_id = state.auth.verify_access(token)?;
    request.extensions_mut().insert(CurrentUser { id: user_id });
    Ok(next.run(request).await)
}
