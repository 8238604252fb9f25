//! # Authentication
//!
//! Email + password accounts with Argon2id hashes ([`password`]) and stateless
//! bearer tokens ([`token`]). Handlers that need a signed-in user take an
//! [`AuthUser`] argument; the extractor reads `Authorization: Bearer <jwt>`
//! and rejects with 401 when it is missing, malformed or expired.

pub mod password;
pub mod token;

use axum::extract::FromRequestParts;
use axum::http::{header::AUTHORIZATION, request::Parts};

pub use password::{hash_password, verify_password};
pub use token::{verification_token, Claims, TokenKeys};

use crate::application::AppState;
use crate::db::Repository;
use crate::error::ApiError;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error("token signing failed: {0}")]
    Token(String),
    #[error("invalid or expired token")]
    InvalidToken,
    #[error("missing bearer token")]
    MissingToken,
}

/// The caller's user id, taken from a valid bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i64,
}

impl<R: Repository> FromRequestParts<AppState<R>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState<R>) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AuthError::MissingToken)?;
        let claims = state.tokens.verify(token)?;
        Ok(AuthUser { id: claims.sub })
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
