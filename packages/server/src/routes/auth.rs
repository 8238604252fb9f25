use api::{normalize_email, AuthResponse, LoginRequest, SignupRequest, UserInfo, VerificationStatus};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::application::AppState;
use crate::auth::{hash_password, verification_token, verify_password, AuthUser};
use crate::db::{DbError, NewUser, Repository};
use crate::error::ApiError;
use crate::views;

const INVALID_LOGIN: &str = "Invalid email or password";

/// POST /api/auth/signup
async fn signup<R: Repository>(
    State(state): State<AppState<R>>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let req = req.normalize()?;
    let email_taken = || ApiError::Conflict("Email already registered".to_string());

    if state.repo.user_by_email(&req.email).await?.is_some() {
        return Err(email_taken());
    }

    let password_hash = hash_password(&req.password)?;
    let token = verification_token();
    let user = state
        .repo
        .create_user(NewUser {
            name: req.name,
            email: req.email,
            password_hash,
            verification_token: token.clone(),
        })
        .await
        .map_err(|e| match e {
            DbError::Conflict => email_taken(),
            other => other.into(),
        })?;

    tracing::info!(
        user_id = user.id,
        link = %format!("{}/verify-email?token={token}", state.settings.public_base_url()),
        "verification link issued"
    );

    let token = state.tokens.issue(user.id)?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: views::user(&user),
        }),
    ))
}

/// POST /api/auth/login
async fn login<R: Repository>(
    State(state): State<AppState<R>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let invalid = || ApiError::Unauthorized(INVALID_LOGIN.to_string());

    let email = normalize_email(&req.email).map_err(|_| invalid())?;
    let user = state.repo.user_by_email(&email).await?.ok_or_else(invalid)?;
    if !verify_password(&req.password, &user.password_hash)? {
        tracing::debug!(user_id = user.id, "password mismatch");
        return Err(invalid());
    }

    let token = state.tokens.issue(user.id)?;
    Ok(Json(AuthResponse {
        token,
        user: views::user(&user),
    }))
}

/// GET /api/auth/me
async fn me<R: Repository>(State(state): State<AppState<R>>, auth: AuthUser) -> Result<Json<UserInfo>, ApiError> {
    let user = state
        .repo
        .user_by_id(auth.id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Unknown user".to_string()))?;
    Ok(Json(views::user(&user)))
}

#[derive(Debug, Deserialize)]
struct VerifyQuery {
    token: String,
}

/// GET /api/auth/verify?token=
async fn verify<R: Repository>(
    State(state): State<AppState<R>>,
    Query(query): Query<VerifyQuery>,
) -> Result<Json<VerificationStatus>, ApiError> {
    let user = state
        .repo
        .verify_email(query.token.trim())
        .await?
        .ok_or(ApiError::NotFound("verification token"))?;
    tracing::info!(user_id = user.id, "email verified");
    Ok(Json(VerificationStatus { verified: true }))
}

/// GET /api/auth/verification-status
async fn verification_status<R: Repository>(
    State(state): State<AppState<R>>,
    auth: AuthUser,
) -> Result<Json<VerificationStatus>, ApiError> {
    let user = state
        .repo
        .user_by_id(auth.id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Unknown user".to_string()))?;
    Ok(Json(VerificationStatus {
        verified: user.email_verified,
    }))
}

pub fn router<R: Repository>() -> Router<AppState<R>> {
    Router::new()
        .route("/api/auth/signup", post(signup::<R>))
        .route("/api/auth/login", post(login::<R>))
        .route("/api/auth/me", get(me::<R>))
        .route("/api/auth/verify", get(verify::<R>))
        .route("/api/auth/verification-status", get(verification_status::<R>))
}
