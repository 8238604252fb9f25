use api::{ContactView, SaveContactRequest};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get};
use axum::{Json, Router};

use crate::application::AppState;
use crate::auth::AuthUser;
use crate::db::{DbError, Repository};
use crate::error::ApiError;
use crate::views;

/// Newest first.
async fn list<R: Repository>(
    State(state): State<AppState<R>>,
    auth: AuthUser,
) -> Result<Json<Vec<ContactView>>, ApiError> {
    let saved = state.repo.contacts_for_user(auth.id).await?;
    Ok(Json(
        saved
            .iter()
            .map(|(contact, card)| views::contact(contact, card))
            .collect(),
    ))
}

async fn save<R: Repository>(
    State(state): State<AppState<R>>,
    auth: AuthUser,
    Json(req): Json<SaveContactRequest>,
) -> Result<(StatusCode, Json<ContactView>), ApiError> {
    let card = state
        .repo
        .card(req.card_id)
        .await?
        .ok_or(ApiError::NotFound("card"))?;
    if card.user_id == auth.id {
        return Err(ApiError::BadRequest("You cannot save your own card".to_string()));
    }

    let contact = state
        .repo
        .save_contact(auth.id, card.id)
        .await
        .map_err(|e| match e {
            DbError::Conflict => ApiError::Conflict("Contact already saved".to_string()),
            other => other.into(),
        })?;
    Ok((StatusCode::CREATED, Json(views::contact(&contact, &card))))
}

async fn remove<R: Repository>(
    State(state): State<AppState<R>>,
    auth: AuthUser,
    Path(card_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if !state.repo.delete_contact(auth.id, card_id).await? {
        return Err(ApiError::NotFound("contact"));
    }
    Ok(StatusCode::NO_CONTENT)
}

pub fn router<R: Repository>() -> Router<AppState<R>> {
    Router::new()
        .route("/api/contacts", get(list::<R>).post(save::<R>))
        .route("/api/contacts/{card_id}", delete(remove::<R>))
}
