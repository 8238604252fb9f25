use api::TemplateInfo;
use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::application::AppState;
use crate::db::Repository;
use crate::error::ApiError;

/// GET /api/templates
async fn list<R: Repository>(State(state): State<AppState<R>>) -> Result<Json<Vec<TemplateInfo>>, ApiError> {
    Ok(Json(state.repo.templates().await?))
}

/// GET /api/templates/{id}
async fn get_one<R: Repository>(
    State(state): State<AppState<R>>,
    Path(id): Path<i32>,
) -> Result<Json<TemplateInfo>, ApiError> {
    state
        .repo
        .template(id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("template"))
}

pub fn router<R: Repository>() -> Router<AppState<R>> {
    Router::new()
        .route("/api/templates", get(list::<R>))
        .route("/api/templates/{id}", get(get_one::<R>))
}
