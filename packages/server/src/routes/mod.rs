//! HTTP handlers, one module per resource.

mod auth;
mod cards;
mod contacts;
mod health;
mod teams;
mod templates;

#[cfg(test)]
mod tests;

use axum::extract::Multipart;
use axum::http::StatusCode;
use axum::Router;

use crate::application::AppState;
use crate::db::Repository;
use crate::error::ApiError;
use crate::images::{Image, ImageError};

pub fn router<R: Repository>() -> Router<AppState<R>> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(templates::router())
        .merge(cards::router())
        .merge(teams::router())
        .merge(contacts::router())
}

/// Reject template ids that are not in the catalog.
async fn check_template<R: Repository>(state: &AppState<R>, template_id: Option<i32>) -> Result<(), ApiError> {
    match template_id {
        Some(id) if state.repo.template(id).await?.is_none() => {
            Err(ApiError::BadRequest(format!("unknown template {id}")))
        }
        _ => Ok(()),
    }
}

/// Read the image part named `field` from a multipart body. Other parts are ignored.
async fn read_image(mut multipart: Multipart, field: &str, max_bytes: usize) -> Result<Image, ApiError> {
    let too_large = |e: &axum::extract::multipart::MultipartError| e.status() == StatusCode::PAYLOAD_TOO_LARGE;

    loop {
        let next = multipart.next_field().await;
        let part = match next {
            Ok(Some(part)) => part,
            Ok(None) => break,
            Err(e) if too_large(&e) => return Err(ImageError::TooLarge(max_bytes).into()),
            Err(e) => return Err(ApiError::BadRequest(e.body_text())),
        };
        if part.name() != Some(field) {
            continue;
        }

        let bytes = match part.bytes().await {
            Ok(bytes) => bytes,
            Err(e) if too_large(&e) => return Err(ImageError::TooLarge(max_bytes).into()),
            Err(e) => return Err(ApiError::BadRequest(e.body_text())),
        };
        return Image::detect(bytes.to_vec(), max_bytes).map_err(|e| {
            tracing::warn!(field, error = %e, "image upload rejected");
            e.into()
        });
    }

    Err(ApiError::BadRequest(format!("missing `{field}` field")))
}
