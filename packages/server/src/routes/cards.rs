use api::{vcard, CardInput, CardSummary, CardView, StyleInput, TemplateKind};
use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::{Json, Router};

use super::{check_template, read_image};
use crate::application::AppState;
use crate::auth::AuthUser;
use crate::db::{CardImage, CardRecord, Repository};
use crate::error::ApiError;
use crate::{render, views};

/// The card, if `user` owns it. Someone else's card is reported as missing.
async fn owned_card<R: Repository>(state: &AppState<R>, id: i64, user: AuthUser) -> Result<CardRecord, ApiError> {
    state
        .repo
        .card(id)
        .await?
        .filter(|card| card.user_id == user.id)
        .ok_or(ApiError::NotFound("card"))
}

async fn list<R: Repository>(
    State(state): State<AppState<R>>,
    auth: AuthUser,
) -> Result<Json<Vec<CardSummary>>, ApiError> {
    let cards = state.repo.cards_for_user(auth.id).await?;
    Ok(Json(cards.iter().map(views::card_summary).collect()))
}

/// Creates the row, then encodes its id into the QR payload.
async fn create<R: Repository>(
    State(state): State<AppState<R>>,
    auth: AuthUser,
    Json(input): Json<CardInput>,
) -> Result<(StatusCode, Json<CardView>), ApiError> {
    let input = input.normalize()?;
    check_template(&state, input.template_id).await?;

    let card = state.repo.create_card(auth.id, &input).await?;
    let qr = state.qr.card(card.id)?;
    let card = state
        .repo
        .set_card_qr(card.id, qr)
        .await?
        .ok_or(ApiError::NotFound("card"))?;

    tracing::debug!(card_id = card.id, user_id = auth.id, "card created");
    Ok((StatusCode::CREATED, Json(views::card(&card))))
}

async fn get_one<R: Repository>(
    State(state): State<AppState<R>>,
    Path(id): Path<i64>,
) -> Result<Json<CardView>, ApiError> {
    let card = state.repo.card(id).await?.ok_or(ApiError::NotFound("card"))?;
    Ok(Json(views::card(&card)))
}

async fn update<R: Repository>(
    State(state): State<AppState<R>>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(input): Json<CardInput>,
) -> Result<Json<CardView>, ApiError> {
    owned_card(&state, id, auth).await?;
    let input = input.normalize()?;
    check_template(&state, input.template_id).await?;

    let card = state
        .repo
        .update_card(id, &input)
        .await?
        .ok_or(ApiError::NotFound("card"))?;
    Ok(Json(views::card(&card)))
}

async fn update_style<R: Repository>(
    State(state): State<AppState<R>>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(style): Json<StyleInput>,
) -> Result<Json<CardView>, ApiError> {
    let card = owned_card(&state, id, auth).await?;
    if style.is_empty() {
        return Ok(Json(views::card(&card)));
    }
    check_template(&state, style.template_id).await?;

    let card = state
        .repo
        .update_card_style(id, &style)
        .await?
        .ok_or(ApiError::NotFound("card"))?;
    Ok(Json(views::card(&card)))
}

async fn delete<R: Repository>(
    State(state): State<AppState<R>>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    owned_card(&state, id, auth).await?;
    if !state.repo.delete_card(id).await? {
        return Err(ApiError::NotFound("card"));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn upload<R: Repository>(
    state: AppState<R>,
    auth: AuthUser,
    id: i64,
    slot: CardImage,
    multipart: Multipart,
) -> Result<Json<CardView>, ApiError> {
    owned_card(&state, id, auth).await?;
    let field = match slot {
        CardImage::Logo => "logo",
        CardImage::ProfilePhoto => "photo",
    };
    let image = read_image(multipart, field, state.settings.uploads.max_image_bytes).await?;
    let card = state
        .repo
        .set_card_image(id, slot, image)
        .await?
        .ok_or(ApiError::NotFound("card"))?;
    Ok(Json(views::card(&card)))
}

async fn upload_logo<R: Repository>(
    State(state): State<AppState<R>>,
    auth: AuthUser,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<Json<CardView>, ApiError> {
    upload(state, auth, id, CardImage::Logo, multipart).await
}

async fn upload_photo<R: Repository>(
    State(state): State<AppState<R>>,
    auth: AuthUser,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<Json<CardView>, ApiError> {
    upload(state, auth, id, CardImage::ProfilePhoto, multipart).await
}

async fn regenerate_qr<R: Repository>(
    State(state): State<AppState<R>>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<CardView>, ApiError> {
    owned_card(&state, id, auth).await?;
    let qr = state.qr.card(id)?;
    let card = state
        .repo
        .set_card_qr(id, qr)
        .await?
        .ok_or(ApiError::NotFound("card"))?;
    Ok(Json(views::card(&card)))
}

async fn download_vcard<R: Repository>(
    State(state): State<AppState<R>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let card = state.repo.card(id).await?.ok_or(ApiError::NotFound("card"))?;
    let card = views::card(&card);
    let disposition = format!("attachment; filename=\"{}\"", vcard::file_name(&card));
    Ok((
        [
            (header::CONTENT_TYPE, "text/vcard; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        vcard::render(&card),
    ))
}

async fn card_image<R: Repository>(
    State(state): State<AppState<R>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let card = state.repo.card(id).await?.ok_or(ApiError::NotFound("card"))?;
    let kind = match card.template_id {
        Some(template_id) => state
            .repo
            .template(template_id)
            .await?
            .map(|t| t.kind())
            .unwrap_or_default(),
        None => TemplateKind::default(),
    };
    let svg = render::card_svg(&views::card(&card), kind);
    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg))
}

pub fn router<R: Repository>() -> Router<AppState<R>> {
    Router::new()
        .route("/api/cards", get(list::<R>).post(create::<R>))
        .route(
            "/api/cards/{id}",
            get(get_one::<R>).put(update::<R>).delete(delete::<R>),
        )
        .route("/api/cards/{id}/style", patch(update_style::<R>))
        .route("/api/cards/{id}/logo", post(upload_logo::<R>))
        .route("/api/cards/{id}/photo", post(upload_photo::<R>))
        .route("/api/cards/{id}/qr", post(regenerate_qr::<R>))
        .route("/api/cards/{id}/vcard", get(download_vcard::<R>))
        .route("/api/cards/{id}/image.svg", get(card_image::<R>))
}
