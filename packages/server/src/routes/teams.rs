use api::{MemberCardView, MemberView, MembersUpload, StyleInput, TeamInput, TeamSummary, TeamView};
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::routing::{get, patch, post, put};
use axum::{Json, Router};

use super::{check_template, read_image};
use crate::application::AppState;
use crate::auth::AuthUser;
use crate::db::{Repository, TeamRecord};
use crate::error::ApiError;
use crate::views;

async fn owned_team<R: Repository>(state: &AppState<R>, id: i64, user: AuthUser) -> Result<TeamRecord, ApiError> {
    state
        .repo
        .team(id)
        .await?
        .filter(|team| team.user_id == user.id)
        .ok_or(ApiError::NotFound("team"))
}

async fn team_view<R: Repository>(state: &AppState<R>, team: &TeamRecord) -> Result<TeamView, ApiError> {
    let members = state.repo.members(team.id).await?;
    Ok(views::team(team, &members))
}

async fn list<R: Repository>(
    State(state): State<AppState<R>>,
    auth: AuthUser,
) -> Result<Json<Vec<TeamSummary>>, ApiError> {
    let teams = state.repo.teams_for_user(auth.id).await?;
    Ok(Json(teams.iter().map(views::team_summary).collect()))
}

async fn create<R: Repository>(
    State(state): State<AppState<R>>,
    auth: AuthUser,
    Json(input): Json<TeamInput>,
) -> Result<(StatusCode, Json<TeamView>), ApiError> {
    let input = input.normalize()?;
    check_template(&state, input.template_id).await?;
    let team = state.repo.create_team(auth.id, &input).await?;
    Ok((StatusCode::CREATED, Json(views::team(&team, &[]))))
}

async fn get_one<R: Repository>(
    State(state): State<AppState<R>>,
    Path(id): Path<i64>,
) -> Result<Json<TeamView>, ApiError> {
    let team = state.repo.team(id).await?.ok_or(ApiError::NotFound("team"))?;
    Ok(Json(team_view(&state, &team).await?))
}

async fn update<R: Repository>(
    State(state): State<AppState<R>>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(input): Json<TeamInput>,
) -> Result<Json<TeamView>, ApiError> {
    owned_team(&state, id, auth).await?;
    let input = input.normalize()?;
    check_template(&state, input.template_id).await?;
    let team = state
        .repo
        .update_team(id, &input)
        .await?
        .ok_or(ApiError::NotFound("team"))?;
    Ok(Json(team_view(&state, &team).await?))
}

async fn update_style<R: Repository>(
    State(state): State<AppState<R>>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(style): Json<StyleInput>,
) -> Result<Json<TeamView>, ApiError> {
    let team = owned_team(&state, id, auth).await?;
    if style.is_empty() {
        return Ok(Json(team_view(&state, &team).await?));
    }
    check_template(&state, style.template_id).await?;
    let team = state
        .repo
        .update_team_style(id, &style)
        .await?
        .ok_or(ApiError::NotFound("team"))?;
    Ok(Json(team_view(&state, &team).await?))
}

async fn delete<R: Repository>(
    State(state): State<AppState<R>>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    owned_team(&state, id, auth).await?;
    if !state.repo.delete_team(id).await? {
        return Err(ApiError::NotFound("team"));
    }
    tracing::debug!(team_id = id, "team deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn upload_logo<R: Repository>(
    State(state): State<AppState<R>>,
    auth: AuthUser,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<Json<TeamView>, ApiError> {
    owned_team(&state, id, auth).await?;
    let image = read_image(multipart, "logo", state.settings.uploads.max_image_bytes).await?;
    let team = state
        .repo
        .set_team_logo(id, image)
        .await?
        .ok_or(ApiError::NotFound("team"))?;
    Ok(Json(team_view(&state, &team).await?))
}

/// Replaces the whole member list; every new row gets its own QR code.
async fn replace_members<R: Repository>(
    State(state): State<AppState<R>>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(upload): Json<MembersUpload>,
) -> Result<Json<Vec<MemberView>>, ApiError> {
    owned_team(&state, id, auth).await?;
    let upload = upload.normalize()?;
    let members = state
        .repo
        .replace_members(id, upload.members, &state.qr)
        .await?;
    tracing::info!(team_id = id, count = members.len(), "team members replaced");
    Ok(Json(members.iter().map(views::member).collect()))
}

async fn regenerate_member_qr<R: Repository>(
    State(state): State<AppState<R>>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Vec<MemberView>>, ApiError> {
    owned_team(&state, id, auth).await?;
    let mut updated = Vec::new();
    for member in state.repo.members(id).await? {
        let qr = state.qr.member(id, member.id)?;
        if let Some(record) = state.repo.set_member_qr(member.id, qr).await? {
            updated.push(views::member(&record));
        }
    }
    Ok(Json(updated))
}

async fn get_member<R: Repository>(
    State(state): State<AppState<R>>,
    Path((team_id, member_id)): Path<(i64, i64)>,
) -> Result<Json<MemberCardView>, ApiError> {
    let team = state.repo.team(team_id).await?.ok_or(ApiError::NotFound("team"))?;
    let member = state
        .repo
        .member(team_id, member_id)
        .await?
        .ok_or(ApiError::NotFound("member"))?;
    Ok(Json(views::member_card(&team, &member)))
}

pub fn router<R: Repository>() -> Router<AppState<R>> {
    Router::new()
        .route("/api/teams", get(list::<R>).post(create::<R>))
        .route(
            "/api/teams/{id}",
            get(get_one::<R>).put(update::<R>).delete(delete::<R>),
        )
        .route("/api/teams/{id}/style", patch(update_style::<R>))
        .route("/api/teams/{id}/logo", post(upload_logo::<R>))
        .route("/api/teams/{id}/members", put(replace_members::<R>))
        .route("/api/teams/{id}/members/qr", post(regenerate_member_qr::<R>))
        .route("/api/teams/{id}/members/{member_id}", get(get_member::<R>))
}
