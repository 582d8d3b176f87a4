//! Handlers for the `/magazines` resource (editions).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use pressdesk_core::deadlines::gate::CompleteEditionRequest;
use pressdesk_core::deadlines::schedule::{calculate_deadlines, DeadlineSchedule};
use pressdesk_core::deadlines::steps::ContentTrack;
use pressdesk_core::edition::{resolve_publication_date, validate_manual_status};
use pressdesk_core::error::CoreError;
use pressdesk_core::types::{CalendarDate, DbId};
use pressdesk_db::models::campaign_action::EditionCampaign;
use pressdesk_db::models::magazine_edition::{
    CreateMagazineEdition, MagazineEdition, UpdateMagazineEdition,
};
use pressdesk_db::repositories::{CampaignActionRepo, MagazineEditionRepo, MediumRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;
use crate::workflow;

/// Request body for `POST /magazines`.
///
/// Either `publication_date` or the target `year` and `month` must be given.
#[derive(Debug, Deserialize)]
pub struct CreateEditionRequest {
    pub medium_id: DbId,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub publication_date: Option<CalendarDate>,
}

#[derive(Debug, Serialize)]
pub struct CreateEditionResponse {
    pub message: &'static str,
    pub id: DbId,
    pub publication_date: CalendarDate,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct CompleteEditionResponse {
    pub message: &'static str,
    pub publication_link: String,
}

/// An edition with its campaign actions split by track.
#[derive(Debug, Serialize, Deserialize)]
pub struct EditionCampaignsResponse {
    pub edition: MagazineEdition,
    pub technical_articles: Vec<EditionCampaign>,
    pub ads: Vec<EditionCampaign>,
    pub all_campaigns: Vec<EditionCampaign>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "MagazineEdition",
        id,
    })
}

async fn ensure_edition_exists(state: &AppState, id: DbId) -> AppResult<MagazineEdition> {
    MagazineEditionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/magazines
pub async fn list(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<MagazineEdition>>> {
    Ok(Json(MagazineEditionRepo::list(&state.pool).await?))
}

/// GET /api/v1/magazines/medium/{medium_id}
pub async fn list_by_medium(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(medium_id): Path<DbId>,
) -> AppResult<Json<Vec<MagazineEdition>>> {
    Ok(Json(
        MagazineEditionRepo::list_by_medium(&state.pool, medium_id).await?,
    ))
}

/// GET /api/v1/magazines/{id}
pub async fn get_by_id(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<MagazineEdition>> {
    Ok(Json(ensure_edition_exists(&state, id).await?))
}

/// POST /api/v1/magazines
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateEditionRequest>,
) -> AppResult<impl IntoResponse> {
    let publication_date =
        resolve_publication_date(input.publication_date, input.year, input.month)
            .map_err(|e| AppError::Core(CoreError::Validation(e)))?;

    MediumRepo::find_by_id(&state.pool, input.medium_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Medium",
            id: input.medium_id,
        }))?;

    let edition = MagazineEditionRepo::create(
        &state.pool,
        &CreateMagazineEdition {
            medium_id: input.medium_id,
            publication_date,
        },
    )
    .await?;

    tracing::info!(
        edition_id = edition.id,
        medium_id = edition.medium_id,
        publication_date = %edition.publication_date,
        user_id = admin.user_id,
        "Magazine edition created",
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateEditionResponse {
            message: "Magazine edition created",
            id: edition.id,
            publication_date: edition.publication_date,
        }),
    ))
}

/// PUT /api/v1/magazines/{id}
///
/// A completed edition cannot be edited; reverting a confirmation is the
/// only way to reopen it. `published` is never accepted here.
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateMagazineEdition>,
) -> AppResult<Json<MessageResponse>> {
    if let Some(status) = &input.status {
        validate_manual_status(status).map_err(AppError::BadRequest)?;
    }

    let mut tx = state.pool.begin().await?;
    let edition = MagazineEditionRepo::lock(&mut tx, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    if edition.is_completed {
        return Err(AppError::Core(CoreError::Conflict(
            "A completed edition cannot be modified".into(),
        )));
    }
    MagazineEditionRepo::update(&mut tx, id, &input).await?;
    tx.commit().await?;

    tracing::info!(
        edition_id = id,
        publication_date = ?input.publication_date,
        status = ?input.status,
        user_id = admin.user_id,
        "Magazine edition updated",
    );

    Ok(Json(MessageResponse {
        message: "Magazine edition updated",
    }))
}

/// DELETE /api/v1/magazines/{id}
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    let mut tx = state.pool.begin().await?;
    let edition = MagazineEditionRepo::lock(&mut tx, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    if edition.is_completed {
        return Err(AppError::Core(CoreError::Conflict(
            "A completed edition cannot be deleted".into(),
        )));
    }
    if MagazineEditionRepo::has_confirmation_history(&mut tx, id).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "The edition has deadline confirmations and cannot be deleted".into(),
        )));
    }
    MagazineEditionRepo::delete(&mut tx, id).await?;
    tx.commit().await?;

    tracing::info!(edition_id = id, user_id = admin.user_id, "Magazine edition deleted");

    Ok(Json(MessageResponse {
        message: "Magazine edition deleted",
    }))
}

/// PUT /api/v1/magazines/{id}/complete
pub async fn complete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CompleteEditionRequest>,
) -> AppResult<Json<CompleteEditionResponse>> {
    let publication_link =
        workflow::complete_edition(&state.pool, &auth.actor(), id, &input.publication_link)
            .await?;
    Ok(Json(CompleteEditionResponse {
        message: "Magazine edition completed",
        publication_link,
    }))
}

/// GET /api/v1/magazines/{id}/campaigns
pub async fn campaigns(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<EditionCampaignsResponse>> {
    let edition = ensure_edition_exists(&state, id).await?;
    let all_campaigns = CampaignActionRepo::list_for_edition(&state.pool, id).await?;

    let by_track = |track: ContentTrack| -> Vec<EditionCampaign> {
        all_campaigns
            .iter()
            .filter(|c| c.track() == Some(track))
            .cloned()
            .collect()
    };
    let technical_articles = by_track(ContentTrack::Technical);
    let ads = by_track(ContentTrack::Ad);

    Ok(Json(EditionCampaignsResponse {
        edition,
        technical_articles,
        ads,
        all_campaigns,
    }))
}

/// GET /api/v1/magazines/{id}/deadlines
pub async fn deadlines(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DeadlineSchedule>> {
    let edition = ensure_edition_exists(&state, id).await?;
    Ok(Json(calculate_deadlines(edition.publication_date)))
}
