//! Handlers for the `/magazine-deadlines` ledger.
//!
//! The rules themselves live in [`crate::workflow`]; these handlers only
//! translate between HTTP and the workflow operations.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use pressdesk_core::error::CoreError;
use pressdesk_core::types::DbId;
use pressdesk_db::models::deadline_confirmation::DeadlineConfirmation;
use pressdesk_db::repositories::{CampaignActionRepo, DeadlineConfirmationRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::workflow;

/// Request body for confirming a deadline.
///
/// `deadline_type` is taken as a string so unknown values are reported as a
/// validation error rather than a body rejection.
#[derive(Debug, Deserialize)]
pub struct ConfirmDeadlineRequest {
    pub deadline_type: String,
    pub link: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RevertResponse {
    pub message: &'static str,
    pub edition_reopened: bool,
}

/// GET /api/v1/magazine-deadlines/campaign-action/{id}
pub async fn list_for_action(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(campaign_action_id): Path<DbId>,
) -> AppResult<Json<Vec<DeadlineConfirmation>>> {
    CampaignActionRepo::find_by_id(&state.pool, campaign_action_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "CampaignAction",
            id: campaign_action_id,
        }))?;

    let confirmations =
        DeadlineConfirmationRepo::list_for_action(&state.pool, campaign_action_id).await?;
    Ok(Json(confirmations))
}

/// POST /api/v1/magazine-deadlines/campaign-action/{id}/confirm
pub async fn confirm(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(campaign_action_id): Path<DbId>,
    Json(input): Json<ConfirmDeadlineRequest>,
) -> AppResult<impl IntoResponse> {
    let confirmations = workflow::confirm_deadline(
        &state.pool,
        &auth.actor(),
        campaign_action_id,
        &input.deadline_type,
        input.link.as_deref(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(confirmations)))
}

/// POST /api/v1/magazine-deadlines/confirmations/{id}/revert
pub async fn revert(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(confirmation_id): Path<DbId>,
) -> AppResult<Json<RevertResponse>> {
    let outcome = workflow::revert_confirmation(&state.pool, &auth.actor(), confirmation_id).await?;
    Ok(Json(RevertResponse {
        message: "Confirmation reverted",
        edition_reopened: outcome.edition_reopened,
    }))
}
