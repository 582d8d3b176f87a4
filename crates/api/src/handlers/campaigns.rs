//! Handlers for campaign actions.

use axum::extract::{Path, State};
use axum::Json;
use pressdesk_core::types::DbId;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::workflow;

#[derive(Debug, Deserialize)]
pub struct MoveActionRequest {
    pub target_edition_id: DbId,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// PUT /api/v1/campaigns/actions/{id}/move
pub async fn move_action(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(campaign_action_id): Path<DbId>,
    Json(input): Json<MoveActionRequest>,
) -> AppResult<Json<MessageResponse>> {
    workflow::move_action(
        &state.pool,
        &auth.actor(),
        campaign_action_id,
        input.target_edition_id,
    )
    .await?;
    Ok(Json(MessageResponse {
        message: "Campaign action moved",
    }))
}
