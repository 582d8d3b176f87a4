//! Handlers for the `/mediums` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use pressdesk_core::error::CoreError;
use pressdesk_db::models::medium::{CreateMedium, Medium};
use pressdesk_db::repositories::MediumRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// GET /api/v1/mediums
pub async fn list(_auth: AuthUser, State(state): State<AppState>) -> AppResult<Json<Vec<Medium>>> {
    Ok(Json(MediumRepo::list(&state.pool).await?))
}

/// POST /api/v1/mediums
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateMedium>,
) -> AppResult<impl IntoResponse> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Medium name must not be empty".into(),
        )));
    }
    let medium = MediumRepo::create(
        &state.pool,
        &CreateMedium {
            name: input.name.trim().to_string(),
        },
    )
    .await?;

    tracing::info!(medium_id = medium.id, user_id = admin.user_id, "Medium created");

    Ok((StatusCode::CREATED, Json(medium)))
}
