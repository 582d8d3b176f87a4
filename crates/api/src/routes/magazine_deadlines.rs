//! Route definitions for the deadline confirmation ledger.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::deadlines;
use crate::state::AppState;

/// Routes mounted at `/magazine-deadlines`.
///
/// ```text
/// GET  /campaign-action/{id}           -> list_for_action
/// POST /campaign-action/{id}/confirm   -> confirm
/// POST /confirmations/{id}/revert      -> revert (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/campaign-action/{id}", get(deadlines::list_for_action))
        .route("/campaign-action/{id}/confirm", post(deadlines::confirm))
        .route("/confirmations/{id}/revert", post(deadlines::revert))
}
