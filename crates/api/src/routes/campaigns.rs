use axum::routing::put;
use axum::Router;

use crate::handlers::campaigns;
use crate::state::AppState;

/// Routes mounted at `/campaigns`.
///
/// ```text
/// PUT /actions/{id}/move   -> move_action (admin, comercial)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/actions/{id}/move", put(campaigns::move_action))
}
