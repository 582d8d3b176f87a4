use axum::routing::get;
use axum::Router;

use crate::handlers::mediums;
use crate::state::AppState;

/// Routes mounted at `/mediums`.
///
/// ```text
/// GET  /    -> list
/// POST /    -> create (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(mediums::list).post(mediums::create))
}
