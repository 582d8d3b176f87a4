//! Route definitions for magazine editions.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::magazines;
use crate::state::AppState;

/// Routes mounted at `/magazines`.
///
/// ```text
/// GET    /                     -> list
/// POST   /                     -> create (admin)
/// GET    /medium/{medium_id}   -> list_by_medium
/// GET    /{id}                 -> get_by_id
/// PUT    /{id}                 -> update (admin)
/// DELETE /{id}                 -> delete (admin)
/// GET    /{id}/campaigns       -> campaigns
/// GET    /{id}/deadlines       -> deadlines
/// PUT    /{id}/complete        -> complete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(magazines::list).post(magazines::create))
        .route("/medium/{medium_id}", get(magazines::list_by_medium))
        .route(
            "/{id}",
            get(magazines::get_by_id)
                .put(magazines::update)
                .delete(magazines::delete),
        )
        .route("/{id}/campaigns", get(magazines::campaigns))
        .route("/{id}/deadlines", get(magazines::deadlines))
        .route("/{id}/complete", put(magazines::complete))
}
