pub mod auth;
pub mod campaigns;
pub mod health;
pub mod magazine_deadlines;
pub mod magazines;
pub mod mediums;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                        login (public)
/// /auth/me                                           current user
///
/// /mediums                                           list, create (admin)
///
/// /magazines                                         list, create (admin)
/// /magazines/medium/{medium_id}                      list by medium
/// /magazines/{id}                                    get, update (admin), delete (admin)
/// /magazines/{id}/campaigns                          edition with its campaign actions
/// /magazines/{id}/deadlines                          computed deadline schedule
/// /magazines/{id}/complete                           complete edition (PUT)
///
/// /magazine-deadlines/campaign-action/{id}           list confirmations
/// /magazine-deadlines/campaign-action/{id}/confirm   confirm a step (POST)
/// /magazine-deadlines/confirmations/{id}/revert      revert a confirmation (POST, admin)
///
/// /campaigns/actions/{id}/move                       move to another edition (PUT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/mediums", mediums::router())
        .nest("/magazines", magazines::router())
        .nest("/magazine-deadlines", magazine_deadlines::router())
        .nest("/campaigns", campaigns::router())
}
