//! Action types (e.g. "Artículo técnico", "Anuncio doble página").

use pressdesk_core::deadlines::steps::ContentTrack;
use pressdesk_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Action {
    pub id: DbId,
    pub name: String,
    /// `technical`, `ad`, or `NULL` for actions outside the magazine workflow.
    pub magazine_content_type: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateAction {
    pub name: String,
    pub magazine_content_type: Option<ContentTrack>,
}
