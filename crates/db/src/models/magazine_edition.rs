//! Magazine edition entity model and DTOs.

use pressdesk_core::types::{CalendarDate, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from `magazine_editions`, joined with its medium's name.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct MagazineEdition {
    pub id: DbId,
    pub medium_id: DbId,
    pub medium_name: String,
    pub publication_date: CalendarDate,
    pub status: String,
    pub publication_link: Option<String>,
    pub is_completed: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct CreateMagazineEdition {
    pub medium_id: DbId,
    pub publication_date: CalendarDate,
}

/// DTO for updating an edition. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMagazineEdition {
    pub publication_date: Option<CalendarDate>,
    pub status: Option<String>,
}
