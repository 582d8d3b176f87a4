use pressdesk_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Campaign {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub company_id: DbId,
    pub created_by: DbId,
    pub completed: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateCampaign {
    pub name: String,
    pub description: Option<String>,
    pub company_id: DbId,
    pub created_by: DbId,
}
