//! Campaign actions and their edition-scoped projections.

use pressdesk_core::deadlines::steps::ContentTrack;
use pressdesk_core::types::{CalendarDate, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `campaign_actions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CampaignAction {
    pub id: DbId,
    pub campaign_id: DbId,
    pub medium_id: DbId,
    pub action_id: DbId,
    pub edition_id: Option<DbId>,
    pub quantity: i32,
    pub start_date: Option<CalendarDate>,
    pub end_date: Option<CalendarDate>,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateCampaignAction {
    pub campaign_id: DbId,
    pub medium_id: DbId,
    pub action_id: DbId,
    pub edition_id: Option<DbId>,
    pub quantity: Option<i32>,
    pub start_date: Option<CalendarDate>,
    pub end_date: Option<CalendarDate>,
}

/// A campaign action inside an edition, joined with its campaign, company,
/// responsible user and action type.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct EditionCampaign {
    pub campaign_action_id: DbId,
    pub action_type_id: DbId,
    pub action_name: String,
    pub magazine_content_type: Option<String>,
    pub campaign_id: DbId,
    pub campaign_name: String,
    pub company_id: DbId,
    pub company_name: String,
    pub user_id: DbId,
    pub user_name: String,
    pub user_email: String,
    pub start_date: Option<CalendarDate>,
    pub end_date: Option<CalendarDate>,
    pub status: String,
}

impl EditionCampaign {
    /// The deadline track, or `None` for actions outside the magazine workflow.
    pub fn track(&self) -> Option<ContentTrack> {
        self.magazine_content_type.as_deref()?.parse().ok()
    }
}

/// What the ledger needs to know about an action, read under a row lock.
#[derive(Debug, Clone, FromRow)]
pub struct LockedAction {
    pub campaign_action_id: DbId,
    pub edition_id: Option<DbId>,
    pub magazine_content_type: Option<String>,
    pub edition_completed: Option<bool>,
}

impl LockedAction {
    pub fn track(&self) -> Option<ContentTrack> {
        self.magazine_content_type.as_deref()?.parse().ok()
    }
}
