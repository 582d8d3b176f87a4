//! Deadline confirmation ledger rows.

use pressdesk_core::deadlines::ledger::{ConfirmationRecord, LedgerEntry};
use pressdesk_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A ledger row joined with the confirming and reverting users' names.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DeadlineConfirmation {
    pub id: DbId,
    pub campaign_action_id: DbId,
    pub deadline_type: String,
    pub confirmed_by: DbId,
    pub confirmed_by_name: String,
    pub confirmed_by_email: String,
    pub confirmed_at: Timestamp,
    pub link: Option<String>,
    pub reverted: bool,
    pub reverted_at: Option<Timestamp>,
    pub reverted_by: Option<DbId>,
    pub reverted_by_name: Option<String>,
}

impl LedgerEntry for DeadlineConfirmation {
    fn deadline_type(&self) -> &str {
        &self.deadline_type
    }

    fn is_reverted(&self) -> bool {
        self.reverted
    }
}

impl From<DeadlineConfirmation> for ConfirmationRecord {
    fn from(row: DeadlineConfirmation) -> Self {
        Self {
            id: row.id,
            campaign_action_id: row.campaign_action_id,
            deadline_type: row.deadline_type,
            confirmed_by: row.confirmed_by,
            confirmed_by_name: row.confirmed_by_name,
            confirmed_by_email: row.confirmed_by_email,
            confirmed_at: row.confirmed_at,
            link: row.link,
            reverted: row.reverted,
            reverted_at: row.reverted_at,
            reverted_by: row.reverted_by,
            reverted_by_name: row.reverted_by_name,
        }
    }
}

/// DTO for inserting a confirmation.
#[derive(Debug, Clone)]
pub struct CreateDeadlineConfirmation {
    pub campaign_action_id: DbId,
    pub deadline_type: String,
    pub confirmed_by: DbId,
    pub link: Option<String>,
}
