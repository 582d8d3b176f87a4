//! Repository for the `campaign_actions` table.

use pressdesk_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::campaign_action::{
    CampaignAction, CreateCampaignAction, EditionCampaign, LockedAction,
};

const COLUMNS: &str = "id, campaign_id, medium_id, action_id, edition_id, quantity, \
    start_date, end_date, status, notes, created_at, updated_at";

/// Projection used by the edition view.
const EDITION_CAMPAIGN_QUERY: &str = "\
    SELECT ca.id AS campaign_action_id, a.id AS action_type_id, a.name AS action_name, \
           a.magazine_content_type, c.id AS campaign_id, c.name AS campaign_name, \
           co.id AS company_id, co.name AS company_name, \
           u.id AS user_id, u.name AS user_name, u.email AS user_email, \
           ca.start_date, ca.end_date, ca.status \
    FROM campaign_actions ca \
    JOIN actions a ON a.id = ca.action_id \
    JOIN campaigns c ON c.id = ca.campaign_id \
    JOIN companies co ON co.id = c.company_id \
    JOIN users u ON u.id = c.created_by \
    WHERE ca.edition_id = $1 \
    ORDER BY co.name, ca.id";

pub struct CampaignActionRepo;

impl CampaignActionRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateCampaignAction,
    ) -> Result<CampaignAction, sqlx::Error> {
        let query = format!(
            "INSERT INTO campaign_actions
                (campaign_id, medium_id, action_id, edition_id, quantity, start_date, end_date)
             VALUES ($1, $2, $3, $4, COALESCE($5, 1), $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CampaignAction>(&query)
            .bind(input.campaign_id)
            .bind(input.medium_id)
            .bind(input.action_id)
            .bind(input.edition_id)
            .bind(input.quantity)
            .bind(input.start_date)
            .bind(input.end_date)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<CampaignAction>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM campaign_actions WHERE id = $1");
        sqlx::query_as::<_, CampaignAction>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All campaign actions placed in an edition, with campaign and company details.
    pub async fn list_for_edition(
        pool: &PgPool,
        edition_id: DbId,
    ) -> Result<Vec<EditionCampaign>, sqlx::Error> {
        sqlx::query_as::<_, EditionCampaign>(EDITION_CAMPAIGN_QUERY)
            .bind(edition_id)
            .fetch_all(pool)
            .await
    }

    /// Same as [`Self::list_for_edition`], inside an open transaction.
    pub async fn list_for_edition_tx(
        tx: &mut Transaction<'_, Postgres>,
        edition_id: DbId,
    ) -> Result<Vec<EditionCampaign>, sqlx::Error> {
        sqlx::query_as::<_, EditionCampaign>(EDITION_CAMPAIGN_QUERY)
            .bind(edition_id)
            .fetch_all(&mut **tx)
            .await
    }

    /// Lock an action row for a ledger mutation and read its edition state.
    ///
    /// Concurrent confirmations for the same action serialize on this lock.
    pub async fn lock(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
    ) -> Result<Option<LockedAction>, sqlx::Error> {
        sqlx::query_as::<_, LockedAction>(
            "SELECT ca.id AS campaign_action_id, ca.edition_id, a.magazine_content_type, \
                    e.is_completed AS edition_completed \
             FROM campaign_actions ca \
             JOIN actions a ON a.id = ca.action_id \
             LEFT JOIN magazine_editions e ON e.id = ca.edition_id \
             WHERE ca.id = $1 \
             FOR UPDATE OF ca",
        )
        .bind(id)
        .fetch_optional(&mut **tx)
        .await
    }

    /// Reassign an action to another edition. Its ledger history is untouched.
    pub async fn move_to_edition(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
        target_edition_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE campaign_actions SET edition_id = $2 WHERE id = $1")
            .bind(id)
            .bind(target_edition_id)
            .execute(&mut **tx)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
