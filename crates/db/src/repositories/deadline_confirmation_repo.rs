//! Repository for the `magazine_deadline_confirmations` ledger.
//!
//! Rows are only ever inserted or flagged as reverted, never deleted.

use pressdesk_core::types::DbId;
use sqlx::{FromRow, PgPool, Postgres, Transaction};

use crate::models::deadline_confirmation::{CreateDeadlineConfirmation, DeadlineConfirmation};

const COLUMNS: &str = "c.id, c.campaign_action_id, c.deadline_type, c.confirmed_by, \
    cu.name AS confirmed_by_name, cu.email AS confirmed_by_email, c.confirmed_at, c.link, \
    c.reverted, c.reverted_at, c.reverted_by, ru.name AS reverted_by_name";

const FROM: &str = "magazine_deadline_confirmations c \
    JOIN users cu ON cu.id = c.confirmed_by \
    LEFT JOIN users ru ON ru.id = c.reverted_by";

/// A confirmation locked for reverting, with its owning edition.
#[derive(Debug, Clone, FromRow)]
pub struct RevertTarget {
    pub id: DbId,
    pub campaign_action_id: DbId,
    pub deadline_type: String,
    pub reverted: bool,
    pub edition_id: Option<DbId>,
}

/// One active confirmation inside an edition.
#[derive(Debug, Clone, FromRow)]
pub struct ActiveStep {
    pub campaign_action_id: DbId,
    pub deadline_type: String,
}

pub struct DeadlineConfirmationRepo;

impl DeadlineConfirmationRepo {
    /// Every confirmation of an action, reverted ones included, oldest first.
    pub async fn list_for_action(
        pool: &PgPool,
        campaign_action_id: DbId,
    ) -> Result<Vec<DeadlineConfirmation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {FROM} \
             WHERE c.campaign_action_id = $1 \
             ORDER BY c.confirmed_at, c.id"
        );
        sqlx::query_as::<_, DeadlineConfirmation>(&query)
            .bind(campaign_action_id)
            .fetch_all(pool)
            .await
    }

    /// Same as [`Self::list_for_action`], inside an open transaction.
    pub async fn list_for_action_tx(
        tx: &mut Transaction<'_, Postgres>,
        campaign_action_id: DbId,
    ) -> Result<Vec<DeadlineConfirmation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {FROM} \
             WHERE c.campaign_action_id = $1 \
             ORDER BY c.confirmed_at, c.id"
        );
        sqlx::query_as::<_, DeadlineConfirmation>(&query)
            .bind(campaign_action_id)
            .fetch_all(&mut **tx)
            .await
    }

    /// Insert a confirmation, returning its id.
    ///
    /// A second active row for the same step violates
    /// `uq_active_deadline_confirmation`.
    pub async fn create(
        tx: &mut Transaction<'_, Postgres>,
        input: &CreateDeadlineConfirmation,
    ) -> Result<DbId, sqlx::Error> {
        let row: (DbId,) = sqlx::query_as(
            "INSERT INTO magazine_deadline_confirmations
                (campaign_action_id, deadline_type, confirmed_by, link)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(input.campaign_action_id)
        .bind(&input.deadline_type)
        .bind(input.confirmed_by)
        .bind(&input.link)
        .fetch_one(&mut **tx)
        .await?;
        Ok(row.0)
    }

    /// Lock a confirmation row for reverting.
    pub async fn lock_for_revert(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
    ) -> Result<Option<RevertTarget>, sqlx::Error> {
        sqlx::query_as::<_, RevertTarget>(
            "SELECT c.id, c.campaign_action_id, c.deadline_type, c.reverted, ca.edition_id \
             FROM magazine_deadline_confirmations c \
             JOIN campaign_actions ca ON ca.id = c.campaign_action_id \
             WHERE c.id = $1 \
             FOR UPDATE OF c",
        )
        .bind(id)
        .fetch_optional(&mut **tx)
        .await
    }

    /// Flag a confirmation as reverted by `reverted_by`.
    ///
    /// Returns `false` if the row was already reverted.
    pub async fn mark_reverted(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
        reverted_by: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE magazine_deadline_confirmations SET
                reverted = true,
                reverted_at = NOW(),
                reverted_by = $2
             WHERE id = $1 AND reverted = false",
        )
        .bind(id)
        .bind(reverted_by)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Active confirmations for every action placed in an edition.
    pub async fn active_for_edition(
        tx: &mut Transaction<'_, Postgres>,
        edition_id: DbId,
    ) -> Result<Vec<ActiveStep>, sqlx::Error> {
        sqlx::query_as::<_, ActiveStep>(
            "SELECT c.campaign_action_id, c.deadline_type \
             FROM magazine_deadline_confirmations c \
             JOIN campaign_actions ca ON ca.id = c.campaign_action_id \
             WHERE ca.edition_id = $1 AND NOT c.reverted",
        )
        .bind(edition_id)
        .fetch_all(&mut **tx)
        .await
    }
}
