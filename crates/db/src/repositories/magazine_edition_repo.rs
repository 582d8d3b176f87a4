//! Repository for the `magazine_editions` table.

use pressdesk_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::magazine_edition::{
    CreateMagazineEdition, MagazineEdition, UpdateMagazineEdition,
};

/// Column list over `magazine_editions e JOIN mediums m`.
const COLUMNS: &str = "e.id, e.medium_id, m.name AS medium_name, e.publication_date, e.status, \
    e.publication_link, e.is_completed, e.created_at, e.updated_at";

const FROM: &str = "magazine_editions e JOIN mediums m ON m.id = e.medium_id";

pub struct MagazineEditionRepo;

impl MagazineEditionRepo {
    /// Insert a new edition in `draft`, returning it with its medium name.
    pub async fn create(
        pool: &PgPool,
        input: &CreateMagazineEdition,
    ) -> Result<MagazineEdition, sqlx::Error> {
        let query = format!(
            "WITH e AS (
                INSERT INTO magazine_editions (medium_id, publication_date)
                VALUES ($1, $2)
                RETURNING *
             )
             SELECT {COLUMNS} FROM e JOIN mediums m ON m.id = e.medium_id"
        );
        sqlx::query_as::<_, MagazineEdition>(&query)
            .bind(input.medium_id)
            .bind(input.publication_date)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<MagazineEdition>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {FROM} WHERE e.id = $1");
        sqlx::query_as::<_, MagazineEdition>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All editions, earliest publication first.
    pub async fn list(pool: &PgPool) -> Result<Vec<MagazineEdition>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {FROM} ORDER BY e.publication_date, e.id");
        sqlx::query_as::<_, MagazineEdition>(&query)
            .fetch_all(pool)
            .await
    }

    pub async fn list_by_medium(
        pool: &PgPool,
        medium_id: DbId,
    ) -> Result<Vec<MagazineEdition>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {FROM} WHERE e.medium_id = $1 ORDER BY e.publication_date, e.id"
        );
        sqlx::query_as::<_, MagazineEdition>(&query)
            .bind(medium_id)
            .fetch_all(pool)
            .await
    }

    /// Lock an edition row for the rest of the transaction.
    pub async fn lock(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
    ) -> Result<Option<MagazineEdition>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {FROM} WHERE e.id = $1 FOR UPDATE OF e");
        sqlx::query_as::<_, MagazineEdition>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Update an edition. Only non-`None` fields in `input` are applied.
    pub async fn update(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
        input: &UpdateMagazineEdition,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE magazine_editions SET
                publication_date = COALESCE($2, publication_date),
                status = COALESCE($3, status)
             WHERE id = $1",
        )
        .bind(id)
        .bind(input.publication_date)
        .bind(&input.status)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark an edition completed and published with its publication link.
    pub async fn complete(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
        publication_link: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE magazine_editions SET
                is_completed = true,
                status = 'published',
                publication_link = $2
             WHERE id = $1",
        )
        .bind(id)
        .bind(publication_link)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Undo completion: clear the flag and the link and set `status`.
    pub async fn reopen(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
        status: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE magazine_editions SET
                is_completed = false,
                status = $2,
                publication_link = NULL
             WHERE id = $1",
        )
        .bind(id)
        .bind(status)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Whether any action in the edition has ledger rows, reverted ones included.
    pub async fn has_confirmation_history(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let row: (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                SELECT 1 FROM magazine_deadline_confirmations c
                JOIN campaign_actions ca ON ca.id = c.campaign_action_id
                WHERE ca.edition_id = $1
             )",
        )
        .bind(id)
        .fetch_one(&mut **tx)
        .await?;
        Ok(row.0)
    }

    /// Delete an edition. Its campaign actions are detached by the foreign key.
    pub async fn delete(tx: &mut Transaction<'_, Postgres>, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM magazine_editions WHERE id = $1")
            .bind(id)
            .execute(&mut **tx)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
