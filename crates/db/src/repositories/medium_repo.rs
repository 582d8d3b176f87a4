//! Repository for the `mediums` table.

use pressdesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::medium::{CreateMedium, Medium};

const COLUMNS: &str = "id, name, created_at, updated_at";

pub struct MediumRepo;

impl MediumRepo {
    pub async fn create(pool: &PgPool, input: &CreateMedium) -> Result<Medium, sqlx::Error> {
        let query = format!("INSERT INTO mediums (name) VALUES ($1) RETURNING {COLUMNS}");
        sqlx::query_as::<_, Medium>(&query)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Medium>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM mediums WHERE id = $1");
        sqlx::query_as::<_, Medium>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all mediums alphabetically.
    pub async fn list(pool: &PgPool) -> Result<Vec<Medium>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM mediums ORDER BY name");
        sqlx::query_as::<_, Medium>(&query).fetch_all(pool).await
    }
}
