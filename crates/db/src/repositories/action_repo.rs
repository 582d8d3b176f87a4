//! Repository for the `actions` table (action types).

use pressdesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::action::{Action, CreateAction};

const COLUMNS: &str = "id, name, magazine_content_type, created_at, updated_at";

pub struct ActionRepo;

impl ActionRepo {
    pub async fn create(pool: &PgPool, input: &CreateAction) -> Result<Action, sqlx::Error> {
        let query = format!(
            "INSERT INTO actions (name, magazine_content_type)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Action>(&query)
            .bind(&input.name)
            .bind(input.magazine_content_type.map(|t| t.as_str()))
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Action>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM actions WHERE id = $1");
        sqlx::query_as::<_, Action>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
