//! Repository for the `campaigns` table.

use pressdesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::campaign::{Campaign, CreateCampaign};

const COLUMNS: &str =
    "id, name, description, company_id, created_by, completed, created_at, updated_at";

pub struct CampaignRepo;

impl CampaignRepo {
    pub async fn create(pool: &PgPool, input: &CreateCampaign) -> Result<Campaign, sqlx::Error> {
        let query = format!(
            "INSERT INTO campaigns (name, description, company_id, created_by)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.company_id)
            .bind(input.created_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Campaign>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM campaigns WHERE id = $1");
        sqlx::query_as::<_, Campaign>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
