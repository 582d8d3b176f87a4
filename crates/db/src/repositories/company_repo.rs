//! Repository for the `companies` table.

use pressdesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::company::{Company, CreateCompany};

const COLUMNS: &str = "id, name, tax_number, billing_country, created_at, updated_at";

pub struct CompanyRepo;

impl CompanyRepo {
    pub async fn create(pool: &PgPool, input: &CreateCompany) -> Result<Company, sqlx::Error> {
        let query = format!(
            "INSERT INTO companies (name, tax_number, billing_country)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Company>(&query)
            .bind(&input.name)
            .bind(&input.tax_number)
            .bind(&input.billing_country)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Company>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM companies WHERE id = $1");
        sqlx::query_as::<_, Company>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
