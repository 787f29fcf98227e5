//! Repository for the `companies` table.

use atelier_core::types::DbId;
use sqlx::PgPool;

use crate::models::company::{Company, CreateCompany, UpdateCompany};

const COLUMNS: &str = "id, name, website, notes, created_at, updated_at";

/// Provides CRUD operations for companies.
pub struct CompanyRepo;

impl CompanyRepo {
    /// Insert a new company, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateCompany) -> Result<Company, sqlx::Error> {
        let query = format!(
            "INSERT INTO companies (name, website, notes)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Company>(&query)
            .bind(&input.name)
            .bind(&input.website)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// Find a company by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Company>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM companies WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Company>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all companies alphabetically. Excludes soft-deleted rows.
    pub async fn list(pool: &PgPool) -> Result<Vec<Company>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM companies WHERE deleted_at IS NULL ORDER BY name");
        sqlx::query_as::<_, Company>(&query).fetch_all(pool).await
    }

    /// Update a company. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCompany,
    ) -> Result<Option<Company>, sqlx::Error> {
        let query = format!(
            "UPDATE companies SET
                name = COALESCE($2, name),
                website = COALESCE($3, website),
                notes = COALESCE($4, notes)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Company>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.website)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a company. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE companies SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
