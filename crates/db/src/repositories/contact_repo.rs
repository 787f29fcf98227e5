//! Repository for the `contacts` table.

use atelier_core::types::DbId;
use sqlx::PgPool;

use crate::models::contact::{Contact, CreateContact, UpdateContact};

const COLUMNS: &str = "id, first_name, last_name, email, phone, company_id, notes, user_id, \
                       created_at, updated_at";

/// Provides CRUD operations for contacts.
pub struct ContactRepo;

impl ContactRepo {
    /// Insert a new contact, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateContact) -> Result<Contact, sqlx::Error> {
        let query = format!(
            "INSERT INTO contacts (first_name, last_name, email, phone, company_id, notes)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Contact>(&query)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(input.company_id)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// Find a contact by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Contact>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM contacts WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Contact>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all contacts, most recently created first. Excludes soft-deleted
    /// rows. `company_id` narrows to one company when given.
    pub async fn list(
        pool: &PgPool,
        company_id: Option<DbId>,
    ) -> Result<Vec<Contact>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM contacts
             WHERE deleted_at IS NULL AND ($1::bigint IS NULL OR company_id = $1)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Contact>(&query)
            .bind(company_id)
            .fetch_all(pool)
            .await
    }

    /// Update a contact. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateContact,
    ) -> Result<Option<Contact>, sqlx::Error> {
        let query = format!(
            "UPDATE contacts SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                email = COALESCE($4, email),
                phone = COALESCE($5, phone),
                company_id = COALESCE($6, company_id),
                notes = COALESCE($7, notes)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Contact>(&query)
            .bind(id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(input.company_id)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    /// Link or unlink the platform user backing this contact's system access.
    pub async fn set_user(
        pool: &PgPool,
        id: DbId,
        user_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE contacts SET user_id = $2 WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .bind(user_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Soft-delete a contact. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE contacts SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
