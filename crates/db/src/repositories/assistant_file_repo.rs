//! Repository for the `assistant_files` table.

use atelier_core::types::DbId;
use sqlx::PgPool;

use crate::models::assistant_file::{AssistantFile, CreateAssistantFile};

const COLUMNS: &str =
    "id, filename, content_type, storage_key, provider_file_id, uploaded_by, created_at";

/// Provides knowledge-base file bookkeeping.
pub struct AssistantFileRepo;

impl AssistantFileRepo {
    /// Record an uploaded file, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateAssistantFile,
    ) -> Result<AssistantFile, sqlx::Error> {
        let query = format!(
            "INSERT INTO assistant_files
                 (filename, content_type, storage_key, provider_file_id, uploaded_by)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AssistantFile>(&query)
            .bind(&input.filename)
            .bind(&input.content_type)
            .bind(&input.storage_key)
            .bind(&input.provider_file_id)
            .bind(input.uploaded_by)
            .fetch_one(pool)
            .await
    }

    /// Find a file by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<AssistantFile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM assistant_files WHERE id = $1");
        sqlx::query_as::<_, AssistantFile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all knowledge-base files, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<AssistantFile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM assistant_files ORDER BY created_at DESC");
        sqlx::query_as::<_, AssistantFile>(&query)
            .fetch_all(pool)
            .await
    }

    /// The provider file ids used for file-search grounding on every chat
    /// request.
    pub async fn provider_file_ids(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT provider_file_id FROM assistant_files ORDER BY id")
            .fetch_all(pool)
            .await
    }

    /// Delete a file record. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM assistant_files WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
