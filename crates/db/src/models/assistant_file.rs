//! Assistant knowledge-base file model.

use atelier_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A knowledge-base file row from `assistant_files`.
///
/// Each file lives in two places: the object-storage bucket (`storage_key`)
/// and the LLM provider's file store (`provider_file_id`, used for
/// file-search grounding).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AssistantFile {
    pub id: DbId,
    pub filename: String,
    pub content_type: String,
    pub storage_key: String,
    pub provider_file_id: String,
    pub uploaded_by: Option<DbId>,
    pub created_at: Timestamp,
}

/// DTO for recording an uploaded file.
#[derive(Debug, Clone)]
pub struct CreateAssistantFile {
    pub filename: String,
    pub content_type: String,
    pub storage_key: String,
    pub provider_file_id: String,
    pub uploaded_by: Option<DbId>,
}
