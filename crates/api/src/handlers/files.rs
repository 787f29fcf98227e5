//! Handlers for the `/files` resource (assistant knowledge base).
//!
//! An uploaded file is stored twice: the raw bytes go to the object-storage
//! bucket (so staff can re-download them) and a copy goes to the LLM
//! provider's file store (so the assistant can search it). The database row
//! ties the two together.

use atelier_core::error::CoreError;
use atelier_core::types::DbId;
use atelier_db::models::assistant_file::{AssistantFile, CreateAssistantFile};
use atelier_db::repositories::AssistantFileRepo;
use atelier_events::PlatformEvent;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AdminUser, AuthUser};
use crate::state::AppState;

/// Uploads larger than this are rejected outright.
const MAX_FILE_BYTES: usize = 20 * 1024 * 1024;

/// GET /api/v1/files (staff)
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<Vec<AssistantFile>>> {
    let files = AssistantFileRepo::list(&state.pool).await?;
    Ok(Json(files))
}

/// POST /api/v1/files (admin, multipart)
///
/// Expects a single `file` part. The storage key is prefixed with a UUID so
/// re-uploading the same filename never clobbers an existing object.
pub async fn upload(
    State(state): State<AppState>,
    admin: AdminUser,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<AssistantFile>)> {
    let Some(assistant) = &state.assistant else {
        return Err(AppError::ServiceUnavailable(
            "Chat assistant is not configured".into(),
        ));
    };
    let Some(storage) = &state.storage else {
        return Err(AppError::ServiceUnavailable(
            "File storage is not configured".into(),
        ));
    };

    let mut upload: Option<(String, String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field
            .file_name()
            .unwrap_or("upload.bin")
            .to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {e}")))?;
        if bytes.len() > MAX_FILE_BYTES {
            return Err(AppError::Core(CoreError::Validation(format!(
                "File exceeds the {} MB limit",
                MAX_FILE_BYTES / (1024 * 1024)
            ))));
        }
        upload = Some((filename, content_type, bytes.to_vec()));
        break;
    }

    let Some((filename, content_type, bytes)) = upload else {
        return Err(AppError::BadRequest("Missing 'file' part".into()));
    };

    let storage_key = format!("assistant/{}-{}", Uuid::new_v4(), filename);
    storage
        .put_object(&storage_key, &content_type, bytes.clone())
        .await
        .map_err(|e| AppError::ServiceUnavailable(format!("Storage upload failed: {e}")))?;

    let provider_file = match assistant.upload_file(&filename, &content_type, bytes).await {
        Ok(file) => file,
        Err(e) => {
            // Keep the two stores consistent: drop the bucket object again.
            if let Err(cleanup) = storage.delete_object(&storage_key).await {
                tracing::warn!(key = %storage_key, error = %cleanup, "Orphan cleanup failed");
            }
            return Err(AppError::ServiceUnavailable(format!(
                "LLM file upload failed: {e}"
            )));
        }
    };

    let file = AssistantFileRepo::create(
        &state.pool,
        &CreateAssistantFile {
            filename,
            content_type,
            storage_key,
            provider_file_id: provider_file.id,
            uploaded_by: Some(admin.0.user_id),
        },
    )
    .await?;

    state.event_bus.publish(
        PlatformEvent::new("assistant_file.uploaded")
            .with_source("assistant_file", file.id)
            .with_actor(admin.0.user_id),
    );

    Ok((StatusCode::CREATED, Json(file)))
}

/// DELETE /api/v1/files/{id} (admin)
///
/// Removes the file from the provider, the bucket, and the database. A
/// missing remote copy is logged and skipped rather than blocking the
/// delete.
pub async fn delete(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let file = AssistantFileRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "File", id }))?;

    if let Some(assistant) = &state.assistant {
        if let Err(e) = assistant.delete_file(&file.provider_file_id).await {
            tracing::warn!(file_id = %file.provider_file_id, error = %e, "Provider delete failed");
        }
    }
    if let Some(storage) = &state.storage {
        if let Err(e) = storage.delete_object(&file.storage_key).await {
            tracing::warn!(key = %file.storage_key, error = %e, "Storage delete failed");
        }
    }

    AssistantFileRepo::delete(&state.pool, id).await?;

    state.event_bus.publish(
        PlatformEvent::new("assistant_file.deleted")
            .with_source("assistant_file", id)
            .with_actor(admin.0.user_id),
    );

    Ok(StatusCode::NO_CONTENT)
}
