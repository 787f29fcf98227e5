//! Repository for the `events` table.

use atelier_core::types::DbId;
use sqlx::PgPool;

use crate::models::event::EventRecord;

const COLUMNS: &str =
    "id, event_type, source_entity_type, source_entity_id, actor_user_id, payload, created_at";

/// Provides append/read access to the platform event log.
pub struct EventRepo;

impl EventRepo {
    /// Append an event, returning its generated ID.
    pub async fn insert(
        pool: &PgPool,
        event_type: &str,
        source_entity_type: Option<&str>,
        source_entity_id: Option<DbId>,
        actor_user_id: Option<DbId>,
        payload: &serde_json::Value,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO events
                 (event_type, source_entity_type, source_entity_id, actor_user_id, payload)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
        )
        .bind(event_type)
        .bind(source_entity_type)
        .bind(source_entity_id)
        .bind(actor_user_id)
        .bind(payload)
        .fetch_one(pool)
        .await
    }

    /// The most recent events, newest first (admin activity feed).
    pub async fn list_recent(pool: &PgPool, limit: i64) -> Result<Vec<EventRecord>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM events ORDER BY created_at DESC, id DESC LIMIT $1");
        sqlx::query_as::<_, EventRecord>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
