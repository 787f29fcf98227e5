//! Repository for the `availability_templates` table.

use atelier_core::types::WeekdayIndex;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::availability_template::{AvailabilityTemplate, UpsertTemplate};

const COLUMNS: &str = "id, weekday, is_active, time_slots, updated_at";

/// Provides access to the seven weekday template rows.
pub struct AvailabilityTemplateRepo;

impl AvailabilityTemplateRepo {
    /// Find the template for one weekday (0 = Sunday .. 6 = Saturday).
    pub async fn find_by_weekday(
        pool: &PgPool,
        weekday: WeekdayIndex,
    ) -> Result<Option<AvailabilityTemplate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM availability_templates WHERE weekday = $1");
        sqlx::query_as::<_, AvailabilityTemplate>(&query)
            .bind(weekday)
            .fetch_optional(pool)
            .await
    }

    /// List all weekday templates in weekday order.
    pub async fn list(pool: &PgPool) -> Result<Vec<AvailabilityTemplate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM availability_templates ORDER BY weekday");
        sqlx::query_as::<_, AvailabilityTemplate>(&query)
            .fetch_all(pool)
            .await
    }

    /// Replace a weekday's template, inserting the row if it does not exist
    /// yet.
    pub async fn upsert(
        pool: &PgPool,
        weekday: WeekdayIndex,
        input: &UpsertTemplate,
    ) -> Result<AvailabilityTemplate, sqlx::Error> {
        let query = format!(
            "INSERT INTO availability_templates (weekday, is_active, time_slots)
             VALUES ($1, $2, $3)
             ON CONFLICT (weekday) DO UPDATE
                 SET is_active = EXCLUDED.is_active,
                     time_slots = EXCLUDED.time_slots,
                     updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AvailabilityTemplate>(&query)
            .bind(weekday)
            .bind(input.is_active)
            .bind(Json(&input.time_slots))
            .fetch_one(pool)
            .await
    }
}
