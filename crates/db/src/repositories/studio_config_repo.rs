//! Repository for the `studio_config` singleton.

use sqlx::PgPool;

use crate::models::studio_config::{StudioConfig, UpdateStudioConfig};

const COLUMNS: &str = "user_display_mode, allow_multiple_time_slots, timezone, updated_at";

/// Provides access to the single studio configuration row (id = 1, seeded by
/// the migrations).
pub struct StudioConfigRepo;

impl StudioConfigRepo {
    /// Load the configuration row.
    pub async fn get(pool: &PgPool) -> Result<StudioConfig, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM studio_config WHERE id = 1");
        sqlx::query_as::<_, StudioConfig>(&query).fetch_one(pool).await
    }

    /// Update the configuration. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        input: &UpdateStudioConfig,
    ) -> Result<StudioConfig, sqlx::Error> {
        let query = format!(
            "UPDATE studio_config SET
                user_display_mode = COALESCE($1, user_display_mode),
                allow_multiple_time_slots = COALESCE($2, allow_multiple_time_slots),
                timezone = COALESCE($3, timezone),
                updated_at = NOW()
             WHERE id = 1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StudioConfig>(&query)
            .bind(&input.user_display_mode)
            .bind(input.allow_multiple_time_slots)
            .bind(&input.timezone)
            .fetch_one(pool)
            .await
    }
}
