//! Repository for the `qr_visits` table.

use sqlx::PgPool;

use crate::models::qr_visit::{QrCodeStats, QrVisit};

const COLUMNS: &str = "id, code, user_agent, referer, visited_at";

/// Provides QR-visit tracking.
pub struct QrVisitRepo;

impl QrVisitRepo {
    /// Record one scan of a code.
    pub async fn record(
        pool: &PgPool,
        code: &str,
        user_agent: Option<&str>,
        referer: Option<&str>,
    ) -> Result<QrVisit, sqlx::Error> {
        let query = format!(
            "INSERT INTO qr_visits (code, user_agent, referer)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, QrVisit>(&query)
            .bind(code)
            .bind(user_agent)
            .bind(referer)
            .fetch_one(pool)
            .await
    }

    /// Scan counts per code, most scanned first.
    pub async fn stats(pool: &PgPool) -> Result<Vec<QrCodeStats>, sqlx::Error> {
        sqlx::query_as::<_, QrCodeStats>(
            "SELECT code, COUNT(*) AS visit_count, MAX(visited_at) AS last_visited_at
             FROM qr_visits
             GROUP BY code
             ORDER BY visit_count DESC",
        )
        .fetch_all(pool)
        .await
    }
}
