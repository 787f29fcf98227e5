//! QR-visit tracking model.

use atelier_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A visit row from `qr_visits`: one scan of a printed QR code.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QrVisit {
    pub id: DbId,
    pub code: String,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    pub visited_at: Timestamp,
}

/// Aggregated scan counts per code.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QrCodeStats {
    pub code: String,
    pub visit_count: i64,
    pub last_visited_at: Option<Timestamp>,
}
