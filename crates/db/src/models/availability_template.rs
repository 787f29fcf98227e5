//! Weekly availability template model.

use atelier_core::availability::TemplateSlot;
use atelier_core::types::{DbId, Timestamp, WeekdayIndex};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// One weekday's template row from `availability_templates`.
///
/// `time_slots` is a JSONB array of `{slot, active}` buckets spanning the
/// full 48-bucket day.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AvailabilityTemplate {
    pub id: DbId,
    /// 0 = Sunday .. 6 = Saturday.
    pub weekday: WeekdayIndex,
    pub is_active: bool,
    pub time_slots: Json<Vec<TemplateSlot>>,
    pub updated_at: Timestamp,
}

/// DTO for replacing a weekday's template.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertTemplate {
    pub is_active: bool,
    pub time_slots: Vec<TemplateSlot>,
}
