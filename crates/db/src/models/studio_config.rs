//! Studio configuration singleton model.

use atelier_core::types::Timestamp;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The single `studio_config` row (id is always 1).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StudioConfig {
    /// Slot presentation granularity: `"30min"` or `"1hour"`.
    pub user_display_mode: String,
    /// Whether the booking form lets a client pick several slots at once.
    pub allow_multiple_time_slots: bool,
    /// IANA timezone the studio operates in, e.g. `"Europe/Brussels"`.
    pub timezone: String,
    pub updated_at: Timestamp,
}

/// DTO for updating the studio configuration. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateStudioConfig {
    pub user_display_mode: Option<String>,
    pub allow_multiple_time_slots: Option<bool>,
    pub timezone: Option<String>,
}
