//! Handlers for studio configuration and weekday availability templates.

use atelier_core::error::CoreError;
use atelier_core::slots::{self, DisplayMode};
use atelier_core::types::WeekdayIndex;
use atelier_db::models::availability_template::{AvailabilityTemplate, UpsertTemplate};
use atelier_db::models::studio_config::{StudioConfig, UpdateStudioConfig};
use atelier_db::repositories::{AvailabilityTemplateRepo, StudioConfigRepo};
use axum::extract::{Path, State};
use axum::Json;
use chrono_tz::Tz;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AdminUser;
use crate::state::AppState;

/// GET /api/v1/studio/config (admin)
pub async fn get_config(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> AppResult<Json<StudioConfig>> {
    let config = StudioConfigRepo::get(&state.pool).await?;
    Ok(Json(config))
}

/// PUT /api/v1/studio/config (admin)
pub async fn update_config(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(input): Json<UpdateStudioConfig>,
) -> AppResult<Json<StudioConfig>> {
    if let Some(mode) = input.user_display_mode.as_deref() {
        DisplayMode::parse(mode)?;
    }
    if let Some(tz) = input.timezone.as_deref() {
        tz.parse::<Tz>().map_err(|_| {
            AppError::Core(CoreError::Validation(format!(
                "Unknown timezone: {tz}"
            )))
        })?;
    }

    let config = StudioConfigRepo::update(&state.pool, &input).await?;
    Ok(Json(config))
}

/// GET /api/v1/studio/templates (admin)
pub async fn list_templates(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> AppResult<Json<Vec<AvailabilityTemplate>>> {
    let templates = AvailabilityTemplateRepo::list(&state.pool).await?;
    Ok(Json(templates))
}

/// PUT /api/v1/studio/templates/{weekday} (admin)
///
/// Replace one weekday's template. Every bucket's slot string must be
/// 30-minute aligned.
pub async fn upsert_template(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(weekday): Path<WeekdayIndex>,
    Json(input): Json<UpsertTemplate>,
) -> AppResult<Json<AvailabilityTemplate>> {
    if !(0..=6).contains(&weekday) {
        return Err(AppError::Core(CoreError::Validation(
            "weekday must be between 0 (Sunday) and 6 (Saturday)".into(),
        )));
    }
    for bucket in &input.time_slots {
        slots::parse_slot(&bucket.slot)?;
    }

    let template = AvailabilityTemplateRepo::upsert(&state.pool, weekday, &input).await?;
    Ok(Json(template))
}
