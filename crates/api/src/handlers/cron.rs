//! Handler for the cron-triggered reminder dispatch.
//!
//! An external scheduler (the hosting platform's cron) POSTs here daily.
//! The endpoint is protected by a shared secret rather than a user JWT, and
//! dispatch is idempotent per day, so duplicate invocations are harmless.

use atelier_core::error::CoreError;
use atelier_events::{dispatch_due_reminders, ReminderRunSummary};
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/v1/cron/reminders
///
/// Requires `Authorization: Bearer <CRON_SECRET>`.
pub async fn dispatch_reminders(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Json<ReminderRunSummary>> {
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .is_some_and(|token| token == state.config.cron_secret);

    if !authorized {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid cron secret".into(),
        )));
    }

    let Some(mailer) = &state.mailer else {
        return Err(AppError::ServiceUnavailable(
            "SMTP is not configured; reminders cannot be sent".into(),
        ));
    };

    let summary = dispatch_due_reminders(&state.pool, &**mailer, &state.event_bus).await?;
    Ok(Json(summary))
}
