//! Route definitions for the `/cron` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::cron;
use crate::state::AppState;

/// Routes mounted at `/cron` (shared-secret protected, not JWT).
pub fn router() -> Router<AppState> {
    Router::new().route("/reminders", post(cron::dispatch_reminders))
}
