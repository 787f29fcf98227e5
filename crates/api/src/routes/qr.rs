//! Route definitions for the `/qr` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::qr;
use crate::state::AppState;

/// Routes mounted at `/qr`.
///
/// ```text
/// POST /{code}  -> record_visit (public)
/// GET  /stats   -> stats (staff)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(qr::stats))
        .route("/{code}", post(qr::record_visit))
}
