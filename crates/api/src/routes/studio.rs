//! Route definitions for the `/studio` resource (config + templates).

use axum::routing::get;
use axum::Router;

use crate::handlers::studio;
use crate::state::AppState;

/// Routes mounted at `/studio` (admin only, enforced per handler).
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/config",
            get(studio::get_config).put(studio::update_config),
        )
        .route("/templates", get(studio::list_templates))
        .route("/templates/{weekday}", axum::routing::put(studio::upsert_template))
}
