//! Route definitions for the `/files` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::files;
use crate::state::AppState;

/// Routes mounted at `/files` (staff list, admin mutate).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(files::list).post(files::upload))
        .route("/{id}", axum::routing::delete(files::delete))
}
