//! Route definitions for the `/contacts` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::contact;
use crate::state::AppState;

/// Routes mounted at `/contacts`.
///
/// ```text
/// GET    /              -> list (?company_id=)
/// POST   /              -> create
/// GET    /{id}          -> get_by_id
/// PUT    /{id}          -> update
/// DELETE /{id}          -> delete
/// POST   /{id}/access   -> grant_access (admin)
/// DELETE /{id}/access   -> revoke_access (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(contact::list).post(contact::create))
        .route(
            "/{id}",
            get(contact::get_by_id)
                .put(contact::update)
                .delete(contact::delete),
        )
        .route(
            "/{id}/access",
            post(contact::grant_access).delete(contact::revoke_access),
        )
}
