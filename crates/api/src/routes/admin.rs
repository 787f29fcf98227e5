//! Route definitions for the `/admin` resource (user management).

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::admin_users;
use crate::state::AppState;

/// Routes mounted at `/admin` (admin role enforced per handler).
///
/// ```text
/// GET    /users                     -> list
/// POST   /users                     -> create
/// GET    /users/{id}                -> get_by_id
/// PUT    /users/{id}                -> update
/// DELETE /users/{id}                -> deactivate
/// POST   /users/{id}/reset-password -> reset_password
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(admin_users::list).post(admin_users::create))
        .route(
            "/users/{id}",
            get(admin_users::get_by_id)
                .put(admin_users::update)
                .delete(admin_users::deactivate),
        )
        .route(
            "/users/{id}/reset-password",
            post(admin_users::reset_password),
        )
}
