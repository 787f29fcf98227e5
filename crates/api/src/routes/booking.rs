//! Route definitions for the `/bookings` resource and `/availability`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::booking;
use crate::state::AppState;

/// Routes mounted at the API root.
///
/// ```text
/// GET    /availability          -> availability (public)
/// POST   /bookings              -> create (public)
/// POST   /bookings/block        -> create_block (staff)
/// GET    /bookings              -> list (staff, ?from=&to=)
/// GET    /bookings/{id}         -> get_by_id (staff)
/// PUT    /bookings/{id}/status  -> set_status (staff)
/// DELETE /bookings/{id}         -> delete (staff)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/availability", get(booking::availability))
        .route("/bookings", get(booking::list).post(booking::create))
        .route("/bookings/block", post(booking::create_block))
        .route(
            "/bookings/{id}",
            get(booking::get_by_id).delete(booking::delete),
        )
        .route("/bookings/{id}/status", put(booking::set_status))
}
