//! Route definitions for the `/chat` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::chat;
use crate::state::AppState;

/// Routes mounted at `/chat`.
///
/// ```text
/// POST /messages            -> send_message (public)
/// GET  /conversations       -> list_conversations (staff)
/// GET  /conversations/{id}  -> get_conversation (staff)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/messages", post(chat::send_message))
        .route("/conversations", get(chat::list_conversations))
        .route("/conversations/{id}", get(chat::get_conversation))
}
