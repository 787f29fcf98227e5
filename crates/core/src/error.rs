//! Domain-level error type shared across all crates.

use crate::types::DbId;

/// Errors produced by domain logic and surfaced through every layer.
///
/// The API crate maps each variant to an HTTP status; repositories and
/// services construct them directly.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// An entity lookup by id found nothing.
    #[error("{entity} with id {id} not found")]
    NotFound {
        /// Entity kind, e.g. `"Booking"`.
        entity: &'static str,
        /// The id that was looked up.
        id: DbId,
    },

    /// Input failed domain validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The operation conflicts with current state (e.g. slot already taken).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The caller is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The caller is authenticated but not allowed.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// An unexpected internal failure.
    #[error("Internal error: {0}")]
    Internal(String),
}
