//! Showcase project entity model and DTOs.
//!
//! These are the portfolio projects rendered on the marketing site, not an
//! internal job concept.

use atelier_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub title: String,
    /// URL path segment on the marketing site, unique.
    pub slug: String,
    pub summary: Option<String>,
    pub body: Option<String>,
    /// Object-storage key of the cover image, if one was uploaded.
    pub cover_key: Option<String>,
    pub is_published: bool,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub title: String,
    pub slug: String,
    pub summary: Option<String>,
    pub body: Option<String>,
    pub cover_key: Option<String>,
    /// Defaults to unpublished if omitted.
    pub is_published: Option<bool>,
    pub sort_order: Option<i32>,
}

/// DTO for updating an existing project. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProject {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub summary: Option<String>,
    pub body: Option<String>,
    pub cover_key: Option<String>,
    pub is_published: Option<bool>,
    pub sort_order: Option<i32>,
}
