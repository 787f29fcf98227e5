//! Contact entity model and DTOs (CRM).

use atelier_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A contact row from the `contacts` table.
///
/// `user_id` links the contact to a platform login when system access has
/// been granted; `None` means no access.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Contact {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company_id: Option<DbId>,
    pub notes: Option<String>,
    pub user_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Contact {
    /// Whether this contact currently has a platform login.
    pub fn has_system_access(&self) -> bool {
        self.user_id.is_some()
    }
}

/// DTO for creating a new contact.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateContact {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company_id: Option<DbId>,
    pub notes: Option<String>,
}

/// DTO for updating an existing contact. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateContact {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company_id: Option<DbId>,
    pub notes: Option<String>,
}
