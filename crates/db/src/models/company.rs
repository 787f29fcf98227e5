//! Company entity model and DTOs (CRM).

use atelier_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A company row from the `companies` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Company {
    pub id: DbId,
    pub name: String,
    pub website: Option<String>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new company.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCompany {
    pub name: String,
    pub website: Option<String>,
    pub notes: Option<String>,
}

/// DTO for updating an existing company. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCompany {
    pub name: Option<String>,
    pub website: Option<String>,
    pub notes: Option<String>,
}
