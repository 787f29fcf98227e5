//! Assistant conversation log models.

use atelier_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Who authored a chat message, stored as the Postgres enum `chat_role`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "chat_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// A conversation row from the `conversations` table.
///
/// `visitor_id` is a client-generated UUID so anonymous marketing-site
/// visitors keep one thread across messages without an account.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Conversation {
    pub id: DbId,
    pub visitor_id: Uuid,
    pub started_at: Timestamp,
}

/// A chat message row from the `chat_messages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ChatMessage {
    pub id: DbId,
    pub conversation_id: DbId,
    pub role: ChatRole,
    pub content: String,
    pub created_at: Timestamp,
}
