//! Repository for the `conversations` and `chat_messages` tables.

use atelier_core::types::DbId;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::conversation::{ChatMessage, ChatRole, Conversation};

const CONVERSATION_COLUMNS: &str = "id, visitor_id, started_at";
const MESSAGE_COLUMNS: &str = "id, conversation_id, role, content, created_at";

/// Provides assistant conversation-log storage.
pub struct ConversationRepo;

impl ConversationRepo {
    /// Find the visitor's conversation, creating it on first contact.
    pub async fn find_or_create(
        pool: &PgPool,
        visitor_id: Uuid,
    ) -> Result<Conversation, sqlx::Error> {
        let query = format!(
            "INSERT INTO conversations (visitor_id)
             VALUES ($1)
             ON CONFLICT (visitor_id) DO UPDATE SET visitor_id = EXCLUDED.visitor_id
             RETURNING {CONVERSATION_COLUMNS}"
        );
        sqlx::query_as::<_, Conversation>(&query)
            .bind(visitor_id)
            .fetch_one(pool)
            .await
    }

    /// Find a conversation by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Conversation>, sqlx::Error> {
        let query = format!("SELECT {CONVERSATION_COLUMNS} FROM conversations WHERE id = $1");
        sqlx::query_as::<_, Conversation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List conversations, newest first (staff review).
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Conversation>, sqlx::Error> {
        let query = format!(
            "SELECT {CONVERSATION_COLUMNS} FROM conversations
             ORDER BY started_at DESC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Conversation>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Append a message to a conversation, returning the created row.
    pub async fn append_message(
        pool: &PgPool,
        conversation_id: DbId,
        role: ChatRole,
        content: &str,
    ) -> Result<ChatMessage, sqlx::Error> {
        let query = format!(
            "INSERT INTO chat_messages (conversation_id, role, content)
             VALUES ($1, $2, $3)
             RETURNING {MESSAGE_COLUMNS}"
        );
        sqlx::query_as::<_, ChatMessage>(&query)
            .bind(conversation_id)
            .bind(role)
            .bind(content)
            .fetch_one(pool)
            .await
    }

    /// The full message log of a conversation, oldest first.
    pub async fn messages(
        pool: &PgPool,
        conversation_id: DbId,
    ) -> Result<Vec<ChatMessage>, sqlx::Error> {
        let query = format!(
            "SELECT {MESSAGE_COLUMNS} FROM chat_messages
             WHERE conversation_id = $1
             ORDER BY created_at, id"
        );
        sqlx::query_as::<_, ChatMessage>(&query)
            .bind(conversation_id)
            .fetch_all(pool)
            .await
    }

    /// The most recent `limit` messages, oldest first (LLM context window).
    pub async fn recent_messages(
        pool: &PgPool,
        conversation_id: DbId,
        limit: i64,
    ) -> Result<Vec<ChatMessage>, sqlx::Error> {
        let query = format!(
            "SELECT * FROM (
                 SELECT {MESSAGE_COLUMNS} FROM chat_messages
                 WHERE conversation_id = $1
                 ORDER BY created_at DESC, id DESC
                 LIMIT $2
             ) recent ORDER BY created_at, id"
        );
        sqlx::query_as::<_, ChatMessage>(&query)
            .bind(conversation_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
