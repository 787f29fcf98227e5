//! Handlers for the marketing-site chat assistant.
//!
//! A visitor message is persisted, forwarded to the LLM provider with the
//! knowledge-base file ids for file-search grounding and the recent turns of
//! the conversation as context, and the reply is persisted and returned.

use atelier_assistant::ChatTurn;
use atelier_core::error::CoreError;
use atelier_core::types::DbId;
use atelier_db::models::conversation::{ChatMessage, ChatRole, Conversation};
use atelier_db::repositories::{AssistantFileRepo, ConversationRepo};
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Instructions sent with every completion request.
const ASSISTANT_INSTRUCTIONS: &str = "You are the studio's website assistant. Answer questions \
     about the studio, its services, and its work using the provided documents. Be concise and \
     friendly; if the documents do not cover a question, say so and suggest contacting the \
     studio directly.";

/// How many prior turns are replayed to the provider as context.
const CONTEXT_TURNS: i64 = 10;

/// Request body for the public `POST /chat/messages`.
#[derive(Debug, Deserialize, Validate)]
pub struct SendMessageRequest {
    /// Client-generated UUID identifying the visitor's thread.
    pub visitor_id: Uuid,
    #[validate(length(min = 1, max = 4000))]
    pub message: String,
}

/// Response body for `POST /chat/messages`.
#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    pub conversation_id: DbId,
    pub reply: String,
}

/// POST /api/v1/chat/messages (public)
pub async fn send_message(
    State(state): State<AppState>,
    Json(input): Json<SendMessageRequest>,
) -> AppResult<Json<SendMessageResponse>> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    let Some(assistant) = &state.assistant else {
        return Err(AppError::ServiceUnavailable(
            "Chat assistant is not configured".into(),
        ));
    };

    let conversation = ConversationRepo::find_or_create(&state.pool, input.visitor_id).await?;

    let history: Vec<ChatTurn> =
        ConversationRepo::recent_messages(&state.pool, conversation.id, CONTEXT_TURNS)
            .await?
            .into_iter()
            .map(|msg| ChatTurn {
                role: match msg.role {
                    ChatRole::User => "user",
                    ChatRole::Assistant => "assistant",
                },
                content: msg.content,
            })
            .collect();

    let file_ids = AssistantFileRepo::provider_file_ids(&state.pool).await?;

    ConversationRepo::append_message(&state.pool, conversation.id, ChatRole::User, &input.message)
        .await?;

    let reply = assistant
        .answer(ASSISTANT_INSTRUCTIONS, &history, &input.message, &file_ids)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "LLM request failed");
            AppError::ServiceUnavailable("The assistant is temporarily unavailable".into())
        })?;

    ConversationRepo::append_message(&state.pool, conversation.id, ChatRole::Assistant, &reply)
        .await?;

    Ok(Json(SendMessageResponse {
        conversation_id: conversation.id,
        reply,
    }))
}

/// GET /api/v1/chat/conversations (staff)
pub async fn list_conversations(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<Conversation>>>> {
    let (limit, offset) = pagination.clamped();
    let conversations = ConversationRepo::list(&state.pool, limit, offset).await?;
    Ok(Json(DataResponse {
        data: conversations,
    }))
}

/// GET /api/v1/chat/conversations/{id} (staff)
pub async fn get_conversation(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<ChatMessage>>>> {
    ConversationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Conversation",
            id,
        }))?;
    let messages = ConversationRepo::messages(&state.pool, id).await?;
    Ok(Json(DataResponse { data: messages }))
}
