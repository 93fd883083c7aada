use axum::{
    extract::{Path, State},
    Json,
};
use db::{ConversationRepository, MessageRepository};
use serde::{Deserialize, Serialize};
use shared::AppError;

use crate::{
    auth::AuthUser,
    error::{ApiError, ApiResult},
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct ConversationResponse {
    pub id: String,
    pub p1: String,
    pub p2: String,
    pub booking_id: Option<String>,
}

impl From<db::models::Conversation> for ConversationResponse {
    fn from(c: db::models::Conversation) -> Self {
        Self {
            id: c.id.to_string(),
            p1: c.p1.to_string(),
            p2: c.p2.to_string(),
            booking_id: c.booking_id.map(|b| b.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub id: String,
    pub conversation_id: String,
    pub sender_id: String,
    pub content: String,
    pub is_read: bool,
}

impl From<db::models::Message> for MessageResponse {
    fn from(m: db::models::Message) -> Self {
        Self {
            id: m.id.to_string(),
            conversation_id: m.conversation_id.to_string(),
            sender_id: m.sender_id.to_string(),
            content: m.content,
            is_read: m.is_read,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct OpenConversationRequest {
    pub counterparty_id: String,
    pub booking_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OpenConversationResponse {
    pub conversation: ConversationResponse,
    pub messages: Vec<MessageResponse>,
}

/// POST /conversations
pub async fn open_conversation(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<OpenConversationRequest>,
) -> ApiResult<Json<OpenConversationResponse>> {
    let counterparty = req
        .counterparty_id
        .parse()
        .map_err(|_| ApiError::from(AppError::Validation("invalid counterparty id".to_string())))?;

    let booking_id = req
        .booking_id
        .map(|b| b.parse())
        .transpose()
        .map_err(|_| ApiError::from(AppError::Validation("invalid booking id".to_string())))?;

    let conversation =
        ConversationRepository::open_or_create(&state.pool, auth.user_id, counterparty, booking_id)
            .await?;

    let messages = MessageRepository::list(&state.pool, conversation.id).await?;

    Ok(Json(OpenConversationResponse {
        conversation: conversation.into(),
        messages: messages.into_iter().map(Into::into).collect(),
    }))
}

/// GET /conversations
pub async fn list_conversations(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<ConversationResponse>>> {
    let conversations = ConversationRepository::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(conversations.into_iter().map(Into::into).collect()))
}

fn parse_conversation_id(id: &str) -> ApiResult<shared::types::ConversationId> {
    id.parse()
        .map_err(|_| ApiError::from(AppError::Validation("invalid conversation id".to_string())))
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
}

/// POST /conversations/:id/messages
pub async fn send_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<SendMessageRequest>,
) -> ApiResult<Json<MessageResponse>> {
    if req.content.trim().is_empty() {
        return Err(ApiError::from(AppError::Validation("content must not be empty".to_string())));
    }

    let conversation_id = parse_conversation_id(&id)?;
    let message =
        MessageRepository::send(&state.pool, conversation_id, auth.user_id, &req.content).await?;

    Ok(Json(message.into()))
}

/// GET /conversations/:id/messages
pub async fn list_messages(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<MessageResponse>>> {
    let conversation_id = parse_conversation_id(&id)?;

    let conversation = ConversationRepository::find_by_id(&state.pool, conversation_id)
        .await?
        .ok_or_else(|| ApiError::from(shared::DomainError::ConversationNotFound))?;
    if !conversation.includes(auth.user_id) {
        return Err(ApiError::from(shared::DomainError::ConversationNotParticipant));
    }

    let messages = MessageRepository::list(&state.pool, conversation_id).await?;
    Ok(Json(messages.into_iter().map(Into::into).collect()))
}

/// POST /conversations/:id/read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let conversation_id = parse_conversation_id(&id)?;
    let updated = MessageRepository::mark_read(&state.pool, conversation_id, auth.user_id).await?;
    Ok(Json(serde_json::json!({ "updated": updated })))
}
