//! Support chat endpoints.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sc_protocol::{Chat, ChatMessage, is_escalatable};

use super::identity::{CallerId, invalid_body};
use crate::error::{ApiError, ApiResult};
use crate::events::WsEvent;
use crate::inference::ReplySource;
use crate::state::AppState;

/// Request body for posting a customer message.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub message: String,
    /// Existing chat to continue; a new chat is opened when absent.
    #[serde(default)]
    pub chat_id: Option<Uuid>,
}

/// The bot's answer to one customer message.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageResponse {
    pub chat_id: Uuid,
    pub message: String,
    pub confidence: f64,
    pub source: ReplySource,
    /// True when the UI should offer a human agent.
    pub escalatable: bool,
}

/// POST /api/chat/message: answer a customer message and record both sides.
pub async fn send_message(
    State(state): State<AppState>,
    CallerId(user_id): CallerId,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> ApiResult<Json<SendMessageResponse>> {
    let Json(req) = payload.map_err(invalid_body)?;
    if req.message.trim().is_empty() {
        return Err(ApiError::BadRequest("message must not be empty".into()));
    }

    if state.store.get_user(user_id).await?.is_none() {
        return Err(ApiError::NotFound(format!("user '{user_id}' not found")));
    }

    let chat_id = match req.chat_id {
        Some(id) => {
            state
                .store
                .get_chat(id)
                .await?
                .ok_or_else(|| ApiError::NotFound(format!("chat '{id}' not found")))?
                .id
        }
        None => {
            let chat = state.store.create_chat(user_id).await?;
            tracing::info!(chat_id = %chat.id, user_id = %user_id, "chat opened");
            chat.id
        }
    };

    let user_message = ChatMessage::user(req.message.as_str());
    let reply = state.classifier.classify(&req.message, user_id).await;
    let bot_message = ChatMessage::bot(reply.content.as_str(), reply.confidence);

    let chat = state
        .store
        .append_messages(chat_id, vec![user_message, bot_message])
        .await?;

    let escalatable = is_escalatable(reply.confidence);
    tracing::info!(
        chat_id = %chat.id,
        source = reply.source.as_str(),
        confidence = reply.confidence,
        escalatable,
        "chat message answered"
    );

    state.publish(WsEvent::ChatMessage {
        chat_id: chat.id,
        user_id,
        source: reply.source.as_str().to_string(),
        confidence: reply.confidence,
        escalatable,
        timestamp: Utc::now(),
    });

    Ok(Json(SendMessageResponse {
        chat_id: chat.id,
        message: reply.content,
        confidence: reply.confidence,
        source: reply.source,
        escalatable,
    }))
}

/// GET /api/chat/:id: full transcript.
pub async fn get_chat(
    State(state): State<AppState>,
    Path(chat_id): Path<Uuid>,
) -> ApiResult<Json<Chat>> {
    state
        .store
        .get_chat(chat_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("chat '{chat_id}' not found")))
}

/// GET /api/chats: the caller's chats, most recent first.
pub async fn list_my_chats(
    State(state): State<AppState>,
    CallerId(user_id): CallerId,
) -> ApiResult<Json<Vec<Chat>>> {
    Ok(Json(state.store.list_chats_for_user(user_id).await?))
}
