//! Human-agent escalation endpoints.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sc_protocol::{Chat, Escalation, EscalationStatus, NewEscalation};

use super::identity::{CallerId, invalid_body};
use crate::error::{ApiError, ApiResult};
use crate::events::WsEvent;
use crate::state::AppState;

/// Request body for escalating a chat.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EscalateRequest {
    pub chat_id: Uuid,
    /// Last customer message, shown to the agent. Taken from the chat
    /// transcript when omitted or blank.
    #[serde(default)]
    pub last_message: Option<String>,
    /// Bot confidence that prompted the escalation.
    pub confidence: f64,
}

/// Shown to the agent when the chat holds no customer message.
pub const NO_MESSAGE_PLACEHOLDER: &str = "Chat escalated by user";

/// Request body for an agent status change.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: EscalationStatus,
}

/// An escalation together with the chat it refers to.
#[derive(Debug, Serialize)]
pub struct EscalationDetail {
    #[serde(flatten)]
    pub escalation: Escalation,
    pub chat: Option<Chat>,
}

/// POST /api/escalations: hand a chat over to a human agent.
pub async fn create_escalation(
    State(state): State<AppState>,
    CallerId(user_id): CallerId,
    payload: Result<Json<EscalateRequest>, JsonRejection>,
) -> ApiResult<Json<Escalation>> {
    let Json(req) = payload.map_err(invalid_body)?;
    if !(0.0..=1.0).contains(&req.confidence) {
        return Err(ApiError::BadRequest(format!(
            "confidence {} outside 0.0 - 1.0",
            req.confidence
        )));
    }

    let user = state
        .store
        .get_user(user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("user '{user_id}' not found")))?;

    let last_message = match req.last_message.filter(|m| !m.trim().is_empty()) {
        Some(message) => message,
        None => {
            let chat = state
                .store
                .get_chat(req.chat_id)
                .await?
                .ok_or_else(|| ApiError::NotFound(format!("chat '{}' not found", req.chat_id)))?;
            chat.last_user_message()
                .map(|m| m.content.clone())
                .unwrap_or_else(|| NO_MESSAGE_PLACEHOLDER.to_string())
        }
    };

    let escalation = state
        .store
        .escalate(NewEscalation {
            chat_id: req.chat_id,
            user_id,
            user_email: user.email,
            last_message,
            confidence: req.confidence,
        })
        .await?;

    tracing::info!(
        escalation_id = %escalation.id,
        chat_id = %escalation.chat_id,
        confidence = escalation.confidence,
        "chat escalated"
    );

    state.publish(WsEvent::ChatEscalated {
        escalation_id: escalation.id,
        chat_id: escalation.chat_id,
        user_email: escalation.user_email.clone(),
        confidence: escalation.confidence,
        escalated_at: escalation.created_at,
    });

    Ok(Json(escalation))
}

/// GET /api/escalations: the agent queue, newest first.
pub async fn list_escalations(State(state): State<AppState>) -> ApiResult<Json<Vec<Escalation>>> {
    Ok(Json(state.store.list_escalations().await?))
}

/// GET /api/escalations/:id: one escalation with its chat.
pub async fn get_escalation(
    State(state): State<AppState>,
    Path(escalation_id): Path<Uuid>,
) -> ApiResult<Json<EscalationDetail>> {
    let escalation = state
        .store
        .get_escalation(escalation_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("escalation '{escalation_id}' not found")))?;
    let chat = state.store.get_chat(escalation.chat_id).await?;
    Ok(Json(EscalationDetail { escalation, chat }))
}

/// PATCH /api/escalations/:id: move an escalation through the agent workflow.
pub async fn update_escalation(
    State(state): State<AppState>,
    Path(escalation_id): Path<Uuid>,
    payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> ApiResult<Json<Escalation>> {
    let Json(req) = payload.map_err(invalid_body)?;

    let old_status = state
        .store
        .get_escalation(escalation_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("escalation '{escalation_id}' not found")))?
        .status;

    let escalation = state
        .store
        .update_escalation_status(escalation_id, req.status)
        .await?;

    tracing::info!(
        escalation_id = %escalation.id,
        old_status = %old_status,
        new_status = %escalation.status,
        "escalation status changed"
    );

    state.publish(WsEvent::EscalationStatusChanged {
        escalation_id: escalation.id,
        old_status,
        new_status: escalation.status,
        changed_at: Utc::now(),
    });

    Ok(Json(escalation))
}
