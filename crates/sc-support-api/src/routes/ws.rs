//! WebSocket endpoint for real-time event streaming.

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

use crate::events::WsEvent;
use crate::state::AppState;

/// GET /api/ws: upgrade to WebSocket for the admin dashboard feed.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state.event_tx.subscribe()))
}

async fn handle_socket(mut socket: WebSocket, mut rx: broadcast::Receiver<WsEvent>) {
    tracing::info!("dashboard WebSocket connected");

    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Ok(event) => {
                    let Some(frame) = encode(&event) else { continue };
                    if socket.send(frame).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "dashboard WebSocket lagged");
                }
                Err(RecvError::Closed) => break,
            },
            // Only pings are answered; anything else from the dashboard is ignored.
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Ping(data))) => {
                    if socket.send(Message::Pong(data)).await.is_err() {
                        break;
                    }
                }
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }

    tracing::info!("dashboard WebSocket disconnected");
}

/// Serialize an event into a text frame.
fn encode(event: &WsEvent) -> Option<Message> {
    match serde_json::to_string(event) {
        Ok(json) => Some(Message::Text(json.into())),
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize dashboard event");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn subscribers_receive_published_events() {
        let state = AppState::in_memory();
        let mut rx = state.event_tx.subscribe();

        state.publish(WsEvent::ChatMessage {
            chat_id: Uuid::nil(),
            user_id: Uuid::nil(),
            source: "fallback".into(),
            confidence: 0.25,
            escalatable: true,
            timestamp: chrono::Utc::now(),
        });

        let event = rx.recv().await.unwrap();
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("chat_message"));
        assert!(json.contains(r#""escalatable":true"#));
    }

    #[test]
    fn events_encode_as_text_frames() {
        let event = WsEvent::EscalationStatusChanged {
            escalation_id: Uuid::nil(),
            old_status: sc_protocol::EscalationStatus::Pending,
            new_status: sc_protocol::EscalationStatus::Resolved,
            changed_at: chrono::Utc::now(),
        };
        match encode(&event) {
            Some(Message::Text(text)) => assert!(text.as_str().contains("resolved")),
            other => panic!("expected text frame, got {other:?}"),
        }
    }

    #[test]
    fn publish_without_subscribers_is_silent() {
        let state = AppState::in_memory();
        state.publish(WsEvent::ChatMessage {
            chat_id: Uuid::nil(),
            user_id: Uuid::nil(),
            source: "rules".into(),
            confidence: 0.85,
            escalatable: false,
            timestamp: chrono::Utc::now(),
        });
    }
}
