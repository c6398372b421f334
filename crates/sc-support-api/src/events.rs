//! Real-time event types broadcast over WebSocket connections.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use sc_protocol::EscalationStatus;

/// Server-sent events pushed to the admin dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsEvent {
    /// A customer message was answered.
    ChatMessage {
        chat_id: Uuid,
        user_id: Uuid,
        source: String,
        confidence: f64,
        escalatable: bool,
        timestamp: DateTime<Utc>,
    },

    /// A chat was handed over to the human-agent queue.
    ChatEscalated {
        escalation_id: Uuid,
        chat_id: Uuid,
        user_email: String,
        confidence: f64,
        escalated_at: DateTime<Utc>,
    },

    /// An agent moved an escalation to a new status.
    EscalationStatusChanged {
        escalation_id: Uuid,
        old_status: EscalationStatus,
        new_status: EscalationStatus,
        changed_at: DateTime<Utc>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_serializes_with_type_tag() {
        let event = WsEvent::ChatMessage {
            chat_id: Uuid::nil(),
            user_id: Uuid::nil(),
            source: "rules".into(),
            confidence: 0.85,
            escalatable: false,
            timestamp: Utc::now(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""type":"chat_message""#));
        assert!(json.contains(r#""source":"rules""#));
    }

    #[test]
    fn escalated_event_serializes() {
        let event = WsEvent::ChatEscalated {
            escalation_id: Uuid::nil(),
            chat_id: Uuid::nil(),
            user_email: "customer@demo.com".into(),
            confidence: 0.4,
            escalated_at: Utc::now(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""type":"chat_escalated""#));
        assert!(json.contains("customer@demo.com"));
    }

    #[test]
    fn status_changed_event_serializes() {
        let event = WsEvent::EscalationStatusChanged {
            escalation_id: Uuid::nil(),
            old_status: EscalationStatus::Pending,
            new_status: EscalationStatus::InReview,
            changed_at: Utc::now(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""type":"escalation_status_changed""#));
        assert!(json.contains(r#""old_status":"pending""#));
        assert!(json.contains(r#""new_status":"in_review""#));
    }
}
