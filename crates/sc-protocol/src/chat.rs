use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Bot replies below this confidence are offered for escalation to a human agent.
pub const ESCALATION_THRESHOLD: f64 = 0.6;

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    Bot,
}

/// A single entry in a chat transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Author of the message. Serialized as `type` for the browser client.
    #[serde(rename = "type")]
    pub role: MessageRole,
    /// Message text.
    pub content: String,
    /// Heuristic reply confidence (0.0 - 1.0), bot messages only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// When the message was recorded.
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            confidence: None,
            timestamp: Utc::now(),
        }
    }

    pub fn bot(content: impl Into<String>, confidence: f64) -> Self {
        Self {
            role: MessageRole::Bot,
            content: content.into(),
            confidence: Some(confidence),
            timestamp: Utc::now(),
        }
    }
}

/// A support conversation owned by one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    pub id: Uuid,
    /// Owner of the conversation.
    pub user_id: Uuid,
    /// Transcript in insertion order.
    pub messages: Vec<ChatMessage>,
    pub is_escalated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escalated_at: Option<DateTime<Utc>>,
    /// Mean confidence over bot messages; `None` until the first bot reply.
    pub avg_confidence: Option<f64>,
    /// Bumped on every mutation.
    #[serde(default)]
    pub version: i64,
    pub created_at: DateTime<Utc>,
}

impl Chat {
    pub fn new(user_id: Uuid) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id,
            messages: Vec::new(),
            is_escalated: false,
            escalated_at: None,
            avg_confidence: None,
            version: 0,
            created_at: Utc::now(),
        }
    }

    /// Append messages, recompute the running average, and bump the version.
    pub fn append(&mut self, messages: impl IntoIterator<Item = ChatMessage>) {
        self.messages.extend(messages);
        self.avg_confidence = average_confidence(&self.messages);
        self.version += 1;
    }

    /// Mark the conversation as handed over to a human agent.
    pub fn mark_escalated(&mut self, at: DateTime<Utc>) {
        self.is_escalated = true;
        self.escalated_at = Some(at);
        self.version += 1;
    }

    /// The most recent message written by the customer.
    pub fn last_user_message(&self) -> Option<&ChatMessage> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::User)
    }
}

/// Arithmetic mean of every confidence present on bot messages.
pub fn average_confidence(messages: &[ChatMessage]) -> Option<f64> {
    let values: Vec<f64> = messages
        .iter()
        .filter(|m| m.role == MessageRole::Bot)
        .filter_map(|m| m.confidence)
        .collect();
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Whether a bot reply with this confidence should be offered for escalation.
pub fn is_escalatable(confidence: f64) -> bool {
    confidence < ESCALATION_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_of_two_bot_replies() {
        let messages = vec![
            ChatMessage::user("where is my order"),
            ChatMessage::bot("In transit", 0.85),
            ChatMessage::user("and my refund?"),
            ChatMessage::bot("Processing", 0.72),
        ];
        let avg = average_confidence(&messages).unwrap();
        assert!((avg - 0.785).abs() < 1e-9);
    }

    #[test]
    fn average_is_none_without_bot_messages() {
        let messages = vec![ChatMessage::user("hello")];
        assert!(average_confidence(&messages).is_none());
        assert!(average_confidence(&[]).is_none());
    }

    #[test]
    fn append_recomputes_and_bumps_version() {
        let mut chat = Chat::new(Uuid::now_v7());
        assert!(chat.avg_confidence.is_none());

        chat.append([ChatMessage::user("hi"), ChatMessage::bot("hello", 0.75)]);
        assert_eq!(chat.version, 1);
        assert_eq!(chat.avg_confidence, Some(0.75));

        chat.append([ChatMessage::user("?"), ChatMessage::bot("sorry", 0.25)]);
        assert_eq!(chat.version, 2);
        assert_eq!(chat.messages.len(), 4);
        assert!((chat.avg_confidence.unwrap() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn last_user_message_skips_bot_replies() {
        let mut chat = Chat::new(Uuid::now_v7());
        chat.append([
            ChatMessage::user("first"),
            ChatMessage::bot("reply", 0.9),
            ChatMessage::user("second"),
            ChatMessage::bot("reply", 0.4),
        ]);
        assert_eq!(chat.last_user_message().unwrap().content, "second");
    }

    #[test]
    fn escalation_threshold_is_exclusive() {
        assert!(is_escalatable(0.25));
        assert!(is_escalatable(0.5));
        assert!(!is_escalatable(0.6));
        assert!(!is_escalatable(0.85));
    }

    #[test]
    fn message_serializes_role_as_type() {
        let json = serde_json::to_value(ChatMessage::bot("ok", 0.92)).unwrap();
        assert_eq!(json["type"], "bot");
        assert_eq!(json["confidence"], 0.92);

        let json = serde_json::to_value(ChatMessage::user("hi")).unwrap();
        assert_eq!(json["type"], "user");
        assert!(json.get("confidence").is_none()); // skip_serializing_if = None
    }

    #[test]
    fn chat_uses_camel_case_fields() {
        let chat = Chat::new(Uuid::nil());
        let json = serde_json::to_value(&chat).unwrap();
        assert!(json.get("userId").is_some());
        assert_eq!(json["isEscalated"], false);
        assert!(json["avgConfidence"].is_null());
    }
}
