use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle of a human-agent handover request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscalationStatus {
    #[default]
    Pending,
    InReview,
    Resolved,
}

impl EscalationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InReview => "in_review",
            Self::Resolved => "resolved",
        }
    }
}

impl fmt::Display for EscalationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown escalation status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for EscalationStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in_review" => Ok(Self::InReview),
            "resolved" => Ok(Self::Resolved),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// A request for a human agent to take over a chat.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Escalation {
    pub id: Uuid,
    pub chat_id: Uuid,
    pub user_id: Uuid,
    pub user_email: String,
    /// Last customer message at the time of escalation.
    pub last_message: String,
    /// Bot confidence that triggered the escalation.
    pub confidence: f64,
    pub status: EscalationStatus,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied when escalating a chat.
#[derive(Debug, Clone)]
pub struct NewEscalation {
    pub chat_id: Uuid,
    pub user_id: Uuid,
    pub user_email: String,
    pub last_message: String,
    pub confidence: f64,
}

impl Escalation {
    pub fn from_new(new: NewEscalation) -> Self {
        Self {
            id: Uuid::now_v7(),
            chat_id: new.chat_id,
            user_id: new.user_id,
            user_email: new.user_email,
            last_message: new.last_message,
            confidence: new.confidence,
            status: EscalationStatus::Pending,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serialization() {
        assert_eq!(
            serde_json::to_string(&EscalationStatus::InReview).unwrap(),
            r#""in_review""#
        );
        let status: EscalationStatus = serde_json::from_str(r#""resolved""#).unwrap();
        assert_eq!(status, EscalationStatus::Resolved);
    }

    #[test]
    fn status_from_str_matches_wire_names() {
        for status in [
            EscalationStatus::Pending,
            EscalationStatus::InReview,
            EscalationStatus::Resolved,
        ] {
            assert_eq!(status.as_str().parse::<EscalationStatus>().unwrap(), status);
        }
        let err = "closed".parse::<EscalationStatus>().unwrap_err();
        assert!(err.to_string().contains("closed"));
    }

    #[test]
    fn new_escalation_starts_pending() {
        let escalation = Escalation::from_new(NewEscalation {
            chat_id: Uuid::nil(),
            user_id: Uuid::nil(),
            user_email: "customer@demo.com".into(),
            last_message: "I need a person".into(),
            confidence: 0.4,
        });
        assert_eq!(escalation.status, EscalationStatus::Pending);

        let json = serde_json::to_value(&escalation).unwrap();
        assert_eq!(json["userEmail"], "customer@demo.com");
        assert_eq!(json["lastMessage"], "I need a person");
        assert_eq!(json["status"], "pending");
    }
}
