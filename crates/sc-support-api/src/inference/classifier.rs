//! Response classifier: rule table first, delegate fallback.
//!
//! Tries the rule table first. If nothing matches, asks the delegate and
//! scores its text with a coarse heuristic. A missing credential or a
//! failed call degrades to a fixed reply instead of an error.

use std::sync::Arc;

use uuid::Uuid;

use super::{BotReply, ChatCompletionsClient, DelegateError, ReplyGenerator, ReplySource, RuleBook};
use crate::config::DelegateConfig;

/// Confidence of every degraded reply (no credential or failed call).
pub const FALLBACK_CONFIDENCE: f64 = 0.25;

pub const UNCERTAIN_CONFIDENCE: f64 = 0.4;
pub const DEFERRING_CONFIDENCE: f64 = 0.5;
pub const DELEGATE_CONFIDENCE: f64 = 0.75;

pub const NO_CREDENTIAL_REPLY: &str = "I understand your question. Unfortunately, I'm having trouble \
accessing my knowledge base right now. Would you like me to escalate this to a human agent?";

pub const DELEGATE_FAILURE_REPLY: &str = "I'm experiencing some technical difficulties. \
Would you like me to escalate this to a human agent?";

/// Decides how a customer message is answered and how confident the answer is.
#[derive(Clone)]
pub struct ResponseClassifier {
    rules: RuleBook,
    delegate: Option<Arc<dyn ReplyGenerator>>,
}

impl ResponseClassifier {
    pub fn new(delegate: Option<Arc<dyn ReplyGenerator>>) -> Self {
        Self {
            rules: RuleBook::new(),
            delegate,
        }
    }

    /// Classifier with no delegate: unmatched messages get the degraded reply.
    pub fn rules_only() -> Self {
        Self::new(None)
    }

    /// Build the live classifier. The delegate client is only created when a
    /// credential is configured.
    pub fn from_config(config: &DelegateConfig) -> Result<Self, DelegateError> {
        if config.api_key.is_none() {
            tracing::warn!("no delegate credential configured, unmatched messages will degrade");
            return Ok(Self::rules_only());
        }
        let client = ChatCompletionsClient::new(config.clone())?;
        Ok(Self::new(Some(Arc::new(client))))
    }

    pub fn has_delegate(&self) -> bool {
        self.delegate.is_some()
    }

    /// Answer a message. Never fails.
    pub async fn classify(&self, message: &str, user_id: Uuid) -> BotReply {
        if let Some(reply) = self.rules.answer(message, user_id) {
            tracing::debug!(confidence = reply.confidence, "rule table matched");
            return reply;
        }

        let Some(delegate) = &self.delegate else {
            tracing::warn!("no delegate credential, using fallback reply");
            return fallback(NO_CREDENTIAL_REPLY);
        };

        match delegate.generate_reply(message).await {
            Ok(content) => {
                let confidence = score_delegate_reply(&content);
                tracing::debug!(
                    generator = delegate.name(),
                    confidence,
                    "delegate replied"
                );
                BotReply {
                    content,
                    confidence,
                    source: ReplySource::Delegate,
                }
            }
            Err(DelegateError::MissingCredential) => {
                tracing::warn!("no delegate credential, using fallback reply");
                fallback(NO_CREDENTIAL_REPLY)
            }
            Err(e) => {
                tracing::warn!(error = %e, generator = delegate.name(), "delegate call failed");
                fallback(DELEGATE_FAILURE_REPLY)
            }
        }
    }
}

/// Coarse confidence for delegate text: apologies score lowest, replies that
/// point at a human agent next, anything else 0.75.
pub fn score_delegate_reply(content: &str) -> f64 {
    let lower = content.to_lowercase();
    if lower.contains("sorry") || lower.contains("don't know") {
        UNCERTAIN_CONFIDENCE
    } else if lower.contains("contact") || lower.contains("agent") {
        DEFERRING_CONFIDENCE
    } else {
        DELEGATE_CONFIDENCE
    }
}

fn fallback(content: &str) -> BotReply {
    BotReply {
        content: content.to_string(),
        confidence: FALLBACK_CONFIDENCE,
        source: ReplySource::Fallback,
    }
}
