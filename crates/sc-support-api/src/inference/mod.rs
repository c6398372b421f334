//! Reply generation for the support chat.
//!
//! Turns a customer message into a bot reply with a heuristic confidence.
//!
//! Two tiers:
//! - **Rules** (local): substring matching for order, refund, policy, and address questions.
//! - **Delegate** (cloud): an external chat-completion endpoint for everything else.

pub mod classifier;
pub mod delegate;
pub mod rules;

use async_trait::async_trait;
use serde::Serialize;

/// Which tier produced a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplySource {
    /// Fixed rule table.
    Rules,
    /// External chat-completion endpoint.
    Delegate,
    /// Degraded reply after a missing credential or delegate failure.
    Fallback,
}

impl ReplySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rules => "rules",
            Self::Delegate => "delegate",
            Self::Fallback => "fallback",
        }
    }
}

/// A bot reply with its heuristic confidence (0.0 - 1.0).
#[derive(Debug, Clone, PartialEq)]
pub struct BotReply {
    pub content: String,
    pub confidence: f64,
    pub source: ReplySource,
}

/// Why a delegate call produced no text.
#[derive(Debug, thiserror::Error)]
pub enum DelegateError {
    #[error("no delegate credential configured")]
    MissingCredential,

    #[error("delegate request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("delegate returned HTTP {0}")]
    Status(u16),

    #[error("failed to decode delegate response: {0}")]
    Decode(String),

    #[error("delegate timed out after {0}s")]
    Timeout(u64),
}

/// Narrow seam over the external model so rules and heuristics test offline.
#[async_trait]
pub trait ReplyGenerator: Send + Sync {
    /// Generate a reply to a single customer message.
    async fn generate_reply(&self, prompt: &str) -> Result<String, DelegateError>;

    /// Name of this generator (for logging).
    fn name(&self) -> &str;
}

pub use classifier::ResponseClassifier;
pub use delegate::ChatCompletionsClient;
pub use rules::RuleBook;
