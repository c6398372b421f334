//! Chat-completion delegate: OpenAI-style endpoint for free-form questions.
//!
//! Handles whatever the rule table can't match. One request per message,
//! no retries; the caller turns any failure into a degraded reply.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{DelegateError, ReplyGenerator};
use crate::config::DelegateConfig;

/// Fixed instructions sent ahead of every customer message.
pub const SYSTEM_PROMPT: &str = "You are a helpful customer support AI for an e-commerce platform. \
Provide concise, helpful responses. If you're not confident about order-specific information, \
suggest the user contact a human agent.";

/// Used when the endpoint answers successfully but without any text.
pub const EMPTY_COMPLETION_REPLY: &str =
    "I'm sorry, I couldn't generate a response. Please try again.";

/// Chat-completion request body.
#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: [CompletionMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

/// A single message in the completion request.
#[derive(Serialize)]
struct CompletionMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Chat-completion response (only fields we need).
#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Client for the external chat-completion endpoint.
pub struct ChatCompletionsClient {
    client: reqwest::Client,
    config: DelegateConfig,
}

impl ChatCompletionsClient {
    pub fn new(config: DelegateConfig) -> Result<Self, DelegateError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl ReplyGenerator for ChatCompletionsClient {
    async fn generate_reply(&self, prompt: &str) -> Result<String, DelegateError> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            return Err(DelegateError::MissingCredential);
        };

        let body = CompletionRequest {
            model: &self.config.model,
            messages: [
                CompletionMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                CompletionMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.classify_transport_error(e))?;

        if !response.status().is_success() {
            return Err(DelegateError::Status(response.status().as_u16()));
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| DelegateError::Decode(e.to_string()))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| EMPTY_COMPLETION_REPLY.to_string());

        Ok(content)
    }

    fn name(&self) -> &str {
        "chat-completions"
    }
}

impl ChatCompletionsClient {
    fn classify_transport_error(&self, err: reqwest::Error) -> DelegateError {
        if err.is_timeout() {
            DelegateError::Timeout(self.config.timeout_secs)
        } else {
            DelegateError::Http(err)
        }
    }
}
