//! Support API server configuration.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;

/// Top-level API server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Listen address (e.g., "0.0.0.0").
    #[serde(default = "default_host")]
    pub host: String,
    /// Listen port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// PostgreSQL connection URL. None selects the in-memory store.
    #[serde(default)]
    pub database_url: Option<String>,
    /// Allowed CORS origins (e.g., ["http://localhost:5173"]). Empty allows any.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// External chat-completion delegate.
    #[serde(default)]
    pub delegate: DelegateConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl ApiConfig {
    /// Load config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let port = env_var("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);
        let cors_origins = env_var("CORS_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();
        Self {
            host: env_var("HOST").unwrap_or(defaults.host),
            port,
            database_url: env_var("DATABASE_URL"),
            cors_origins,
            delegate: DelegateConfig::from_env(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_url: None,
            cors_origins: vec![],
            delegate: DelegateConfig::default(),
        }
    }
}

/// Settings for the chat-completion endpoint used when no rule matches.
///
/// Temperature and token limit are fixed per deployment, never per call.
#[derive(Clone, Deserialize)]
pub struct DelegateConfig {
    /// Bearer credential. Absence is a valid state: replies degrade instead.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    "https://models.inference.ai.azure.com/chat/completions".into()
}
fn default_model() -> String {
    "gpt-4o".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    150
}
fn default_timeout_secs() -> u64 {
    10
}

impl DelegateConfig {
    /// Load configuration from environment variables.
    ///
    /// The credential is read from `GITHUB_TOKEN`, then `GITHUB_API_KEY`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let api_key = env_var("GITHUB_TOKEN").or_else(|| env_var("GITHUB_API_KEY"));
        let timeout_secs =
            positive_secs(env_var("DELEGATE_TIMEOUT_SECS")).unwrap_or(defaults.timeout_secs);
        Self {
            api_key,
            endpoint: env_var("DELEGATE_ENDPOINT").unwrap_or(defaults.endpoint),
            model: env_var("DELEGATE_MODEL").unwrap_or(defaults.model),
            timeout_secs,
            ..defaults
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for DelegateConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: default_endpoint(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl fmt::Debug for DelegateConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelegateConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Read a non-empty environment variable.
fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Parse a whole number of seconds; zero and garbage are rejected.
fn positive_secs(raw: Option<String>) -> Option<u64> {
    raw.and_then(|s| s.trim().parse().ok()).filter(|secs| *secs > 0)
}
