//! Storage for users, catalogue, chats, and escalations.
//!
//! `SupportStore` is injected into `AppState`. Two implementations:
//! - [`MemoryStore`]: `RwLock<HashMap>` maps (tests and development).
//! - [`PgStore`]: PostgreSQL via `sqlx` (production).
//!
//! Chat appends and escalations are single atomic operations; callers never
//! fetch a chat, modify it, and write it back.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use sc_protocol::{
    Chat, ChatMessage, ChatMetrics, Escalation, EscalationStatus, NewEscalation, NewUser, Product,
    User,
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Storage failures surfaced to request handlers.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("serialization error: {0}")]
    Serialization(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait SupportStore: Send + Sync {
    // ── users ────────────────────────────────────────────────────

    async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>>;

    async fn get_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Create an account. Fails with `Conflict` if the email is taken.
    async fn create_user(&self, new: NewUser) -> StoreResult<User>;

    // ── catalogue ────────────────────────────────────────────────

    async fn list_products(&self) -> StoreResult<Vec<Product>>;

    async fn get_product(&self, id: Uuid) -> StoreResult<Option<Product>>;

    // ── chats ────────────────────────────────────────────────────

    async fn create_chat(&self, user_id: Uuid) -> StoreResult<Chat>;

    async fn get_chat(&self, id: Uuid) -> StoreResult<Option<Chat>>;

    /// Chats owned by a user, most recent first.
    async fn list_chats_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Chat>>;

    /// Append messages, recompute the average confidence, and bump the version
    /// in one step. Concurrent appends to the same chat never lose messages.
    async fn append_messages(&self, chat_id: Uuid, messages: Vec<ChatMessage>)
    -> StoreResult<Chat>;

    // ── escalations ──────────────────────────────────────────────

    /// Mark the chat escalated and record exactly one escalation, atomically.
    async fn escalate(&self, new: NewEscalation) -> StoreResult<Escalation>;

    /// All escalations, newest first.
    async fn list_escalations(&self) -> StoreResult<Vec<Escalation>>;

    async fn get_escalation(&self, id: Uuid) -> StoreResult<Option<Escalation>>;

    async fn update_escalation_status(
        &self,
        id: Uuid,
        status: EscalationStatus,
    ) -> StoreResult<Escalation>;

    // ── metrics ──────────────────────────────────────────────────

    async fn metrics(&self) -> StoreResult<ChatMetrics>;
}

pub(crate) fn chat_not_found(id: Uuid) -> StoreError {
    StoreError::NotFound(format!("chat '{id}' not found"))
}

pub(crate) fn escalation_not_found(id: Uuid) -> StoreError {
    StoreError::NotFound(format!("escalation '{id}' not found"))
}

pub(crate) fn email_taken(email: &str) -> StoreError {
    StoreError::Conflict(format!("user '{email}' already exists"))
}
