//! Chat transcript queries.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use sc_protocol::{Chat, ChatMessage};

/// Chat row returned from the database.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ChatRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub messages: serde_json::Value,
    pub is_escalated: bool,
    pub escalated_at: Option<DateTime<Utc>>,
    pub avg_confidence: Option<f64>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ChatRow> for Chat {
    type Error = serde_json::Error;

    fn try_from(row: ChatRow) -> Result<Self, Self::Error> {
        let messages: Vec<ChatMessage> = serde_json::from_value(row.messages)?;
        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            messages,
            is_escalated: row.is_escalated,
            escalated_at: row.escalated_at,
            avg_confidence: row.avg_confidence,
            version: row.version,
            created_at: row.created_at,
        })
    }
}

/// Insert a new, empty chat.
pub async fn insert(pool: &PgPool, chat: &Chat) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO chats (id, user_id, messages, is_escalated, version, created_at)
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(chat.id)
    .bind(chat.user_id)
    .bind(Json(&chat.messages))
    .bind(chat.is_escalated)
    .bind(chat.version)
    .bind(chat.created_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// Get a chat by ID.
pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Option<ChatRow>, sqlx::Error> {
    sqlx::query_as::<_, ChatRow>("SELECT * FROM chats WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// List a user's chats (most recent first).
pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<ChatRow>, sqlx::Error> {
    sqlx::query_as::<_, ChatRow>(
        "SELECT * FROM chats WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Append messages and recompute the bot-confidence average in one statement.
///
/// Every SET expression sees the pre-update row, so the average is computed
/// over the old array concatenated with the new messages.
pub async fn append_messages(
    pool: &PgPool,
    id: Uuid,
    messages: &[ChatMessage],
) -> Result<Option<ChatRow>, sqlx::Error> {
    sqlx::query_as::<_, ChatRow>(
        "UPDATE chats SET
             messages = messages || $2::jsonb,
             avg_confidence = (
                 SELECT AVG((m ->> 'confidence')::float8)
                 FROM jsonb_array_elements(chats.messages || $2::jsonb) AS m
                 WHERE m ->> 'type' = 'bot' AND m ->> 'confidence' IS NOT NULL
             ),
             version = version + 1
         WHERE id = $1
         RETURNING *",
    )
    .bind(id)
    .bind(Json(messages))
    .fetch_optional(pool)
    .await
}

pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM chats")
        .fetch_one(pool)
        .await
}

/// Per-chat averages of every chat that has at least one bot reply.
pub async fn averages(pool: &PgPool) -> Result<Vec<f64>, sqlx::Error> {
    sqlx::query_scalar::<_, f64>(
        "SELECT avg_confidence FROM chats WHERE avg_confidence IS NOT NULL",
    )
    .fetch_all(pool)
    .await
}
