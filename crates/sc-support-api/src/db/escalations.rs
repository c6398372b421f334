//! Escalation queue queries.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use sc_protocol::{Escalation, EscalationStatus, UnknownStatus};

/// Escalation row returned from the database.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EscalationRow {
    pub id: Uuid,
    pub chat_id: Uuid,
    pub user_id: Uuid,
    pub user_email: String,
    pub last_message: String,
    pub confidence: f64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<EscalationRow> for Escalation {
    type Error = UnknownStatus;

    fn try_from(row: EscalationRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            chat_id: row.chat_id,
            user_id: row.user_id,
            user_email: row.user_email,
            last_message: row.last_message,
            confidence: row.confidence,
            status: row.status.parse()?,
            created_at: row.created_at,
        })
    }
}

/// Flag the chat and insert the escalation in one transaction.
///
/// Returns `None` (and writes nothing) if the chat does not exist.
pub async fn escalate(
    pool: &PgPool,
    escalation: &Escalation,
) -> Result<Option<EscalationRow>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let flagged = sqlx::query(
        "UPDATE chats SET is_escalated = true, escalated_at = $2, version = version + 1
         WHERE id = $1",
    )
    .bind(escalation.chat_id)
    .bind(escalation.created_at)
    .execute(&mut *tx)
    .await?;

    if flagged.rows_affected() == 0 {
        tx.rollback().await?;
        return Ok(None);
    }

    let row = sqlx::query_as::<_, EscalationRow>(
        "INSERT INTO escalations (id, chat_id, user_id, user_email, last_message, confidence, status, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
         RETURNING *",
    )
    .bind(escalation.id)
    .bind(escalation.chat_id)
    .bind(escalation.user_id)
    .bind(&escalation.user_email)
    .bind(&escalation.last_message)
    .bind(escalation.confidence)
    .bind(escalation.status.as_str())
    .bind(escalation.created_at)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(Some(row))
}

/// Newest first. Ids are UUIDv7, so `id` breaks timestamp ties in creation order.
const LIST_RECENT: &str = "SELECT * FROM escalations ORDER BY created_at DESC, id DESC";

/// List all escalations (most recent first).
pub async fn list_recent(pool: &PgPool) -> Result<Vec<EscalationRow>, sqlx::Error> {
    sqlx::query_as::<_, EscalationRow>(LIST_RECENT)
        .fetch_all(pool)
        .await
}

pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Option<EscalationRow>, sqlx::Error> {
    sqlx::query_as::<_, EscalationRow>("SELECT * FROM escalations WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn update_status(
    pool: &PgPool,
    id: Uuid,
    status: EscalationStatus,
) -> Result<Option<EscalationRow>, sqlx::Error> {
    sqlx::query_as::<_, EscalationRow>(
        "UPDATE escalations SET status = $1 WHERE id = $2 RETURNING *",
    )
    .bind(status.as_str())
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM escalations")
        .fetch_one(pool)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use sc_protocol::NewEscalation;

    fn new_escalation() -> Escalation {
        Escalation::from_new(NewEscalation {
            chat_id: Uuid::now_v7(),
            user_id: Uuid::now_v7(),
            user_email: "customer@demo.com".into(),
            last_message: "help".into(),
            confidence: 0.4,
        })
    }

    #[test]
    fn listing_breaks_timestamp_ties_by_id() {
        assert!(LIST_RECENT.ends_with("ORDER BY created_at DESC, id DESC"));

        // Escalations created back to back get increasing ids.
        let ids: Vec<Uuid> = (0..50).map(|_| new_escalation().id).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }
}
