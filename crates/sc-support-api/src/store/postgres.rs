//! PostgreSQL store: adapts the `db` query functions to `SupportStore`.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use sc_protocol::{
    Chat, ChatMessage, ChatMetrics, Escalation, EscalationStatus, NewEscalation, NewUser, Product,
    User,
};

use super::{
    StoreError, StoreResult, SupportStore, chat_not_found, email_taken, escalation_not_found,
};
use crate::db;

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn decode<R, T>(row: R) -> StoreResult<T>
where
    T: TryFrom<R>,
    T::Error: std::fmt::Display,
{
    T::try_from(row).map_err(|e| StoreError::Serialization(e.to_string()))
}

#[async_trait]
impl SupportStore for PgStore {
    async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(db::users::get_by_id(&self.pool, id).await?.map(User::from))
    }

    async fn get_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(db::users::get_by_email(&self.pool, email)
            .await?
            .map(User::from))
    }

    async fn create_user(&self, new: NewUser) -> StoreResult<User> {
        let user = User::from_new(new);
        match db::users::insert(&self.pool, &user).await {
            Ok(()) => Ok(user),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(email_taken(&user.email))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        let rows = db::products::list_all(&self.pool).await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn get_product(&self, id: Uuid) -> StoreResult<Option<Product>> {
        Ok(db::products::get_by_id(&self.pool, id)
            .await?
            .map(Product::from))
    }

    async fn create_chat(&self, user_id: Uuid) -> StoreResult<Chat> {
        let chat = Chat::new(user_id);
        db::chats::insert(&self.pool, &chat).await?;
        Ok(chat)
    }

    async fn get_chat(&self, id: Uuid) -> StoreResult<Option<Chat>> {
        db::chats::get_by_id(&self.pool, id)
            .await?
            .map(decode)
            .transpose()
    }

    async fn list_chats_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Chat>> {
        db::chats::list_for_user(&self.pool, user_id)
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }

    async fn append_messages(
        &self,
        chat_id: Uuid,
        messages: Vec<ChatMessage>,
    ) -> StoreResult<Chat> {
        let row = db::chats::append_messages(&self.pool, chat_id, &messages)
            .await?
            .ok_or_else(|| chat_not_found(chat_id))?;
        decode(row)
    }

    async fn escalate(&self, new: NewEscalation) -> StoreResult<Escalation> {
        let chat_id = new.chat_id;
        let escalation = Escalation::from_new(new);
        let row = db::escalations::escalate(&self.pool, &escalation)
            .await?
            .ok_or_else(|| chat_not_found(chat_id))?;
        decode(row)
    }

    async fn list_escalations(&self) -> StoreResult<Vec<Escalation>> {
        db::escalations::list_recent(&self.pool)
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }

    async fn get_escalation(&self, id: Uuid) -> StoreResult<Option<Escalation>> {
        db::escalations::get_by_id(&self.pool, id)
            .await?
            .map(decode)
            .transpose()
    }

    async fn update_escalation_status(
        &self,
        id: Uuid,
        status: EscalationStatus,
    ) -> StoreResult<Escalation> {
        let row = db::escalations::update_status(&self.pool, id, status)
            .await?
            .ok_or_else(|| escalation_not_found(id))?;
        decode(row)
    }

    async fn metrics(&self) -> StoreResult<ChatMetrics> {
        let (total_chats, total_escalations, averages) = tokio::try_join!(
            db::chats::count(&self.pool),
            db::escalations::count(&self.pool),
            db::chats::averages(&self.pool),
        )?;
        Ok(ChatMetrics::from_averages(
            total_chats.max(0) as u64,
            total_escalations.max(0) as u64,
            &averages,
        ))
    }
}
