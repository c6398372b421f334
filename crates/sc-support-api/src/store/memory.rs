//! In-memory store backed by `tokio::sync::RwLock` maps.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use sc_protocol::{
    Chat, ChatMessage, ChatMetrics, Escalation, EscalationStatus, NewEscalation, NewUser, Product,
    User, UserRole, demo_products,
};

use super::{
    StoreResult, SupportStore, chat_not_found, email_taken, escalation_not_found,
};

#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    products: RwLock<Vec<Product>>,
    chats: RwLock<HashMap<Uuid, Chat>>,
    /// Insertion order; listed in reverse.
    escalations: RwLock<Vec<Escalation>>,
}

impl MemoryStore {
    /// Empty store (for tests).
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with the demo accounts and catalogue.
    pub fn with_demo_data() -> Self {
        let users = demo_users()
            .into_iter()
            .map(|u| (u.id, u))
            .collect::<HashMap<_, _>>();
        Self {
            users: RwLock::new(users),
            products: RwLock::new(demo_products()),
            ..Self::default()
        }
    }
}

/// Demo accounts: one customer, one admin, both with password "password".
pub fn demo_users() -> Vec<User> {
    [
        ("customer@demo.com", UserRole::Customer),
        ("admin@demo.com", UserRole::Admin),
    ]
    .into_iter()
    .map(|(email, role)| {
        User::from_new(NewUser {
            email: email.into(),
            password: "password".into(),
            role,
        })
    })
    .collect()
}

#[async_trait]
impl SupportStore for MemoryStore {
    async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn create_user(&self, new: NewUser) -> StoreResult<User> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == new.email) {
            return Err(email_taken(&new.email));
        }
        let user = User::from_new(new);
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        Ok(self.products.read().await.clone())
    }

    async fn get_product(&self, id: Uuid) -> StoreResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.iter().find(|p| p.id == id).cloned())
    }

    async fn create_chat(&self, user_id: Uuid) -> StoreResult<Chat> {
        let chat = Chat::new(user_id);
        self.chats.write().await.insert(chat.id, chat.clone());
        Ok(chat)
    }

    async fn get_chat(&self, id: Uuid) -> StoreResult<Option<Chat>> {
        Ok(self.chats.read().await.get(&id).cloned())
    }

    async fn list_chats_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Chat>> {
        let chats = self.chats.read().await;
        let mut owned: Vec<Chat> = chats
            .values()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn append_messages(
        &self,
        chat_id: Uuid,
        messages: Vec<ChatMessage>,
    ) -> StoreResult<Chat> {
        let mut chats = self.chats.write().await;
        let chat = chats.get_mut(&chat_id).ok_or_else(|| chat_not_found(chat_id))?;
        chat.append(messages);
        Ok(chat.clone())
    }

    async fn escalate(&self, new: NewEscalation) -> StoreResult<Escalation> {
        // Lock order: chats, then escalations.
        let mut chats = self.chats.write().await;
        let chat = chats
            .get_mut(&new.chat_id)
            .ok_or_else(|| chat_not_found(new.chat_id))?;

        let mut escalations = self.escalations.write().await;
        chat.mark_escalated(Utc::now());
        let escalation = Escalation::from_new(new);
        escalations.push(escalation.clone());
        Ok(escalation)
    }

    async fn list_escalations(&self) -> StoreResult<Vec<Escalation>> {
        let escalations = self.escalations.read().await;
        Ok(escalations.iter().rev().cloned().collect())
    }

    async fn get_escalation(&self, id: Uuid) -> StoreResult<Option<Escalation>> {
        let escalations = self.escalations.read().await;
        Ok(escalations.iter().find(|e| e.id == id).cloned())
    }

    async fn update_escalation_status(
        &self,
        id: Uuid,
        status: EscalationStatus,
    ) -> StoreResult<Escalation> {
        let mut escalations = self.escalations.write().await;
        let escalation = escalations
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| escalation_not_found(id))?;
        escalation.status = status;
        Ok(escalation.clone())
    }

    async fn metrics(&self) -> StoreResult<ChatMetrics> {
        let chats = self.chats.read().await;
        let escalations = self.escalations.read().await;
        let averages: Vec<f64> = chats.values().filter_map(|c| c.avg_confidence).collect();
        Ok(ChatMetrics::from_averages(
            chats.len() as u64,
            escalations.len() as u64,
            &averages,
        ))
    }
}
