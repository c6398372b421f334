//! Shared application state for the Axum server.
//!
//! The store and the classifier are constructed by the caller and injected:
//! - **Database mode**: `PgStore` over a `PgPool` (production).
//! - **In-memory mode**: `MemoryStore` (tests and development).

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::events::WsEvent;
use crate::inference::ResponseClassifier;
use crate::store::{MemoryStore, SupportStore};

/// Shared application state, cheap to clone into Axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// Users, catalogue, chats, and escalations.
    pub store: Arc<dyn SupportStore>,
    /// Reply generation for customer messages.
    pub classifier: Arc<ResponseClassifier>,
    /// Broadcast channel for real-time WebSocket events.
    pub event_tx: broadcast::Sender<WsEvent>,
}

impl AppState {
    pub fn new(store: Arc<dyn SupportStore>, classifier: ResponseClassifier) -> Self {
        let (event_tx, _) = broadcast::channel(256);
        Self {
            store,
            classifier: Arc::new(classifier),
            event_tx,
        }
    }

    /// Empty in-memory state with a rules-only classifier (for tests).
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), ResponseClassifier::rules_only())
    }

    /// In-memory state seeded with demo accounts and products.
    pub fn with_sample_data() -> Self {
        Self::new(
            Arc::new(MemoryStore::with_demo_data()),
            ResponseClassifier::rules_only(),
        )
    }

    /// Replace the classifier (e.g. to point the delegate at a mock server).
    pub fn with_classifier(mut self, classifier: ResponseClassifier) -> Self {
        self.classifier = Arc::new(classifier);
        self
    }

    /// Publish an event; having no subscribers is fine.
    pub fn publish(&self, event: WsEvent) {
        let _ = self.event_tx.send(event);
    }
}
