//! Shared test harness for end-to-end tests.
//!
//! Drives the real router over an in-memory store seeded with the demo
//! accounts and catalogue, and keeps a WebSocket event receiver open.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tokio::sync::broadcast;
use tower::ServiceExt;
use uuid::Uuid;

use sc_support_api::config::DelegateConfig;
use sc_support_api::events::WsEvent;
use sc_support_api::inference::{ChatCompletionsClient, ResponseClassifier};
use sc_support_api::routes::build_router;
use sc_support_api::state::AppState;

pub const CUSTOMER_EMAIL: &str = "customer@demo.com";
pub const ADMIN_EMAIL: &str = "admin@demo.com";
pub const DEMO_PASSWORD: &str = "password";

/// End-to-end harness around the support API router.
pub struct TestHarness {
    /// Application state (in-memory store).
    pub state: AppState,
    /// Axum router for HTTP requests via `tower::oneshot`.
    pub router: Router,
    /// WebSocket event receiver for asserting broadcast events.
    pub event_rx: broadcast::Receiver<WsEvent>,
}

impl TestHarness {
    /// Demo data, rules-only classifier.
    pub fn with_sample_data() -> Self {
        Self::from_state(AppState::with_sample_data())
    }

    /// Demo data, with the delegate pointed at `endpoint`.
    pub fn with_delegate(endpoint: &str) -> Self {
        let config = DelegateConfig {
            api_key: Some("test-token".into()),
            endpoint: endpoint.to_string(),
            timeout_secs: 2,
            ..DelegateConfig::default()
        };
        let client = ChatCompletionsClient::new(config).unwrap();
        let classifier = ResponseClassifier::new(Some(Arc::new(client)));
        Self::from_state(AppState::with_sample_data().with_classifier(classifier))
    }

    fn from_state(state: AppState) -> Self {
        let event_rx = state.event_tx.subscribe();
        let router = build_router(state.clone());
        Self {
            state,
            router,
            event_rx,
        }
    }

    /// Issue a request and return (status, JSON body). Empty bodies become `Null`.
    pub async fn request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn get(&self, uri: &str, user_id: Option<Uuid>) -> (StatusCode, Value) {
        let mut builder = Request::get(uri);
        if let Some(id) = user_id {
            builder = builder.header("user-id", id.to_string());
        }
        self.request(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn post(&self, uri: &str, user_id: Option<Uuid>, body: Value) -> (StatusCode, Value) {
        self.with_body(Request::post(uri), user_id, body).await
    }

    pub async fn patch(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.with_body(Request::patch(uri), None, body).await
    }

    async fn with_body(
        &self,
        mut builder: axum::http::request::Builder,
        user_id: Option<Uuid>,
        body: Value,
    ) -> (StatusCode, Value) {
        builder = builder.header("content-type", "application/json");
        if let Some(id) = user_id {
            builder = builder.header("user-id", id.to_string());
        }
        let request = builder
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap();
        self.request(request).await
    }

    /// Log in and return the user id from the response.
    pub async fn login(&self, email: &str, password: &str) -> Uuid {
        let (status, json) = self
            .post(
                "/api/auth/login",
                None,
                json!({"email": email, "password": password}),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login for {email} failed: {json}");
        json["user"]["id"].as_str().unwrap().parse().unwrap()
    }

    pub async fn login_customer(&self) -> Uuid {
        self.login(CUSTOMER_EMAIL, DEMO_PASSWORD).await
    }

    /// POST /api/chat/message, optionally continuing `chat_id`.
    pub async fn send_message(
        &self,
        user_id: Uuid,
        message: &str,
        chat_id: Option<Uuid>,
    ) -> (StatusCode, Value) {
        let mut body = json!({ "message": message });
        if let Some(id) = chat_id {
            body["chatId"] = json!(id);
        }
        self.post("/api/chat/message", Some(user_id), body).await
    }

    /// POST /api/escalations.
    pub async fn escalate(
        &self,
        user_id: Uuid,
        chat_id: Uuid,
        last_message: &str,
        confidence: f64,
    ) -> (StatusCode, Value) {
        self.post(
            "/api/escalations",
            Some(user_id),
            json!({
                "chatId": chat_id,
                "lastMessage": last_message,
                "confidence": confidence,
            }),
        )
        .await
    }

    /// Drain every event published so far.
    pub fn drain_events(&mut self) -> Vec<WsEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.event_rx.try_recv() {
            events.push(event);
        }
        events
    }
}

/// Parse a UUID string field out of a JSON body.
pub fn uuid_field(json: &Value, field: &str) -> Uuid {
    json[field]
        .as_str()
        .unwrap_or_else(|| panic!("missing '{field}' in {json}"))
        .parse()
        .unwrap()
}
