//! API route definitions and router builder.

pub mod auth;
pub mod chat;
pub mod escalations;
pub mod health;
pub mod identity;
pub mod metrics;
pub mod products;
pub mod ws;

use axum::Router;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the Axum router allowing any CORS origin.
pub fn build_router(state: AppState) -> Router {
    build_router_with_cors(state, &[])
}

/// Build the Axum router with all routes and middleware.
///
/// An empty origin list allows any origin.
pub fn build_router_with_cors(state: AppState, cors_origins: &[String]) -> Router {
    let origins: Vec<HeaderValue> = cors_origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };
    let cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        // Accounts
        .route("/auth/login", post(auth::login))
        .route("/auth/register", post(auth::register))
        // Catalogue
        .route("/products", get(products::list_products))
        .route("/products/{id}", get(products::get_product))
        // Support chat
        .route("/chat/message", post(chat::send_message))
        .route("/chat/{id}", get(chat::get_chat))
        .route("/chats", get(chat::list_my_chats))
        // Agent queue
        .route(
            "/escalations",
            get(escalations::list_escalations).post(escalations::create_escalation),
        )
        .route(
            "/escalations/{id}",
            get(escalations::get_escalation).patch(escalations::update_escalation),
        )
        .route("/metrics", get(metrics::get_metrics))
        // WebSocket endpoint
        .route("/ws", get(ws::ws_handler));

    Router::new()
        .route("/health", get(health::health))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}
