//! Support chat API server.
//!
//! Serves accounts, the product catalogue, bot-answered support chats,
//! human-agent escalations, and live updates over WebSocket.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use sc_support_api::config::ApiConfig;
use sc_support_api::db;
use sc_support_api::inference::ResponseClassifier;
use sc_support_api::routes;
use sc_support_api::state::AppState;
use sc_support_api::store::{MemoryStore, PgStore, SupportStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .json()
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "sc-support-api starting");

    let config = ApiConfig::from_env();

    // PostgreSQL when DATABASE_URL is set, otherwise in-memory demo data.
    let store: Arc<dyn SupportStore> = match config.database_url.as_deref() {
        Some(database_url) => {
            tracing::info!("connecting to PostgreSQL");
            let pool = db::connect(database_url).await?;
            db::seed_demo_data(&pool).await?;
            Arc::new(PgStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store with demo data");
            Arc::new(MemoryStore::with_demo_data())
        }
    };

    let classifier = ResponseClassifier::from_config(&config.delegate)?;
    tracing::info!(
        delegate = classifier.has_delegate(),
        model = %config.delegate.model,
        "response classifier ready"
    );

    let app = routes::build_router_with_cors(AppState::new(store, classifier), &config.cors_origins);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "listening");

    axum::serve(listener, app).await?;

    Ok(())
}
