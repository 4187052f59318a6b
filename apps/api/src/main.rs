mod analysis;
mod chat;
mod config;
mod db;
mod errors;
mod extract;
mod llm_client;
mod routes;
mod state;
mod store;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::AnalysisClient;
use crate::chat::ChatAdapter;
use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::{GeminiClient, ModelTransport};
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::PgResultStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ResumePro API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (runs migrations)
    let db = create_pool(&config.database_url).await?;

    // One transport shared by the analysis client and the chat adapter
    let transport: Arc<dyn ModelTransport> = Arc::new(GeminiClient::new(config.gemini())?);
    info!(
        "LLM client initialized (models: {}, {})",
        llm_client::MODEL_PRO,
        llm_client::MODEL_FLASH
    );

    let state = AppState {
        analysis: AnalysisClient::new(transport.clone()),
        chat: ChatAdapter::new(transport),
        store: Arc::new(PgResultStore::new(db)),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client has a fixed domain

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
