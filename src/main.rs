//! PhishGuard Server entry point

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use phishguard::config::{Config, StoreBackend};
use phishguard::db;
use phishguard::logic::{
    MemoryResultStore, OnnxScorer, OpenAiRelay, PgResultStore, ResultStore, ThresholdConfig,
};
use phishguard::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    init_tracing(config.is_production());

    if let Some(raw) = &config.rejected_threshold {
        tracing::warn!(
            "Ignoring PHISHING_THRESHOLD={:?}, using {}",
            raw, config.phishing_threshold
        );
    }

    tracing::info!("PhishGuard Server starting...");
    tracing::info!("Model: {}", config.model_path);
    tracing::info!("Phishing threshold: {}%", config.phishing_threshold);

    let store: Arc<dyn ResultStore> = match config.store_backend {
        StoreBackend::Postgres => {
            tracing::info!("Database: {}", config.database_display());

            let pool = db::create_pool(&config.database_url, config.database_max_connections)
                .await
                .context("Failed to create database pool")?;

            tracing::info!("Running database migrations...");
            db::run_migrations(&pool)
                .await
                .context("Failed to run migrations")?;

            Arc::new(PgResultStore::new(pool))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory result store, history is lost on restart");
            Arc::new(MemoryResultStore::new())
        }
    };

    if config.openai_api_key.is_empty() {
        tracing::warn!("OPENAI_API_KEY is not set, /gpt-response will fail");
    }

    let state = AppState::new(
        Arc::new(OnnxScorer::new(&config.model_path)),
        store,
        Arc::new(OpenAiRelay::new(
            &config.openai_base_url,
            &config.openai_api_key,
            &config.chat_model,
        )),
        ThresholdConfig::new(config.phishing_threshold),
    );

    let app = create_router(state, config.request_timeout);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "phishguard=debug,tower_http=debug".into());

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
