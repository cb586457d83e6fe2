mod api;
mod config;
mod db;
mod error;
mod importer;
mod llm;
mod markdown;
mod models;
mod retrieval;
mod services;

use std::sync::Arc;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::{create_router, AppState};
use crate::config::Config;
use crate::db::{Database, LibSqlPostStore, PostStore};
use crate::llm::SummarizerProvider;
use crate::retrieval::RetrievalProvider;

#[derive(Parser)]
#[command(name = "newsdesk")]
#[command(about = "Self-hostable news chatbot backend")]
struct Args {
    /// Run one sync of recent posts to the retrieval collection and exit
    #[arg(long)]
    sync_once: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "newsdesk=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    if config.server.api_keys.is_empty() {
        tracing::warn!(
            "NEWSDESK_API_KEYS is not set — admin endpoints are locked. Set NEWSDESK_API_KEYS to enable posts/sync/import routes."
        );
    }

    tracing::info!("Initializing database...");
    let database = Database::new(&config.database).await?;
    let store: Arc<dyn PostStore> = Arc::new(LibSqlPostStore::new(database));

    let retrieval = RetrievalProvider::new(&config.retrieval);
    if retrieval.is_available() {
        tracing::info!(
            "Retrieval service configured (collection: {})",
            config.retrieval.collection
        );
    } else {
        tracing::warn!("Retrieval unavailable - chat falls back to remote engine or default reply");
    }

    if let Some(summarizer_config) = &config.summarizer {
        tracing::info!("Initializing summarizer: {}...", summarizer_config.model);
    }
    let summarizer = SummarizerProvider::new(config.summarizer.as_ref());
    if !summarizer.is_available() {
        tracing::warn!("Summarizer unavailable - answers degrade to document listings");
    }

    let state = AppState::new(config.clone(), store, retrieval, summarizer);

    if args.sync_once {
        let report = state.sync.sync_posts(None).await?;
        tracing::info!(
            synced = report.synced,
            total = report.total,
            "One-off sync finished"
        );
        for message in &report.errors {
            tracing::error!("Sync error: {}", message);
        }
        return Ok(());
    }

    let cancel_token = CancellationToken::new();

    if state.sync.interval_secs() > 0 {
        tracing::info!(
            "Starting background sync... (interval={}s)",
            state.sync.interval_secs()
        );
        let sync = state.sync.clone();
        let token = cancel_token.child_token();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        tracing::info!("Background sync shutting down...");
                        break;
                    }
                    _ = tokio::time::sleep(tokio::time::Duration::from_secs(sync.interval_secs())) => {
                        if let Err(e) = sync.run_once().await {
                            tracing::error!("Background sync error: {}", e);
                        }
                    }
                }
            }
        });
    }

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Newsdesk starting on http://{}", addr);
    tracing::info!("  Health check: http://{}/api/v1/health", addr);
    tracing::info!("  Chat:         http://{}/api/v1/message", addr);
    tracing::info!("  API docs:     http://{}/api/v1/docs", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancel_token))
        .await?;

    Ok(())
}

async fn shutdown_signal(cancel_token: CancellationToken) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, cancelling background tasks...");
    cancel_token.cancel();
}
