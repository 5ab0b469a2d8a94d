use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{info, Instrument, Span};
use tracing_subscriber::EnvFilter;

use feedback_api::app::{app, AppState};
use feedback_api::config::AppConfig;
use feedback_api::database::{DatabaseManager, PgEntryRepository};
use feedback_api::feedback::FeedbackService;

const APP_KEY: &str = "feedback-api";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up FEEDBACK_* settings
    let _ = dotenvy::dotenv();

    let config = AppConfig::parse();
    init_tracing(config.debug);

    // Outside debug mode every line carries the app name and version
    let root = if config.debug {
        tracing::info_span!("app")
    } else {
        tracing::info_span!("app", app = APP_KEY, version = env!("CARGO_PKG_VERSION"))
    };

    if let Err(e) = run(config, &root).instrument(root.clone()).await {
        tracing::error!(parent: &root, error = ?e, "terminating");
        return Err(e);
    }
    Ok(())
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run(config: AppConfig, root: &Span) -> anyhow::Result<()> {
    info!("starting");

    let settings = config
        .database_settings()
        .context("invalid database configuration")?;
    let database = DatabaseManager::connect(&settings)
        .await
        .context("database unavailable at startup")?;

    let repo = Arc::new(PgEntryRepository::new(root, database.pool().clone()));
    let service = Arc::new(FeedbackService::new(root, repo));
    let state = AppState::new(service, Arc::new(database.clone()), config.error_status);

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    info!(addr = %config.listen_addr, "listening");

    let served = axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await;

    database.close().await;
    served.context("server error")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}
