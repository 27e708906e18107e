//! Main entry point for the opsportal backend.
//!
//! This file loads configuration, initializes logging, opens and seeds the
//! user database, builds the services and the Axum router, and serves until
//! interrupted.

use std::sync::Arc;

use adapters::ProcessRunner;
use anyhow::Context;
use backend::api::{self, AppState};
use backend::auth::cookies::CookieSettings;
use backend::config::{Args, Config};
use backend::database::{self, Database};
use backend::logging::init_logging;
use backend::services::ReportService;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::from_args(&args)?;
    init_logging(&config.logging.level, &config.logging.format)?;

    let db = Database::open(&config.database.path)
        .with_context(|| format!("failed to open database {}", config.database.path.display()))?;
    if config.database.seed_defaults {
        database::seed_default_users(&db, config.auth.bcrypt_cost)
            .await
            .context("failed to seed default users")?;
    }

    let scripts = &config.scripts;
    let runner = ProcessRunner::new(&scripts.interpreter)
        .with_timeout(scripts.timeout())
        .with_max_attempts(scripts.max_attempts);
    let reports = ReportService::new(Arc::new(runner), scripts);

    let state = AppState {
        db,
        cookies: CookieSettings {
            secure: config.auth.cookie_secure,
        },
        reports: Arc::new(reports),
        bcrypt_cost: config.auth.bcrypt_cost,
    };
    let app = api::router(state);

    let addr = config.listen_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server is running on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
    }
}
