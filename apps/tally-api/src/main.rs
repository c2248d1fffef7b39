//! # Tally API Server
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tally API Server                                 │
//! │                                                                         │
//! │  Browser / client ───► HTTP (8000) ───► Services ───► SQLite           │
//! │                                                                         │
//! │  tally-api --import-legacy <dir>                                       │
//! │      one-shot import of an old history.json layout, then exit          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use tally_api::{build_router, ApiConfig, AppState};
use tally_db::{import_legacy_history, Database, DbConfig};

const IMPORT_LEGACY_FLAG: &str = "--import-legacy";

/// What the binary was asked to do.
enum Command {
    Serve,
    ImportLegacy(PathBuf),
}

fn parse_args(mut args: impl Iterator<Item = String>) -> anyhow::Result<Command> {
    match args.next() {
        None => Ok(Command::Serve),
        Some(flag) if flag == IMPORT_LEGACY_FLAG => match args.next() {
            Some(dir) => Ok(Command::ImportLegacy(PathBuf::from(dir))),
            None => bail!("{} requires a directory argument", IMPORT_LEGACY_FLAG),
        },
        Some(other) => bail!("Unknown argument: {}", other),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG overrides; default to info
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let command = parse_args(std::env::args().skip(1))?;

    let config = ApiConfig::load()?;
    info!(
        addr = %config.socket_addr(),
        database = %config.database_path.display(),
        max_upload_bytes = config.max_upload_bytes,
        "Configuration loaded"
    );

    let db = Database::new(
        DbConfig::new(&config.database_path).max_connections(config.db_max_connections),
    )
    .await
    .context("Failed to open database")?;

    match command {
        Command::ImportLegacy(dir) => {
            let report = import_legacy_history(&db, &dir)
                .await
                .with_context(|| format!("Legacy import from {} failed", dir.display()))?;
            info!(
                imported = report.imported,
                skipped_without_files = report.skipped_without_files,
                skipped_existing = report.skipped_existing,
                missing_artifacts = report.missing_artifacts.len(),
                "Legacy import complete"
            );
        }
        Command::Serve => {
            let state = AppState::new(Arc::new(db.clone()), &config);
            let app = build_router(state);

            let addr = config.socket_addr();
            let listener = TcpListener::bind(addr)
                .await
                .with_context(|| format!("Failed to bind to {}", addr))?;
            info!(%addr, "Starting HTTP server");

            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            info!("Server shutdown complete");
        }
    }

    db.close().await;
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
