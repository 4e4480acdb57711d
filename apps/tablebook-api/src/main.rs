//! # Tablebook API
//!
//! HTTP server for locating, booking and billing restaurant tables.
//!
//! ## Startup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  tracing ─► ServerConfig::load ─► stores ─► seed layout ─► serve       │
//! │                                     │                         │         │
//! │                          sqlite: connect + migrate     Ctrl-C / SIGTERM │
//! │                          memory: empty                        │         │
//! │                                                          close pool     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use tablebook_api::{create_router, AppState, ServerConfig, StorageBackend};
use tablebook_core::memory::{InMemoryBookingStore, InMemoryTableRegistry};
use tablebook_db::{Database, DbConfig};

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "info,tablebook=debug,sqlx=warn";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_target(true)
        .init();

    info!("Starting Tablebook API server...");

    let config = ServerConfig::load().context("loading configuration")?;
    info!(
        addr = %config.bind_address(),
        storage = %config.storage,
        "Configuration loaded"
    );

    let (state, database) = match config.storage {
        StorageBackend::Sqlite => {
            let db_config =
                DbConfig::new(&config.database_path).max_connections(config.db_max_connections);
            let db = Database::new(db_config)
                .await
                .with_context(|| format!("opening database {}", config.database_path))?;
            info!(path = %config.database_path, "Connected to SQLite");

            let state = AppState::new(Arc::new(db.tables()), Arc::new(db.bookings()));
            (state, Some(db))
        }
        StorageBackend::Memory => {
            let state = AppState::new(
                Arc::new(InMemoryTableRegistry::new()),
                Arc::new(InMemoryBookingStore::new()),
            );
            (state, None)
        }
    };
    let state = state.with_max_upload_bytes(config.max_upload_bytes);

    let layout = config.tables()?;
    let seeded = state
        .tables
        .seed(&layout)
        .await
        .context("seeding table layout")?;
    info!(tables = layout.len(), inserted = seeded, "Table layout seeded");

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "Listening");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    if let Some(db) = database {
        db.close().await;
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
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
                error!(error = %e, "Failed to install SIGTERM handler");
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

    info!("Shutdown signal received, starting graceful shutdown...");
}
