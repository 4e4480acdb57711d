//! # Tablebook API
//!
//! HTTP server exposing the table booking operations.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Tablebook API Routes                            │
//! │                                                                         │
//! │  GET  /healthcheck     ──► health                                       │
//! │  POST /locate          ──► locate      (form, Accept: json)            │
//! │  POST /booking         ──► book        (json)                          │
//! │  POST /bill            ──► bill        (multipart, 16 MiB)             │
//! │  PUT  /tables          ──► update_table_status (json)                  │
//! │  GET  /tables          ──► list_tables                                 │
//! │  GET  /booking/{id}    ──► get_booking                                 │
//! │                                                                         │
//! │  Every handler: check headers ─► decode ─► validate ─► core op ─► JSON │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  AppState                                                        │  │
//! │  │  tables:   Arc<dyn TableRegistry>   (SQLite or in-memory)        │  │
//! │  │  bookings: Arc<dyn BookingStore>    (SQLite or in-memory)        │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! See [`config`] for the environment variables.

pub mod config;
pub mod error;
pub mod headers;
pub mod services;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use tablebook_core::memory::{InMemoryBookingStore, InMemoryTableRegistry};
use tablebook_core::{BookingStore, Table, TableRegistry};

// Re-exports
pub use config::{ServerConfig, StorageBackend};
pub use error::{ApiError, ErrorBody};

/// Default body limit for `/bill` uploads (16 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Shared application state.
///
/// Cloned per request; both stores are behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub tables: Arc<dyn TableRegistry>,
    pub bookings: Arc<dyn BookingStore>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(tables: Arc<dyn TableRegistry>, bookings: Arc<dyn BookingStore>) -> Self {
        AppState {
            tables,
            bookings,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    /// State backed by fresh in-memory stores holding `tables`.
    pub fn in_memory(tables: Vec<Table>) -> Self {
        AppState::new(
            Arc::new(InMemoryTableRegistry::from_tables(tables)),
            Arc::new(InMemoryBookingStore::new()),
        )
    }

    pub fn with_max_upload_bytes(mut self, bytes: usize) -> Self {
        self.max_upload_bytes = bytes;
        self
    }
}

/// Builds the router with every endpoint and the tracing layer.
pub fn create_router(state: AppState) -> Router {
    // Multipart bodies get their own limit instead of axum's 2 MB default.
    let bill_routes = Router::new()
        .route("/bill", post(services::bill::pay_bill))
        .layer(
            ServiceBuilder::new()
                .layer(DefaultBodyLimit::disable())
                .layer(RequestBodyLimitLayer::new(state.max_upload_bytes)),
        );

    Router::new()
        .route("/healthcheck", get(services::health::healthcheck))
        .route("/locate", post(services::locate::locate_table))
        .route("/booking", post(services::booking::create_booking))
        .route("/booking/{id}", get(services::booking::get_booking))
        .route(
            "/tables",
            get(services::tables::list_tables).put(services::tables::update_table),
        )
        .merge(bill_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
