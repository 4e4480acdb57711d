//! # tablebook-db: Database Layer for Tablebook
//!
//! This crate provides SQLite persistence for the table registry and the
//! booking store.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tablebook Data Flow                              │
//! │                                                                         │
//! │  tablebook-core operation (locate / book / bill)                       │
//! │       │  via TableRegistry / BookingStore traits                        │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   tablebook-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌─────────────────┐  ┌──────────────┐   │   │
//! │  │   │   Database    │    │  Repositories   │  │  Migrations  │   │   │
//! │  │   │   (pool.rs)   │    │                 │  │  (embedded)  │   │   │
//! │  │   │               │    │ TableRepository │  │ 001_initial  │   │   │
//! │  │   │ SqlitePool    │◄───│ BookingRepo     │  │   _schema    │   │   │
//! │  │   └───────────────┘    └─────────────────┘  └──────────────┘   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (DATABASE_PATH, default ./tablebook.db)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Store trait implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tablebook_core::operations::locate;
//! use tablebook_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("tablebook.db")).await?;
//! let table = locate(&db.tables(), 4).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::DbError;
pub use pool::{Database, DbConfig};

pub use repository::booking::BookingRepository;
pub use repository::table::TableRepository;
