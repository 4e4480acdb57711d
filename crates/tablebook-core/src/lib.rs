//! # tablebook-core: Booking State-Transition Logic
//!
//! This crate is the **heart** of Tablebook. It owns the rules that tie a
//! table's occupancy to the lifecycle of the booking sitting at it.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tablebook Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 tablebook-api (HTTP adapter)                    │   │
//! │  │   /locate    /booking    /bill    /tables    /healthcheck       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ one operation per endpoint             │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ tablebook-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌────────────┐  ┌────────────┐  ┌────────────┐  ┌──────────┐ │   │
//! │  │   │ operations │  │   store    │  │   types    │  │validation│ │   │
//! │  │   │  locate    │  │ Registry   │  │  Table     │  │  rules   │ │   │
//! │  │   │  book      │  │ Bookings   │  │  Booking   │  │  checks  │ │   │
//! │  │   │  bill      │  │ (traits)   │  │  statuses  │  │          │ │   │
//! │  │   └────────────┘  └────────────┘  └────────────┘  └──────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK                            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ TableRegistry / BookingStore           │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │     memory (this crate)   or   tablebook-db (SQLite)            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Table, Booking, statuses, party details)
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation used by the transport layer
//! - [`store`] - Storage traits the operations run against
//! - [`memory`] - Mutex-guarded in-memory stores
//! - [`operations`] - Locate, Book, Bill and table status updates
//!
//! ## Example Usage
//!
//! ```rust
//! use tablebook_core::memory::{InMemoryBookingStore, InMemoryTableRegistry};
//! use tablebook_core::operations::{bill, book, locate};
//! use tablebook_core::{NewBooking, PartyDetails, TableStatus};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let tables = InMemoryTableRegistry::with_layout(&[(1, 2), (2, 4)]);
//! let bookings = InMemoryBookingStore::new();
//!
//! let table = locate(&tables, 2).await.unwrap();
//! assert_eq!(table.id, 1);
//!
//! let booking = book(
//!     &tables,
//!     &bookings,
//!     NewBooking::new(table.id, PartyDetails::new("Ada", 2)),
//! )
//! .await
//! .unwrap();
//!
//! bill(&tables, &bookings, booking.id).await.unwrap();
//! assert_eq!(tables.status_of(1), Some(TableStatus::Free));
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod memory;
pub mod operations;
pub mod store;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ErrorKind, ValidationError};
pub use store::{BookingStore, TableRegistry};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Largest capacity accepted for a table in a layout.
pub const MAX_TABLE_CAPACITY: u32 = 50;

/// Maximum length of the guest name on a booking.
pub const MAX_GUEST_NAME_LEN: usize = 100;

/// Maximum length of free-form booking notes.
pub const MAX_NOTES_LEN: usize = 500;

/// Table layout seeded when none is configured, as `id:capacity` pairs.
pub const DEFAULT_TABLE_LAYOUT: &str = "1:2,2:2,3:4,4:4,5:6,6:8";
