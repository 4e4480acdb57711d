//! # Store Traits
//!
//! The two pieces of shared state the operations run against.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   operations::{locate, book, bill, update_table_status}                │
//! │          │                               │                              │
//! │          ▼                               ▼                              │
//! │   ┌───────────────┐              ┌───────────────┐                     │
//! │   │ TableRegistry │              │ BookingStore  │                     │
//! │   └───────┬───────┘              └───────┬───────┘                     │
//! │           │                              │                              │
//! │     ┌─────┴──────┐                 ┌─────┴──────┐                      │
//! │     ▼            ▼                 ▼            ▼                      │
//! │  in-memory    SQLite            in-memory    SQLite                    │
//! │  (memory.rs)  (tablebook-db)    (memory.rs)  (tablebook-db)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Atomicity
//! Every method is atomic with respect to a single record. Nothing here
//! spans a table and a booking at once: operations that touch both sequence
//! single-record calls and compensate on failure.
//!
//! Implementations are shared across request handlers, hence `Send + Sync`,
//! and are object safe so the transport can hold `Arc<dyn TableRegistry>`.

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::{Booking, BookingId, BookingStatus, PartyDetails, Table, TableId, TableStatus};

/// Holds the fixed set of tables and their occupancy.
#[async_trait]
pub trait TableRegistry: Send + Sync {
    /// All tables, ordered by identifier.
    async fn list_tables(&self) -> CoreResult<Vec<Table>>;

    /// Looks up one table.
    async fn get_table(&self, table_id: TableId) -> CoreResult<Option<Table>>;

    /// Returns the lowest-id `Free` table seating at least `party_size`,
    /// without changing it.
    async fn find_free_table(&self, party_size: u32) -> CoreResult<Option<Table>>;

    /// Same selection as [`find_free_table`](Self::find_free_table), and
    /// marks the table `Occupied` in the same atomic step.
    async fn claim_free_table(&self, party_size: u32) -> CoreResult<Option<Table>>;

    /// Sets a table's status unconditionally.
    ///
    /// Fails with `CoreError::TableNotFound` when the table does not exist.
    async fn set_status(&self, table_id: TableId, status: TableStatus) -> CoreResult<()>;

    /// Sets the status only if it currently equals `expected`.
    ///
    /// Returns `Ok(false)` when the current status differs and
    /// `CoreError::TableNotFound` when the table does not exist.
    async fn compare_and_set_status(
        &self,
        table_id: TableId,
        expected: TableStatus,
        status: TableStatus,
    ) -> CoreResult<bool>;

    /// Inserts the initial layout. Tables that already exist are left as
    /// they are. Returns how many were inserted.
    async fn seed(&self, tables: &[Table]) -> CoreResult<usize>;
}

/// Holds booking records.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Allocates a new identifier and stores an `Eating` booking.
    ///
    /// Fails with `CoreError::TableAlreadyBooked` if an `Eating` booking
    /// already references the table.
    async fn create(&self, table_id: TableId, party: &PartyDetails) -> CoreResult<Booking>;

    /// Looks up one booking.
    async fn find_by_id(&self, booking_id: BookingId) -> CoreResult<Option<Booking>>;

    /// The `Eating` booking referencing the table, if any.
    async fn find_active_by_table(&self, table_id: TableId) -> CoreResult<Option<Booking>>;

    /// Sets a booking's status unconditionally.
    ///
    /// Fails with `CoreError::BookingNotFound` when the booking does not exist.
    async fn set_status(&self, booking_id: BookingId, status: BookingStatus) -> CoreResult<()>;

    /// Sets the status only if it currently equals `expected`.
    ///
    /// Returns `Ok(false)` when the current status differs and
    /// `CoreError::BookingNotFound` when the booking does not exist.
    async fn compare_and_set_status(
        &self,
        booking_id: BookingId,
        expected: BookingStatus,
        status: BookingStatus,
    ) -> CoreResult<bool>;
}
