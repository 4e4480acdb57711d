//! # In-Memory Stores
//!
//! Mutex-guarded implementations of [`TableRegistry`] and [`BookingStore`].
//!
//! ## Thread Safety
//! Each store wraps its records in a single `Mutex`:
//! 1. Every trait method locks once, does its work, and unlocks
//! 2. No lock is ever held across an `.await`
//! 3. The two stores never lock each other, so there is no lock ordering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  InMemoryTableRegistry            InMemoryBookingStore                  │
//! │  Mutex<BTreeMap<TableId, Table>>  Mutex<Ledger>                         │
//! │        │                            ├── next_id                         │
//! │        │  BTreeMap iteration        └── BTreeMap<BookingId, Booking>    │
//! │        └─► lowest id first                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A poisoned lock is reported as `CoreError::Storage`.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::store::{BookingStore, TableRegistry};
use crate::types::{Booking, BookingId, BookingStatus, PartyDetails, Table, TableId, TableStatus};

// =============================================================================
// Table Registry
// =============================================================================

/// Table registry backed by an ordered map.
#[derive(Debug, Default)]
pub struct InMemoryTableRegistry {
    tables: Mutex<BTreeMap<TableId, Table>>,
}

impl InMemoryTableRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the given tables.
    pub fn from_tables(tables: impl IntoIterator<Item = Table>) -> Self {
        InMemoryTableRegistry {
            tables: Mutex::new(tables.into_iter().map(|t| (t.id, t)).collect()),
        }
    }

    /// Creates a registry of free tables from `(id, capacity)` pairs.
    pub fn with_layout(layout: &[(TableId, u32)]) -> Self {
        Self::from_tables(layout.iter().map(|&(id, capacity)| Table::new(id, capacity)))
    }

    /// Current status of a table, for assertions and diagnostics.
    pub fn status_of(&self, table_id: TableId) -> Option<TableStatus> {
        self.with_tables(|tables| tables.get(&table_id).map(|t| t.status))
            .ok()
            .flatten()
    }

    fn with_tables<F, R>(&self, f: F) -> CoreResult<R>
    where
        F: FnOnce(&mut BTreeMap<TableId, Table>) -> R,
    {
        let mut tables = self
            .tables
            .lock()
            .map_err(|_| CoreError::Storage("table registry lock poisoned".to_string()))?;
        Ok(f(&mut tables))
    }
}

fn first_free(tables: &BTreeMap<TableId, Table>, party_size: u32) -> Option<TableId> {
    tables
        .values()
        .find(|table| table.is_available_for(party_size))
        .map(|table| table.id)
}

#[async_trait]
impl TableRegistry for InMemoryTableRegistry {
    async fn list_tables(&self) -> CoreResult<Vec<Table>> {
        self.with_tables(|tables| tables.values().cloned().collect())
    }

    async fn get_table(&self, table_id: TableId) -> CoreResult<Option<Table>> {
        self.with_tables(|tables| tables.get(&table_id).cloned())
    }

    async fn find_free_table(&self, party_size: u32) -> CoreResult<Option<Table>> {
        self.with_tables(|tables| {
            first_free(tables, party_size).and_then(|id| tables.get(&id).cloned())
        })
    }

    async fn claim_free_table(&self, party_size: u32) -> CoreResult<Option<Table>> {
        self.with_tables(|tables| {
            let id = first_free(tables, party_size)?;
            let table = tables.get_mut(&id)?;
            table.status = TableStatus::Occupied;
            debug!(table_id = id, party_size, "Claimed free table");
            Some(table.clone())
        })
    }

    async fn set_status(&self, table_id: TableId, status: TableStatus) -> CoreResult<()> {
        self.with_tables(|tables| match tables.get_mut(&table_id) {
            Some(table) => {
                table.status = status;
                Ok(())
            }
            None => Err(CoreError::TableNotFound(table_id)),
        })?
    }

    async fn compare_and_set_status(
        &self,
        table_id: TableId,
        expected: TableStatus,
        status: TableStatus,
    ) -> CoreResult<bool> {
        self.with_tables(|tables| match tables.get_mut(&table_id) {
            Some(table) if table.status == expected => {
                table.status = status;
                Ok(true)
            }
            Some(_) => Ok(false),
            None => Err(CoreError::TableNotFound(table_id)),
        })?
    }

    async fn seed(&self, layout: &[Table]) -> CoreResult<usize> {
        self.with_tables(|tables| {
            let mut inserted = 0;
            for table in layout {
                if !tables.contains_key(&table.id) {
                    tables.insert(table.id, table.clone());
                    inserted += 1;
                }
            }
            inserted
        })
    }
}

// =============================================================================
// Booking Store
// =============================================================================

#[derive(Debug)]
struct Ledger {
    next_id: BookingId,
    bookings: BTreeMap<BookingId, Booking>,
}

impl Ledger {
    /// Moving a booking back to `Eating` must not give its table a second
    /// active booking.
    fn check_reopen(&self, booking_id: BookingId, status: BookingStatus) -> CoreResult<()> {
        if !status.is_active() {
            return Ok(());
        }
        let Some(table_id) = self.bookings.get(&booking_id).map(|b| b.table_id) else {
            return Ok(());
        };
        let taken = self
            .bookings
            .values()
            .any(|b| b.id != booking_id && b.table_id == table_id && b.is_active());
        if taken {
            return Err(CoreError::TableAlreadyBooked(table_id));
        }
        Ok(())
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Ledger {
            next_id: 1,
            bookings: BTreeMap::new(),
        }
    }
}

/// Booking store with sequential identifiers starting at 1.
#[derive(Debug, Default)]
pub struct InMemoryBookingStore {
    ledger: Mutex<Ledger>,
}

impl InMemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every booking ever created, oldest first.
    pub fn all(&self) -> CoreResult<Vec<Booking>> {
        self.with_ledger(|ledger| ledger.bookings.values().cloned().collect())
    }

    fn with_ledger<F, R>(&self, f: F) -> CoreResult<R>
    where
        F: FnOnce(&mut Ledger) -> R,
    {
        let mut ledger = self
            .ledger
            .lock()
            .map_err(|_| CoreError::Storage("booking store lock poisoned".to_string()))?;
        Ok(f(&mut ledger))
    }
}

#[async_trait]
impl BookingStore for InMemoryBookingStore {
    async fn create(&self, table_id: TableId, party: &PartyDetails) -> CoreResult<Booking> {
        self.with_ledger(|ledger| {
            let taken = ledger
                .bookings
                .values()
                .any(|b| b.table_id == table_id && b.is_active());
            if taken {
                return Err(CoreError::TableAlreadyBooked(table_id));
            }

            let id = ledger.next_id;
            ledger.next_id += 1;

            let booking = Booking::new(id, table_id, party.clone(), Utc::now());
            ledger.bookings.insert(id, booking.clone());
            debug!(booking_id = id, table_id, "Stored booking");
            Ok(booking)
        })?
    }

    async fn find_by_id(&self, booking_id: BookingId) -> CoreResult<Option<Booking>> {
        self.with_ledger(|ledger| ledger.bookings.get(&booking_id).cloned())
    }

    async fn find_active_by_table(&self, table_id: TableId) -> CoreResult<Option<Booking>> {
        self.with_ledger(|ledger| {
            ledger
                .bookings
                .values()
                .find(|b| b.table_id == table_id && b.is_active())
                .cloned()
        })
    }

    async fn set_status(&self, booking_id: BookingId, status: BookingStatus) -> CoreResult<()> {
        self.with_ledger(|ledger| {
            ledger.check_reopen(booking_id, status)?;
            match ledger.bookings.get_mut(&booking_id) {
                Some(booking) => {
                    booking.apply_status(status, Utc::now());
                    Ok(())
                }
                None => Err(CoreError::BookingNotFound(booking_id)),
            }
        })?
    }

    async fn compare_and_set_status(
        &self,
        booking_id: BookingId,
        expected: BookingStatus,
        status: BookingStatus,
    ) -> CoreResult<bool> {
        self.with_ledger(|ledger| {
            let current = match ledger.bookings.get(&booking_id) {
                Some(booking) => booking.status,
                None => return Err(CoreError::BookingNotFound(booking_id)),
            };
            if current != expected {
                return Ok(false);
            }
            ledger.check_reopen(booking_id, status)?;
            if let Some(booking) = ledger.bookings.get_mut(&booking_id) {
                booking.apply_status(status, Utc::now());
            }
            Ok(true)
        })?
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_find_free_table_prefers_lowest_id() {
        let registry = InMemoryTableRegistry::with_layout(&[(2, 4), (1, 2), (3, 6)]);

        let table = registry.find_free_table(2).await.unwrap().unwrap();
        assert_eq!(table.id, 1);

        let table = registry.find_free_table(3).await.unwrap().unwrap();
        assert_eq!(table.id, 2);

        assert!(registry.find_free_table(7).await.unwrap().is_none());
        // find does not reserve
        assert_eq!(registry.status_of(1), Some(TableStatus::Free));
    }

    #[tokio::test]
    async fn test_claim_marks_occupied() {
        let registry = InMemoryTableRegistry::with_layout(&[(1, 2)]);

        let table = registry.claim_free_table(2).await.unwrap().unwrap();
        assert_eq!(table.status, TableStatus::Occupied);
        assert_eq!(registry.status_of(1), Some(TableStatus::Occupied));
        assert!(registry.claim_free_table(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_status_unknown_table() {
        let registry = InMemoryTableRegistry::with_layout(&[(1, 2)]);

        let err = registry.set_status(9, TableStatus::Free).await.unwrap_err();
        assert_eq!(err, CoreError::TableNotFound(9));
    }

    #[tokio::test]
    async fn test_table_compare_and_set() {
        let registry = InMemoryTableRegistry::with_layout(&[(1, 2)]);

        let swapped = registry
            .compare_and_set_status(1, TableStatus::Occupied, TableStatus::Free)
            .await
            .unwrap();
        assert!(!swapped);

        let swapped = registry
            .compare_and_set_status(1, TableStatus::Free, TableStatus::Occupied)
            .await
            .unwrap();
        assert!(swapped);
        assert_eq!(registry.status_of(1), Some(TableStatus::Occupied));
    }

    #[tokio::test]
    async fn test_seed_keeps_existing_tables() {
        let registry = InMemoryTableRegistry::with_layout(&[(1, 2)]);
        registry.set_status(1, TableStatus::Occupied).await.unwrap();

        let inserted = registry
            .seed(&[Table::new(1, 8), Table::new(2, 4)])
            .await
            .unwrap();
        assert_eq!(inserted, 1);

        let tables = registry.list_tables().await.unwrap();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].capacity, 2);
        assert_eq!(tables[0].status, TableStatus::Occupied);
    }

    #[tokio::test]
    async fn test_booking_ids_are_sequential() {
        let store = InMemoryBookingStore::new();

        let first = store.create(1, &PartyDetails::new("A", 2)).await.unwrap();
        let second = store.create(2, &PartyDetails::new("B", 2)).await.unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(first.status, BookingStatus::Eating);
    }

    #[tokio::test]
    async fn test_one_active_booking_per_table() {
        let store = InMemoryBookingStore::new();

        let booking = store.create(1, &PartyDetails::new("A", 2)).await.unwrap();
        let err = store
            .create(1, &PartyDetails::new("B", 2))
            .await
            .unwrap_err();
        assert_eq!(err, CoreError::TableAlreadyBooked(1));

        store
            .set_status(booking.id, BookingStatus::Completed)
            .await
            .unwrap();
        assert!(store.create(1, &PartyDetails::new("B", 2)).await.is_ok());
        assert_eq!(store.all().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_booking_status_updates() {
        let store = InMemoryBookingStore::new();
        let booking = store.create(4, &PartyDetails::new("A", 2)).await.unwrap();

        assert!(store
            .compare_and_set_status(booking.id, BookingStatus::Eating, BookingStatus::Completed)
            .await
            .unwrap());
        assert!(!store
            .compare_and_set_status(booking.id, BookingStatus::Eating, BookingStatus::Completed)
            .await
            .unwrap());

        let stored = store.find_by_id(booking.id).await.unwrap().unwrap();
        assert!(stored.completed_at.is_some());
        assert!(store.find_active_by_table(4).await.unwrap().is_none());

        let err = store
            .set_status(99, BookingStatus::Eating)
            .await
            .unwrap_err();
        assert_eq!(err, CoreError::BookingNotFound(99));
    }

    #[tokio::test]
    async fn test_reopen_blocked_by_newer_booking() {
        let store = InMemoryBookingStore::new();
        let old = store.create(1, &PartyDetails::new("A", 2)).await.unwrap();
        store
            .set_status(old.id, BookingStatus::Completed)
            .await
            .unwrap();
        store.create(1, &PartyDetails::new("B", 2)).await.unwrap();

        let err = store
            .set_status(old.id, BookingStatus::Eating)
            .await
            .unwrap_err();
        assert_eq!(err, CoreError::TableAlreadyBooked(1));
        let stored = store.find_by_id(old.id).await.unwrap().unwrap();
        assert_eq!(stored.status, BookingStatus::Completed);
    }
}
