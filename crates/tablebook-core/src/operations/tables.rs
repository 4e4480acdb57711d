use tracing::{info, warn};

use crate::error::{CoreError, CoreResult};
use crate::store::{BookingStore, TableRegistry};
use crate::types::{Table, TableId, TableStatus};

/// All tables, ordered by identifier.
pub async fn list_tables<R>(tables: &R) -> CoreResult<Vec<Table>>
where
    R: TableRegistry + ?Sized,
{
    tables.list_tables().await
}

/// Moves a table to `status` under the transition rules.
///
/// ## Rules
/// - Same status: no-op, returns the table
/// - `Free → WaitingForBill`: rejected
/// - `→ Free` with an active booking: rejected, the booking must be billed
/// - `→ WaitingForBill` without an active booking: rejected
///
/// `Occupied → Free` without a booking releases a table held by a locate
/// whose party never booked.
///
/// The write is a compare-and-set against the status read at the start; if
/// another request changed the table in between, `TableStatusChanged` is
/// returned and nothing is written.
///
/// After freeing a table the bookings are checked again. A booking created
/// between the first check and the write puts the table back to its old
/// status and the update fails with `TableAlreadyBooked`.
pub async fn update_table_status<R, B>(
    tables: &R,
    bookings: &B,
    table_id: TableId,
    status: TableStatus,
) -> CoreResult<Table>
where
    R: TableRegistry + ?Sized,
    B: BookingStore + ?Sized,
{
    let mut table = tables
        .get_table(table_id)
        .await?
        .ok_or(CoreError::TableNotFound(table_id))?;

    let current = table.status;
    if current == status {
        return Ok(table);
    }

    if !current.can_transition_to(status) {
        warn!(table_id, from = %current, to = %status, "Table transition rejected");
        return Err(CoreError::InvalidTableTransition {
            table_id,
            from: current,
            to: status,
        });
    }

    let active = bookings.find_active_by_table(table_id).await?;
    match (status, active) {
        (TableStatus::Free, Some(booking)) => {
            warn!(table_id, booking_id = booking.id, "Cannot free a table with an active booking");
            return Err(CoreError::TableAlreadyBooked(table_id));
        }
        (TableStatus::WaitingForBill, None) => {
            return Err(CoreError::NoActiveBooking(table_id));
        }
        _ => {}
    }

    if !tables.compare_and_set_status(table_id, current, status).await? {
        warn!(table_id, "Table changed while updating status");
        return Err(CoreError::TableStatusChanged(table_id));
    }

    if status == TableStatus::Free {
        if let Some(booking) = bookings.find_active_by_table(table_id).await? {
            warn!(table_id, booking_id = booking.id, "Table booked while freeing it, restoring status");
            tables
                .compare_and_set_status(table_id, TableStatus::Free, current)
                .await?;
            return Err(CoreError::TableAlreadyBooked(table_id));
        }
    }

    info!(table_id, from = %current, to = %status, "Table status updated");
    table.status = status;
    Ok(table)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::memory::{InMemoryBookingStore, InMemoryTableRegistry};
    use crate::operations::{bill, book, locate};
    use crate::types::{Booking, BookingId, BookingStatus, NewBooking, PartyDetails};

    /// Booking store where a party books the table right after the first
    /// active-booking lookup comes back empty.
    struct LateBookingStore {
        inner: InMemoryBookingStore,
        booked: AtomicBool,
    }

    #[async_trait]
    impl BookingStore for LateBookingStore {
        async fn create(&self, table_id: TableId, party: &PartyDetails) -> CoreResult<Booking> {
            self.inner.create(table_id, party).await
        }

        async fn find_by_id(&self, booking_id: BookingId) -> CoreResult<Option<Booking>> {
            self.inner.find_by_id(booking_id).await
        }

        async fn find_active_by_table(&self, table_id: TableId) -> CoreResult<Option<Booking>> {
            let active = self.inner.find_active_by_table(table_id).await?;
            if !self.booked.swap(true, Ordering::SeqCst) {
                self.inner
                    .create(table_id, &PartyDetails::new("Grace", 2))
                    .await?;
            }
            Ok(active)
        }

        async fn set_status(&self, booking_id: BookingId, status: BookingStatus) -> CoreResult<()> {
            self.inner.set_status(booking_id, status).await
        }

        async fn compare_and_set_status(
            &self,
            booking_id: BookingId,
            expected: BookingStatus,
            status: BookingStatus,
        ) -> CoreResult<bool> {
            self.inner
                .compare_and_set_status(booking_id, expected, status)
                .await
        }
    }

    async fn seated() -> (InMemoryTableRegistry, InMemoryBookingStore, i64) {
        let tables = InMemoryTableRegistry::with_layout(&[(1, 4)]);
        let bookings = InMemoryBookingStore::new();
        locate(&tables, 2).await.unwrap();
        let booking = book(
            &tables,
            &bookings,
            NewBooking::new(1, PartyDetails::new("Ada", 2)),
        )
        .await
        .unwrap();
        (tables, bookings, booking.id)
    }

    #[tokio::test]
    async fn test_list_tables_ordered() {
        let tables = InMemoryTableRegistry::with_layout(&[(3, 2), (1, 4), (2, 6)]);
        let ids: Vec<_> = list_tables(&tables)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_request_bill_then_pay() {
        let (tables, bookings, booking_id) = seated().await;

        let table = update_table_status(&tables, &bookings, 1, TableStatus::WaitingForBill)
            .await
            .unwrap();
        assert_eq!(table.status, TableStatus::WaitingForBill);

        bill(&tables, &bookings, booking_id).await.unwrap();
        assert_eq!(tables.status_of(1), Some(TableStatus::Free));
    }

    #[tokio::test]
    async fn test_cannot_free_table_with_active_booking() {
        let (tables, bookings, _) = seated().await;

        let err = update_table_status(&tables, &bookings, 1, TableStatus::Free)
            .await
            .unwrap_err();
        assert_eq!(err, CoreError::TableAlreadyBooked(1));
        assert_eq!(tables.status_of(1), Some(TableStatus::Occupied));
    }

    #[tokio::test]
    async fn test_release_held_table() {
        let tables = InMemoryTableRegistry::with_layout(&[(1, 4)]);
        let bookings = InMemoryBookingStore::new();
        locate(&tables, 2).await.unwrap();

        update_table_status(&tables, &bookings, 1, TableStatus::Free)
            .await
            .unwrap();
        assert_eq!(tables.status_of(1), Some(TableStatus::Free));
    }

    #[tokio::test]
    async fn test_release_undone_when_table_booked() {
        let tables = InMemoryTableRegistry::with_layout(&[(1, 4)]);
        let bookings = LateBookingStore {
            inner: InMemoryBookingStore::new(),
            booked: AtomicBool::new(false),
        };
        locate(&tables, 2).await.unwrap();

        let err = update_table_status(&tables, &bookings, 1, TableStatus::Free)
            .await
            .unwrap_err();
        assert_eq!(err, CoreError::TableAlreadyBooked(1));
        assert_eq!(tables.status_of(1), Some(TableStatus::Occupied));
        assert!(bookings.inner.find_active_by_table(1).await.unwrap().is_some());
        assert!(locate(&tables, 2).await.is_err());
    }

    #[tokio::test]
    async fn test_rejected_transitions() {
        let tables = InMemoryTableRegistry::with_layout(&[(1, 4)]);
        let bookings = InMemoryBookingStore::new();

        let err = update_table_status(&tables, &bookings, 1, TableStatus::WaitingForBill)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidTableTransition { .. }));

        tables.set_status(1, TableStatus::Occupied).await.unwrap();
        let err = update_table_status(&tables, &bookings, 1, TableStatus::WaitingForBill)
            .await
            .unwrap_err();
        assert_eq!(err, CoreError::NoActiveBooking(1));

        let err = update_table_status(&tables, &bookings, 9, TableStatus::Free)
            .await
            .unwrap_err();
        assert_eq!(err, CoreError::TableNotFound(9));
    }

    #[tokio::test]
    async fn test_same_status_is_noop() {
        let tables = InMemoryTableRegistry::with_layout(&[(1, 4)]);
        let bookings = InMemoryBookingStore::new();

        let table = update_table_status(&tables, &bookings, 1, TableStatus::Free)
            .await
            .unwrap();
        assert_eq!(table.status, TableStatus::Free);
    }
}
