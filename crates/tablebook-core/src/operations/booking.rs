use tracing::{error, info, warn};

use crate::error::{CoreError, CoreResult};
use crate::store::{BookingStore, TableRegistry};
use crate::types::{Booking, BookingId, BookingStatus, NewBooking, TableStatus};

/// Creates an `Eating` booking for a table reserved by a previous locate.
///
/// ## Preconditions
/// ```text
/// table exists ──► table is Occupied ──► party fits ──► no active booking
///      │                  │                  │                 │
///  TableNotFound   TableNotReserved    PartyTooLarge   TableAlreadyBooked
/// ```
///
/// A `Free` table is rejected: booking always follows a locate, which is
/// what marks the table `Occupied`. The final check is enforced by the
/// booking store itself, so two concurrent bookings for one table cannot
/// both succeed.
///
/// The table is read again once the booking exists. If a concurrent release
/// or bill freed it in between, the booking is withdrawn (marked
/// `Completed`) and `TableNotReserved` is returned, so an `Eating` booking
/// never outlives its table's hold.
pub async fn book<R, B>(tables: &R, bookings: &B, request: NewBooking) -> CoreResult<Booking>
where
    R: TableRegistry + ?Sized,
    B: BookingStore + ?Sized,
{
    let NewBooking { table_id, party } = request;

    let table = tables
        .get_table(table_id)
        .await?
        .ok_or(CoreError::TableNotFound(table_id))?;

    if table.status != TableStatus::Occupied {
        warn!(table_id, status = %table.status, "Booking rejected, table not reserved");
        return Err(CoreError::TableNotReserved {
            table_id,
            status: table.status,
        });
    }

    if !table.can_seat(party.people) {
        warn!(table_id, capacity = table.capacity, people = party.people, "Booking rejected, party too large");
        return Err(CoreError::PartyTooLarge {
            table_id,
            capacity: table.capacity,
            people: party.people,
        });
    }

    let booking = bookings.create(table_id, &party).await?;

    let status = match tables.get_table(table_id).await {
        Ok(Some(table)) => table.status,
        Ok(None) => {
            let cause = CoreError::TableNotFound(table_id);
            return Err(withdraw(bookings, booking.id, cause).await);
        }
        Err(err) => return Err(withdraw(bookings, booking.id, err).await),
    };
    if status == TableStatus::Free {
        warn!(booking_id = booking.id, table_id, "Table freed while booking, withdrawing booking");
        let cause = CoreError::TableNotReserved { table_id, status };
        return Err(withdraw(bookings, booking.id, cause).await);
    }

    info!(booking_id = booking.id, table_id, people = booking.people, "Booking created");
    Ok(booking)
}

/// Completes a booking that lost its table and returns the error to report.
async fn withdraw<B>(bookings: &B, booking_id: BookingId, cause: CoreError) -> CoreError
where
    B: BookingStore + ?Sized,
{
    match bookings
        .compare_and_set_status(booking_id, BookingStatus::Eating, BookingStatus::Completed)
        .await
    {
        Ok(_) => {
            info!(booking_id, "Booking withdrawn");
            cause
        }
        Err(rollback) => {
            error!(
                booking_id,
                cause = %cause,
                rollback = %rollback,
                "Withdrawing booking failed, booking left eating"
            );
            CoreError::inconsistency(format!(
                "booking {booking_id} left eating after failed booking: {cause}; withdraw failed: {rollback}"
            ))
        }
    }
}

/// Looks up a booking by identifier.
pub async fn get_booking<B>(bookings: &B, booking_id: BookingId) -> CoreResult<Booking>
where
    B: BookingStore + ?Sized,
{
    bookings
        .find_by_id(booking_id)
        .await?
        .ok_or(CoreError::BookingNotFound(booking_id))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::memory::{InMemoryBookingStore, InMemoryTableRegistry};
    use crate::operations::locate;
    use crate::types::{PartyDetails, Table, TableId};

    /// Registry that frees a held table right after the first read of it,
    /// the way a concurrent release would.
    struct ReleasingRegistry {
        inner: InMemoryTableRegistry,
        released: AtomicBool,
    }

    impl ReleasingRegistry {
        fn new(layout: &[(TableId, u32)]) -> Self {
            ReleasingRegistry {
                inner: InMemoryTableRegistry::with_layout(layout),
                released: AtomicBool::new(false),
            }
        }
    }

    #[async_trait]
    impl TableRegistry for ReleasingRegistry {
        async fn list_tables(&self) -> CoreResult<Vec<Table>> {
            self.inner.list_tables().await
        }

        async fn get_table(&self, table_id: TableId) -> CoreResult<Option<Table>> {
            let table = self.inner.get_table(table_id).await?;
            if !self.released.swap(true, Ordering::SeqCst) {
                self.inner
                    .compare_and_set_status(table_id, TableStatus::Occupied, TableStatus::Free)
                    .await?;
            }
            Ok(table)
        }

        async fn find_free_table(&self, party_size: u32) -> CoreResult<Option<Table>> {
            self.inner.find_free_table(party_size).await
        }

        async fn claim_free_table(&self, party_size: u32) -> CoreResult<Option<Table>> {
            self.inner.claim_free_table(party_size).await
        }

        async fn set_status(&self, table_id: TableId, status: TableStatus) -> CoreResult<()> {
            self.inner.set_status(table_id, status).await
        }

        async fn compare_and_set_status(
            &self,
            table_id: TableId,
            expected: TableStatus,
            status: TableStatus,
        ) -> CoreResult<bool> {
            self.inner
                .compare_and_set_status(table_id, expected, status)
                .await
        }

        async fn seed(&self, tables: &[Table]) -> CoreResult<usize> {
            self.inner.seed(tables).await
        }
    }

    fn request(table_id: i64, people: u32) -> NewBooking {
        NewBooking::new(table_id, PartyDetails::new("Ada", people))
    }

    #[tokio::test]
    async fn test_book_after_locate() {
        let tables = InMemoryTableRegistry::with_layout(&[(1, 2), (2, 4)]);
        let bookings = InMemoryBookingStore::new();

        let table = locate(&tables, 2).await.unwrap();
        let booking = book(&tables, &bookings, request(table.id, 2)).await.unwrap();

        assert_eq!(booking.table_id, 1);
        assert_eq!(booking.status, BookingStatus::Eating);
        assert_eq!(tables.status_of(1), Some(TableStatus::Occupied));

        let active = bookings.find_active_by_table(1).await.unwrap().unwrap();
        assert_eq!(active.id, booking.id);
    }

    #[tokio::test]
    async fn test_book_unknown_table() {
        let tables = InMemoryTableRegistry::with_layout(&[(1, 2)]);
        let bookings = InMemoryBookingStore::new();

        let err = book(&tables, &bookings, request(42, 2)).await.unwrap_err();
        assert_eq!(err, CoreError::TableNotFound(42));
    }

    #[tokio::test]
    async fn test_book_requires_locate() {
        let tables = InMemoryTableRegistry::with_layout(&[(1, 2)]);
        let bookings = InMemoryBookingStore::new();

        let err = book(&tables, &bookings, request(1, 2)).await.unwrap_err();
        assert_eq!(
            err,
            CoreError::TableNotReserved {
                table_id: 1,
                status: TableStatus::Free
            }
        );
        assert!(bookings.all().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_book_party_too_large() {
        let tables = InMemoryTableRegistry::with_layout(&[(1, 2)]);
        let bookings = InMemoryBookingStore::new();
        locate(&tables, 1).await.unwrap();

        let err = book(&tables, &bookings, request(1, 3)).await.unwrap_err();
        assert!(matches!(err, CoreError::PartyTooLarge { capacity: 2, people: 3, .. }));
    }

    #[tokio::test]
    async fn test_book_twice_rejected() {
        let tables = InMemoryTableRegistry::with_layout(&[(1, 4)]);
        let bookings = InMemoryBookingStore::new();
        locate(&tables, 2).await.unwrap();

        book(&tables, &bookings, request(1, 2)).await.unwrap();
        let err = book(&tables, &bookings, request(1, 2)).await.unwrap_err();
        assert_eq!(err, CoreError::TableAlreadyBooked(1));
    }

    #[tokio::test]
    async fn test_book_withdrawn_when_table_released() {
        let tables = ReleasingRegistry::new(&[(1, 2)]);
        let bookings = InMemoryBookingStore::new();
        locate(&tables.inner, 2).await.unwrap();

        let err = book(&tables, &bookings, request(1, 2)).await.unwrap_err();
        assert_eq!(
            err,
            CoreError::TableNotReserved {
                table_id: 1,
                status: TableStatus::Free
            }
        );
        assert_eq!(tables.inner.status_of(1), Some(TableStatus::Free));
        assert!(bookings.find_active_by_table(1).await.unwrap().is_none());

        let withdrawn = bookings.all().unwrap();
        assert_eq!(withdrawn.len(), 1);
        assert_eq!(withdrawn[0].status, BookingStatus::Completed);

        // The next party gets the table with nobody eating there
        let table = locate(&tables.inner, 2).await.unwrap();
        assert_eq!(table.id, 1);
        book(&tables.inner, &bookings, request(1, 2)).await.unwrap();
    }

    #[tokio::test]
    async fn test_get_booking() {
        let bookings = InMemoryBookingStore::new();
        let created = bookings.create(1, &PartyDetails::new("Ada", 2)).await.unwrap();

        assert_eq!(get_booking(&bookings, created.id).await.unwrap(), created);
        assert_eq!(
            get_booking(&bookings, 77).await.unwrap_err(),
            CoreError::BookingNotFound(77)
        );
    }
}
