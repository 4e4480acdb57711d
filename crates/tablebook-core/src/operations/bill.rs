use tracing::{debug, error, info, warn};

use crate::error::{CoreError, CoreResult};
use crate::store::{BookingStore, TableRegistry};
use crate::types::{Booking, BookingId, BookingStatus, TableId, TableStatus};

/// Marks a booking paid and frees its table.
///
/// ## Steps
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. booking Eating → Completed       fails: BookingNotFound            │
/// │       │                                     BookingNotActive           │
/// │       ▼                                     (nothing changed)          │
/// │  2. read booking back                fails: InternalConsistency        │
/// │       │                                     └─► compensate             │
/// │       ▼                                                                 │
/// │  3. table → Free                     fails: TableNotFound              │
/// │       │                                     └─► compensate             │
/// │       ▼                                                                 │
/// │  4. new Eating booking on the table? table Free → Occupied again       │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  Ok(booking)                                                           │
/// │                                                                         │
/// │  compensate = booking Completed → Eating                               │
/// │  if compensation fails too: InternalConsistency, logged at error       │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
///
/// The two records are updated one after the other, not in one transaction,
/// so a reader can briefly see a completed booking on a still-occupied
/// table. Once step 1 is done the store accepts a new booking for the same
/// table; step 4 keeps such a booking from ending up on a `Free` table.
pub async fn bill<R, B>(tables: &R, bookings: &B, booking_id: BookingId) -> CoreResult<Booking>
where
    R: TableRegistry + ?Sized,
    B: BookingStore + ?Sized,
{
    let completed = bookings
        .compare_and_set_status(booking_id, BookingStatus::Eating, BookingStatus::Completed)
        .await?;
    if !completed {
        warn!(booking_id, "Bill rejected, booking already completed");
        return Err(CoreError::BookingNotActive(booking_id));
    }

    let booking = match bookings.find_by_id(booking_id).await {
        Ok(Some(booking)) => booking,
        Ok(None) => {
            let err = CoreError::inconsistency(format!(
                "booking {booking_id} disappeared after completion"
            ));
            return Err(compensate(bookings, booking_id, err).await);
        }
        Err(err) => return Err(compensate(bookings, booking_id, err).await),
    };

    if let Err(err) = tables.set_status(booking.table_id, TableStatus::Free).await {
        warn!(booking_id, table_id = booking.table_id, error = %err, "Freeing table failed, rolling back bill");
        return Err(compensate(bookings, booking_id, err).await);
    }

    info!(booking_id, table_id = booking.table_id, "Bill paid, table freed");
    rehold_if_rebooked(tables, bookings, booking.table_id).await;
    Ok(booking)
}

/// Marks the table `Occupied` again if a booking for it was created while
/// the bill was in flight.
///
/// The bill itself has already succeeded, so failures here are only logged.
async fn rehold_if_rebooked<R, B>(tables: &R, bookings: &B, table_id: TableId)
where
    R: TableRegistry + ?Sized,
    B: BookingStore + ?Sized,
{
    let next = match bookings.find_active_by_table(table_id).await {
        Ok(Some(next)) => next,
        Ok(None) => return,
        Err(err) => {
            error!(table_id, error = %err, "Re-checking table after bill failed");
            return;
        }
    };

    warn!(table_id, booking_id = next.id, "Table booked during bill, holding it again");
    match tables
        .compare_and_set_status(table_id, TableStatus::Free, TableStatus::Occupied)
        .await
    {
        Ok(true) => info!(table_id, booking_id = next.id, "Table held for new booking"),
        Ok(false) => debug!(table_id, "Table already taken again"),
        Err(err) => error!(
            table_id,
            booking_id = next.id,
            error = %err,
            "Holding table for new booking failed"
        ),
    }
}

/// Puts the booking back to `Eating` after a failed step and returns the
/// error to report.
async fn compensate<B>(bookings: &B, booking_id: BookingId, cause: CoreError) -> CoreError
where
    B: BookingStore + ?Sized,
{
    match bookings.set_status(booking_id, BookingStatus::Eating).await {
        Ok(()) => {
            info!(booking_id, "Bill rolled back, booking is eating again");
            cause
        }
        Err(rollback) => {
            error!(
                booking_id,
                cause = %cause,
                rollback = %rollback,
                "Bill rollback failed, booking left completed"
            );
            CoreError::inconsistency(format!(
                "booking {booking_id} left completed after failed bill: {cause}; rollback failed: {rollback}"
            ))
        }
    }
}
