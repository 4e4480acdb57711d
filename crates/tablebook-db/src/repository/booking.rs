//! # Booking Repository
//!
//! Database operations for bookings.
//!
//! ## One Eating Booking per Table
//! The partial unique index `idx_bookings_active_table` rejects a second
//! `eating` row for the same table. `create` turns that violation into
//! `CoreError::TableAlreadyBooked`, so concurrent bookings for one table
//! admit exactly one without any locking here.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, warn};

use tablebook_core::{
    Booking, BookingId, BookingStatus, BookingStore, CoreError, CoreResult, PartyDetails,
    TableId,
};

use crate::error::{DbError, DbResult};

const BOOKING_COLUMNS: &str = "id, table_id, name, people, phone, notes, status, \
                               created_at, updated_at, completed_at";

/// Repository for booking database operations.
///
/// Bookings are never deleted; completed rows stay as history.
#[derive(Debug, Clone)]
pub struct BookingRepository {
    pool: SqlitePool,
}

impl BookingRepository {
    /// Creates a new BookingRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BookingRepository { pool }
    }

    async fn exists(&self, booking_id: BookingId) -> DbResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM bookings WHERE id = ?1")
            .bind(booking_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }
}

/// `completed_at` follows the status: set on completion, cleared on rollback.
fn completed_at_for(status: BookingStatus) -> Option<chrono::DateTime<Utc>> {
    match status {
        BookingStatus::Completed => Some(Utc::now()),
        BookingStatus::Eating => None,
    }
}

#[async_trait]
impl BookingStore for BookingRepository {
    async fn create(&self, table_id: TableId, party: &PartyDetails) -> CoreResult<Booking> {
        let now = Utc::now();
        let sql = format!(
            r#"
            INSERT INTO bookings
                (table_id, name, people, phone, notes, status, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
            RETURNING {BOOKING_COLUMNS}
            "#
        );

        let inserted = sqlx::query_as::<_, Booking>(&sql)
            .bind(table_id)
            .bind(&party.name)
            .bind(party.people)
            .bind(party.phone.as_deref())
            .bind(party.notes.as_deref())
            .bind(BookingStatus::Eating)
            .bind(now)
            .fetch_one(&self.pool)
            .await;

        match inserted.map_err(DbError::from) {
            Ok(booking) => {
                debug!(booking_id = booking.id, table_id, "Booking row inserted");
                Ok(booking)
            }
            Err(DbError::UniqueViolation { .. }) => {
                warn!(table_id, "Table already has an eating booking");
                Err(CoreError::TableAlreadyBooked(table_id))
            }
            Err(DbError::ForeignKeyViolation { .. }) => Err(CoreError::TableNotFound(table_id)),
            Err(other) => Err(other.into()),
        }
    }

    async fn find_by_id(&self, booking_id: BookingId) -> CoreResult<Option<Booking>> {
        let sql = format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?1");
        let booking = sqlx::query_as::<_, Booking>(&sql)
            .bind(booking_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DbError::from)?;
        Ok(booking)
    }

    async fn find_active_by_table(&self, table_id: TableId) -> CoreResult<Option<Booking>> {
        let sql =
            format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE table_id = ?1 AND status = ?2");
        let booking = sqlx::query_as::<_, Booking>(&sql)
            .bind(table_id)
            .bind(BookingStatus::Eating)
            .fetch_optional(&self.pool)
            .await
            .map_err(DbError::from)?;
        Ok(booking)
    }

    async fn set_status(&self, booking_id: BookingId, status: BookingStatus) -> CoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE bookings
            SET status = ?1, updated_at = ?2, completed_at = ?3
            WHERE id = ?4
            "#,
        )
        .bind(status)
        .bind(Utc::now())
        .bind(completed_at_for(status))
        .bind(booking_id)
        .execute(&self.pool)
        .await
        .map_err(DbError::from)?;

        if result.rows_affected() == 0 {
            return Err(CoreError::BookingNotFound(booking_id));
        }
        debug!(booking_id, status = %status, "Booking status set");
        Ok(())
    }

    async fn compare_and_set_status(
        &self,
        booking_id: BookingId,
        expected: BookingStatus,
        status: BookingStatus,
    ) -> CoreResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE bookings
            SET status = ?1, updated_at = ?2, completed_at = ?3
            WHERE id = ?4 AND status = ?5
            "#,
        )
        .bind(status)
        .bind(Utc::now())
        .bind(completed_at_for(status))
        .bind(booking_id)
        .bind(expected)
        .execute(&self.pool)
        .await
        .map_err(DbError::from)?;

        if result.rows_affected() == 1 {
            debug!(booking_id, from = %expected, to = %status, "Booking status swapped");
            return Ok(true);
        }

        if self.exists(booking_id).await? {
            Ok(false)
        } else {
            Err(CoreError::BookingNotFound(booking_id))
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
