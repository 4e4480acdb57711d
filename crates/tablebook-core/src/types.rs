//! # Domain Types
//!
//! Core domain types used throughout Tablebook.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Table       │   │    Booking      │   │  PartyDetails   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │◄──│  table_id (FK)  │   │  name           │       │
//! │  │  capacity       │   │  id             │   │  people         │       │
//! │  │  status         │   │  status         │   │  phone?         │       │
//! │  └─────────────────┘   │  party fields   │   │  notes?         │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │  TableStatus    │   │ BookingStatus   │                             │
//! │  │  ─────────────  │   │  ─────────────  │                             │
//! │  │  Free           │   │  Eating         │                             │
//! │  │  Occupied       │   │  Completed      │                             │
//! │  │  WaitingForBill │   └─────────────────┘                             │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ownership
//! The table registry owns `Table` records and the booking store owns
//! `Booking` records. A booking only carries the table's identifier.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Table identifier.
pub type TableId = i64;

/// Booking identifier, assigned by the booking store on creation.
pub type BookingId = i64;

// =============================================================================
// Table Status
// =============================================================================

/// Occupancy state of a table.
///
/// ## Transitions
/// ```text
///              locate / update
///   ┌──────┐ ─────────────────► ┌──────────┐  bill requested  ┌──────────────────┐
///   │ Free │                    │ Occupied │ ───────────────► │ WaitingForBill   │
///   └──────┘ ◄───────────────── └──────────┘ ◄─────────────── └──────────────────┘
///      ▲        bill / release                 request withdrawn        │
///      └────────────────────────────────────────────────────────────────┘
///                                   bill
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum TableStatus {
    /// Nobody is seated and nobody holds the table.
    Free,
    /// Held by a locate, or seated with an active booking.
    Occupied,
    /// The party asked for the bill.
    WaitingForBill,
}

impl TableStatus {
    /// Every status, in declaration order.
    pub const ALL: [TableStatus; 3] = [
        TableStatus::Free,
        TableStatus::Occupied,
        TableStatus::WaitingForBill,
    ];

    /// Wire/database name of the status.
    pub const fn as_str(&self) -> &'static str {
        match self {
            TableStatus::Free => "free",
            TableStatus::Occupied => "occupied",
            TableStatus::WaitingForBill => "waiting_for_bill",
        }
    }

    /// Whether the table is held or seated.
    #[inline]
    pub const fn is_in_use(&self) -> bool {
        matches!(self, TableStatus::Occupied | TableStatus::WaitingForBill)
    }

    /// Whether a manual status update from `self` to `next` is allowed.
    ///
    /// Staying in the same status is always allowed. The only forbidden
    /// move is `Free → WaitingForBill`: nobody is there to pay.
    pub const fn can_transition_to(&self, next: TableStatus) -> bool {
        !matches!(
            (*self, next),
            (TableStatus::Free, TableStatus::WaitingForBill)
        )
    }
}

impl Default for TableStatus {
    fn default() -> Self {
        TableStatus::Free
    }
}

impl fmt::Display for TableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TableStatus {
    type Err = ValidationError;

    /// Accepts `free`, `occupied`, `waiting_for_bill`, case-insensitively,
    /// with `-` allowed in place of `_` (`WAITING-FOR-BILL`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        TableStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "status".to_string(),
                allowed: TableStatus::ALL
                    .iter()
                    .map(|status| status.as_str().to_string())
                    .collect(),
            })
    }
}

// =============================================================================
// Table
// =============================================================================

/// A table in the restaurant.
///
/// Tables are created once from the configured layout and never destroyed;
/// only `status` changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Table {
    /// Unique identifier.
    pub id: TableId,

    /// Number of guests the table seats.
    pub capacity: u32,

    /// Current occupancy state.
    pub status: TableStatus,
}

impl Table {
    /// Creates a free table.
    pub fn new(id: TableId, capacity: u32) -> Self {
        Table {
            id,
            capacity,
            status: TableStatus::Free,
        }
    }

    /// Whether a party of `people` fits at this table.
    #[inline]
    pub fn can_seat(&self, people: u32) -> bool {
        self.capacity >= people
    }

    /// Whether the table is free and fits the party.
    #[inline]
    pub fn is_available_for(&self, people: u32) -> bool {
        self.status == TableStatus::Free && self.can_seat(people)
    }
}

// =============================================================================
// Booking Status
// =============================================================================

/// Lifecycle of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// The party is seated.
    Eating,
    /// The bill has been paid.
    Completed,
}

impl BookingStatus {
    /// Wire/database name of the status.
    pub const fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Eating => "eating",
            BookingStatus::Completed => "completed",
        }
    }

    /// Active bookings hold their table.
    #[inline]
    pub const fn is_active(&self) -> bool {
        matches!(self, BookingStatus::Eating)
    }
}

impl Default for BookingStatus {
    fn default() -> Self {
        BookingStatus::Eating
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Party Details
// =============================================================================

/// Who the booking is for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyDetails {
    /// Name the booking is held under.
    pub name: String,

    /// Number of guests.
    pub people: u32,

    /// Contact number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Free-form notes (allergies, high chair, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl PartyDetails {
    /// Creates party details with no phone or notes.
    pub fn new(name: impl Into<String>, people: u32) -> Self {
        PartyDetails {
            name: name.into(),
            people,
            phone: None,
            notes: None,
        }
    }

    /// Sets the contact number.
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Sets the notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Decoded input of the booking operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBooking {
    /// The table reserved by a previous locate.
    pub table_id: TableId,

    /// Who is sitting there.
    pub party: PartyDetails,
}

impl NewBooking {
    pub fn new(table_id: TableId, party: PartyDetails) -> Self {
        NewBooking { table_id, party }
    }
}

// =============================================================================
// Booking
// =============================================================================

/// A booking, retained forever as a historical record.
///
/// Party fields are stored flat so the record maps one-to-one onto a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Booking {
    pub id: BookingId,
    /// The table this booking references for its whole lifetime.
    pub table_id: TableId,
    pub name: String,
    pub people: u32,
    pub phone: Option<String>,
    pub notes: Option<String>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Set when the bill is paid, cleared again if billing is rolled back.
    pub completed_at: Option<DateTime<Utc>>,
}

impl Booking {
    /// Builds a fresh `Eating` booking.
    pub fn new(id: BookingId, table_id: TableId, party: PartyDetails, now: DateTime<Utc>) -> Self {
        Booking {
            id,
            table_id,
            name: party.name,
            people: party.people,
            phone: party.phone,
            notes: party.notes,
            status: BookingStatus::Eating,
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    /// Returns the party metadata.
    pub fn party(&self) -> PartyDetails {
        PartyDetails {
            name: self.name.clone(),
            people: self.people,
            phone: self.phone.clone(),
            notes: self.notes.clone(),
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Applies a status change, keeping `completed_at` in step with it.
    pub fn apply_status(&mut self, status: BookingStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = now;
        self.completed_at = match status {
            BookingStatus::Completed => Some(now),
            BookingStatus::Eating => None,
        };
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
