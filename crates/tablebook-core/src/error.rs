//! # Error Types
//!
//! Domain-specific error types for tablebook-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tablebook-core errors (this file)                                     │
//! │  ├── CoreError        - Booking/table rule failures                    │
//! │  └── ValidationError  - Input validation failures (adapter side)       │
//! │                                                                         │
//! │  tablebook-db errors (separate crate)                                  │
//! │  └── DbError          - Database failures → CoreError::Storage         │
//! │                                                                         │
//! │  tablebook-api errors                                                  │
//! │  └── ApiError         - What HTTP clients see                          │
//! │                                                                         │
//! │  Flow: DbError → CoreError → ApiError → HTTP status                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Error Kinds
//! Callers only need three buckets, exposed through [`CoreError::kind`]:
//!
//! | Kind                  | Meaning                                        |
//! |-----------------------|------------------------------------------------|
//! | `NotFound`            | Entity missing or precondition unmet           |
//! | `InternalConsistency` | A referenced record vanished mid-operation     |
//! | `Storage`             | The backend failed (not a business outcome)    |

use thiserror::Error;

use crate::types::{BookingId, TableId, TableStatus};

// =============================================================================
// Core Error
// =============================================================================

/// Coarse classification of a [`CoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Entity does not exist or a precondition is unmet.
    NotFound,
    /// A record the operation depends on disappeared between steps.
    InternalConsistency,
    /// The storage backend failed.
    Storage,
}

/// Core business logic errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// No table with this identifier.
    #[error("Table not found: {0}")]
    TableNotFound(TableId),

    /// No booking with this identifier.
    #[error("Booking not found: {0}")]
    BookingNotFound(BookingId),

    /// Every table is taken or too small.
    #[error("No free table for a party of {party_size}")]
    NoTableAvailable { party_size: u32 },

    /// Booking attempted against a table that was not reserved by a locate.
    ///
    /// ## When This Occurs
    /// - The table is still `Free` (nobody located it)
    /// - The table is `WaitingForBill` (someone else is about to pay)
    #[error("Table {table_id} is {status}, it must be located before booking")]
    TableNotReserved { table_id: TableId, status: TableStatus },

    /// An active booking already references the table.
    #[error("Table {0} already has an active booking")]
    TableAlreadyBooked(TableId),

    /// The party does not fit at the table.
    #[error("Table {table_id} seats {capacity}, party has {people}")]
    PartyTooLarge {
        table_id: TableId,
        capacity: u32,
        people: u32,
    },

    /// Billing a booking that is already completed.
    #[error("Booking {0} is already completed")]
    BookingNotActive(BookingId),

    /// Status update not allowed by the transition rules.
    #[error("Table {table_id} cannot move from {from} to {to}")]
    InvalidTableTransition {
        table_id: TableId,
        from: TableStatus,
        to: TableStatus,
    },

    /// `WaitingForBill` requested for a table nobody is eating at.
    #[error("Table {0} has no active booking")]
    NoActiveBooking(TableId),

    /// The table changed status while the update was being decided.
    #[error("Table {0} changed status concurrently")]
    TableStatusChanged(TableId),

    /// A record the operation depends on went missing between steps.
    ///
    /// Should not occur while the invariants hold. Surfaced to clients as
    /// not-found, kept distinct here for logs and tests.
    #[error("Internal consistency error: {0}")]
    InternalConsistency(String),

    /// The storage backend failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl CoreError {
    /// Returns the coarse kind used by callers to pick a response.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::InternalConsistency(_) => ErrorKind::InternalConsistency,
            CoreError::Storage(_) => ErrorKind::Storage,
            _ => ErrorKind::NotFound,
        }
    }

    /// Convenience for an internal consistency error.
    pub fn inconsistency(message: impl Into<String>) -> Self {
        CoreError::InternalConsistency(message.into())
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised by the transport layer before any operation runs. The operations
/// themselves never produce these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (non-numeric id, bad phone number, ...).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Duplicate value (e.g., the same table id twice in a layout).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
