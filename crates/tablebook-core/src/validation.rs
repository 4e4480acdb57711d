//! # Validation Module
//!
//! Input validation utilities for Tablebook.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP adapter (tablebook-api)                                 │
//! │  ├── Content-Type / Accept checks                                      │
//! │  ├── Body decoding (form, JSON, multipart)                             │
//! │  └── THIS MODULE: field rules, before any operation runs               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Operations (tablebook-core)                                  │
//! │  └── Business rules: capacity, table reserved, booking active          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK constraints on statuses                                     │
//! │  ├── Foreign key bookings.table_id                                     │
//! │  └── One eating booking per table (partial unique index)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tablebook_core::validation::{parse_id, validate_party_size};
//!
//! let party_size = validate_party_size(parse_id("ID", "4").unwrap()).unwrap();
//! assert_eq!(party_size, 4);
//! ```

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::types::{PartyDetails, Table, TableId};
use crate::{MAX_GUEST_NAME_LEN, MAX_NOTES_LEN, MAX_TABLE_CAPACITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Identifiers
// =============================================================================

/// Parses an integer identifier or count sent as text (form fields).
pub fn parse_id(field: &str, raw: &str) -> ValidationResult<i64> {
    let raw = raw.trim();

    if raw.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    raw.parse::<i64>()
        .map_err(|_| ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be an integer".to_string(),
        })
}

/// Validates a table or booking identifier.
///
/// Identifiers start at 1; zero and negatives never exist.
pub fn validate_id(field: &str, id: i64) -> ValidationResult<i64> {
    if id <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(id)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a party size.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must fit a `u32`
///
/// There is no upper bound here: whether a party fits is decided against
/// the table capacities by the operations.
pub fn validate_party_size(people: i64) -> ValidationResult<u32> {
    if people <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "people".to_string(),
        });
    }

    u32::try_from(people).map_err(|_| ValidationError::OutOfRange {
        field: "people".to_string(),
        min: 1,
        max: i64::from(u32::MAX),
    })
}

/// Validates a table capacity from a layout.
pub fn validate_table_capacity(capacity: i64) -> ValidationResult<u32> {
    if capacity <= 0 || capacity > i64::from(MAX_TABLE_CAPACITY) {
        return Err(ValidationError::OutOfRange {
            field: "capacity".to_string(),
            min: 1,
            max: i64::from(MAX_TABLE_CAPACITY),
        });
    }

    Ok(capacity as u32)
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates the name a booking is held under.
///
/// ## Returns
/// The trimmed name.
pub fn validate_guest_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_GUEST_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_GUEST_NAME_LEN,
        });
    }

    Ok(name.to_string())
}

/// Validates an optional phone number.
///
/// ## Rules
/// - Blank counts as absent
/// - 6 to 20 characters
/// - Digits, spaces, `+`, `-`, `(`, `)` only, with at least one digit
pub fn validate_phone(phone: Option<&str>) -> ValidationResult<Option<String>> {
    let Some(phone) = phone.map(str::trim).filter(|p| !p.is_empty()) else {
        return Ok(None);
    };

    let allowed = |c: char| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')');
    if !phone.chars().all(allowed) || !phone.chars().any(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must contain only digits, spaces, +, -, ( and )".to_string(),
        });
    }

    if phone.len() < 6 || phone.len() > 20 {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must be between 6 and 20 characters".to_string(),
        });
    }

    Ok(Some(phone.to_string()))
}

/// Validates optional booking notes. Blank counts as absent.
pub fn validate_notes(notes: Option<&str>) -> ValidationResult<Option<String>> {
    let Some(notes) = notes.map(str::trim).filter(|n| !n.is_empty()) else {
        return Ok(None);
    };

    if notes.chars().count() > MAX_NOTES_LEN {
        return Err(ValidationError::TooLong {
            field: "notes".to_string(),
            max: MAX_NOTES_LEN,
        });
    }

    Ok(Some(notes.to_string()))
}

/// Validates every party field and returns the normalized details.
pub fn validate_party(
    name: &str,
    people: i64,
    phone: Option<&str>,
    notes: Option<&str>,
) -> ValidationResult<PartyDetails> {
    Ok(PartyDetails {
        name: validate_guest_name(name)?,
        people: validate_party_size(people)?,
        phone: validate_phone(phone)?,
        notes: validate_notes(notes)?,
    })
}

// =============================================================================
// Table Layout
// =============================================================================

/// Parses a table layout of the form `id:capacity,id:capacity,...`.
///
/// ## Example
/// ```rust
/// use tablebook_core::validation::parse_table_layout;
///
/// let tables = parse_table_layout("1:2, 2:4").unwrap();
/// assert_eq!(tables.len(), 2);
/// assert_eq!(tables[1].capacity, 4);
/// assert!(parse_table_layout("1:2,1:4").is_err());
/// ```
pub fn parse_table_layout(layout: &str) -> ValidationResult<Vec<Table>> {
    let mut seen: HashSet<TableId> = HashSet::new();
    let mut tables = Vec::new();

    for entry in layout.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (id, capacity) = entry
            .split_once(':')
            .ok_or_else(|| ValidationError::InvalidFormat {
                field: "layout".to_string(),
                reason: format!("'{entry}' must look like id:capacity"),
            })?;

        let id = validate_id("table id", parse_id("table id", id)?)?;
        let capacity = validate_table_capacity(parse_id("capacity", capacity)?)?;

        if !seen.insert(id) {
            return Err(ValidationError::Duplicate {
                field: "table id".to_string(),
                value: id.to_string(),
            });
        }

        tables.push(Table::new(id, capacity));
    }

    if tables.is_empty() {
        return Err(ValidationError::Required {
            field: "layout".to_string(),
        });
    }

    tables.sort_by_key(|table| table.id);
    Ok(tables)
}

// =============================================================================
// Unit Tests
// =============================================================================
