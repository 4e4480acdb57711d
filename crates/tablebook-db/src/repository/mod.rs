//! # Repository Module
//!
//! SQLite implementations of the core store traits.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  tablebook-core operation                                              │
//! │       │                                                                 │
//! │       │  tables.claim_free_table(4)                                    │
//! │       ▼                                                                 │
//! │  TableRepository (impl TableRegistry)                                  │
//! │  ├── list_tables / get_table                                           │
//! │  ├── find_free_table / claim_free_table                                │
//! │  ├── set_status / compare_and_set_status                               │
//! │  └── seed                                                              │
//! │                                                                         │
//! │  BookingRepository (impl BookingStore)                                 │
//! │  ├── create                                                            │
//! │  ├── find_by_id / find_active_by_table                                 │
//! │  └── set_status / compare_and_set_status                               │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Queries are built at runtime with `sqlx::query_as` and bound
//! parameters; rows decode straight into the core record types through
//! their `FromRow` derives.
//!
//! ## Available Repositories
//!
//! - [`TableRepository`](table::TableRepository) - Table registry
//! - [`BookingRepository`](booking::BookingRepository) - Booking records

pub mod booking;
pub mod table;
