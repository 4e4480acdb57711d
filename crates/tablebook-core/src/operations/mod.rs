//! # Operations
//!
//! One function per transport endpoint. Each takes the stores by reference
//! plus decoded arguments and returns a `CoreResult`.
//!
//! ## Booking Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  1. LOCATE                                                             │
//! │     └── locate(party_size) → Table { status: Occupied }                │
//! │                                                                         │
//! │  2. BOOK                                                               │
//! │     └── book(table_id, party) → Booking { status: Eating }             │
//! │                                                                         │
//! │  3. (OPTIONAL) REQUEST BILL                                            │
//! │     └── update_table_status(table_id, WaitingForBill)                  │
//! │                                                                         │
//! │  4. BILL                                                               │
//! │     ├── booking Eating → Completed                                     │
//! │     ├── table → Free                                                   │
//! │     └── on failure: booking back to Eating (compensation)              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Input validation is the caller's job (see [`crate::validation`]); these
//! functions only enforce business rules.

mod bill;
mod booking;
mod locate;
mod tables;

pub use bill::bill;
pub use booking::{book, get_booking};
pub use locate::locate;
pub use tables::{list_tables, update_table_status};
