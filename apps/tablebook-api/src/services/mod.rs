//! HTTP handlers, one module per resource.
//!
//! Handlers take extractors as `Result<_, Rejection>` so every decoding
//! failure goes through [`ApiError`](crate::ApiError) and gets the same
//! `{code, message}` body.

pub mod bill;
pub mod booking;
pub mod health;
pub mod locate;
pub mod tables;
