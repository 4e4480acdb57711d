//! `POST /bill`: pay the bill for a booking and free its table.
//!
//! ```bash
//! curl -X POST http://localhost:9091/bill -F "ID=12"
//! # {"booking_id":12,"table_id":3,"status":"completed"}
//! ```

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::HeaderMap;
use axum::Json;
use tracing::debug;

use tablebook_core::operations;
use tablebook_core::validation::{parse_id, validate_id};

use crate::error::ApiError;
use crate::headers::{require_content_type, MULTIPART_FORM_DATA};
use crate::services::booking::BookingResponse;
use crate::AppState;

/// Multipart field carrying the booking id.
const BOOKING_ID_FIELD: &str = "ID";

pub async fn pay_bill(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<BookingResponse>, ApiError> {
    require_content_type(&headers, MULTIPART_FORM_DATA)?;
    let mut multipart = multipart?;

    // First `ID` wins; other fields are drained and ignored.
    let mut raw_id: Option<String> = None;
    while let Some(field) = multipart.next_field().await? {
        if raw_id.is_none() && field.name() == Some(BOOKING_ID_FIELD) {
            raw_id = Some(field.text().await?);
        } else {
            debug!(field = ?field.name(), "Ignoring multipart field");
        }
    }

    let raw_id = raw_id.ok_or_else(|| ApiError::bad_request("Missing multipart field ID"))?;
    let booking_id = validate_id("ID", parse_id("ID", &raw_id)?)?;

    let booking = operations::bill(state.tables.as_ref(), state.bookings.as_ref(), booking_id).await?;
    Ok(Json(BookingResponse::from(&booking)))
}
