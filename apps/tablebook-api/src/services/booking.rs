//! `POST /booking` and `GET /booking/{id}`.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use tablebook_core::validation::{validate_id, validate_party};
use tablebook_core::{operations, Booking, BookingId, BookingStatus, NewBooking, TableId};

use crate::error::ApiError;
use crate::headers::{require_content_type, JSON};
use crate::AppState;

/// Booking request body.
///
/// ```json
/// {"table": 1, "name": "Ada", "people": 2, "phone": "+44 20 7946 0000"}
/// ```
#[derive(Debug, Deserialize)]
pub struct BookingRequest {
    pub table: i64,
    pub name: String,
    pub people: i64,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookingResponse {
    pub booking_id: BookingId,
    pub table_id: TableId,
    pub status: BookingStatus,
}

impl From<&Booking> for BookingResponse {
    fn from(booking: &Booking) -> Self {
        BookingResponse {
            booking_id: booking.id,
            table_id: booking.table_id,
            status: booking.status,
        }
    }
}

pub async fn create_booking(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<BookingRequest>, JsonRejection>,
) -> Result<Json<BookingResponse>, ApiError> {
    require_content_type(&headers, JSON)?;
    let Json(request) = body?;

    let table_id = validate_id("table", request.table)?;
    let party = validate_party(
        &request.name,
        request.people,
        request.phone.as_deref(),
        request.notes.as_deref(),
    )?;

    let booking = operations::book(
        state.tables.as_ref(),
        state.bookings.as_ref(),
        NewBooking::new(table_id, party),
    )
    .await?;

    Ok(Json(BookingResponse::from(&booking)))
}

pub async fn get_booking(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Booking>, ApiError> {
    let Path(id) = id?;
    let booking_id = validate_id("id", id)?;

    let booking = operations::get_booking(state.bookings.as_ref(), booking_id).await?;
    Ok(Json(booking))
}
