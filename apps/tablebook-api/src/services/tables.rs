//! `GET /tables` and `PUT /tables`.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;

use tablebook_core::validation::validate_id;
use tablebook_core::{operations, Table, TableStatus};

use crate::error::ApiError;
use crate::headers::{require_content_type, JSON};
use crate::AppState;

/// ```json
/// {"id": 3, "status": "waiting_for_bill"}
/// ```
#[derive(Debug, Deserialize)]
pub struct UpdateTableRequest {
    pub id: i64,
    pub status: String,
}

pub async fn list_tables(State(state): State<AppState>) -> Result<Json<Vec<Table>>, ApiError> {
    let tables = operations::list_tables(state.tables.as_ref()).await?;
    Ok(Json(tables))
}

pub async fn update_table(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<UpdateTableRequest>, JsonRejection>,
) -> Result<Json<Table>, ApiError> {
    require_content_type(&headers, JSON)?;
    let Json(request) = body?;

    let table_id = validate_id("id", request.id)?;
    let status: TableStatus = request.status.parse()?;

    let table = operations::update_table_status(
        state.tables.as_ref(),
        state.bookings.as_ref(),
        table_id,
        status,
    )
    .await?;
    Ok(Json(table))
}
