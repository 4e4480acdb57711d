//! `POST /locate`: hand out a free table for a party.
//!
//! ```bash
//! curl -X POST http://localhost:9091/locate \
//!   -H "Accept: application/json" \
//!   -d "ID=4"
//! # {"table_id":3,"capacity":4}
//! ```

use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::{Form, Json};
use serde::{Deserialize, Serialize};

use tablebook_core::operations;
use tablebook_core::validation::{parse_id, validate_party_size};

use crate::error::ApiError;
use crate::headers::{require_accept, require_content_type, FORM_URLENCODED, JSON};
use crate::AppState;

/// Form body. The party size travels in `ID`; `people` is accepted too.
#[derive(Debug, Deserialize)]
pub struct LocateForm {
    #[serde(rename = "ID", alias = "people")]
    pub party_size: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocateResponse {
    pub table_id: i64,
    pub capacity: u32,
}

pub async fn locate_table(
    State(state): State<AppState>,
    headers: HeaderMap,
    form: Result<Form<LocateForm>, FormRejection>,
) -> Result<Json<LocateResponse>, ApiError> {
    require_content_type(&headers, FORM_URLENCODED)?;
    require_accept(&headers, JSON)?;

    let Form(form) = form?;
    let raw = form.party_size.unwrap_or_default();
    let party_size = validate_party_size(parse_id("ID", &raw)?)?;

    let table = operations::locate(state.tables.as_ref(), party_size).await?;

    Ok(Json(LocateResponse {
        table_id: table.id,
        capacity: table.capacity,
    }))
}
