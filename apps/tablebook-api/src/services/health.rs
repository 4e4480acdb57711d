//! Liveness probe.

use axum::http::StatusCode;

/// `GET /healthcheck`: 200 with an empty body while the process serves.
pub async fn healthcheck() -> StatusCode {
    StatusCode::OK
}
