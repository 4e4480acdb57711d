//! Error types for the Tablebook API.
//!
//! ## Status Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Source                                   HTTP     code                 │
//! │  ───────────────────────────────────────  ───────  ──────────────────── │
//! │  wrong content type / Accept, bad body    400      bad_request          │
//! │  ValidationError                          400      validation_failed    │
//! │  CoreError (NotFound kind)                404      per variant          │
//! │  CoreError::InternalConsistency           404      not_found            │
//! │  CoreError::Storage                       500      storage_error        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Consistency and storage details are logged, never sent to the client.

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::{FormRejection, JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use tablebook_core::{CoreError, ErrorKind, ValidationError};

/// JSON error body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

/// Tablebook API errors.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request could not be decoded.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A field failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A core operation failed.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Core(err) => match err.kind() {
                ErrorKind::NotFound | ErrorKind::InternalConsistency => StatusCode::NOT_FOUND,
                ErrorKind::Storage => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Validation(_) => "validation_failed",
            ApiError::Core(err) => match err {
                CoreError::TableNotFound(_) => "table_not_found",
                CoreError::BookingNotFound(_) => "booking_not_found",
                CoreError::NoTableAvailable { .. } => "no_table_available",
                CoreError::TableNotReserved { .. } => "table_not_reserved",
                CoreError::TableAlreadyBooked(_) => "table_already_booked",
                CoreError::PartyTooLarge { .. } => "party_too_large",
                CoreError::BookingNotActive(_) => "booking_not_active",
                CoreError::InvalidTableTransition { .. } => "invalid_table_transition",
                CoreError::NoActiveBooking(_) => "no_active_booking",
                CoreError::TableStatusChanged(_) => "table_status_changed",
                CoreError::InternalConsistency(_) => "not_found",
                CoreError::Storage(_) => "storage_error",
            },
        }
    }

    /// Message safe to show a client.
    fn public_message(&self) -> String {
        match self {
            ApiError::Core(CoreError::InternalConsistency(_)) => "Resource not found".to_string(),
            ApiError::Core(CoreError::Storage(_)) => "Storage unavailable".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Core(CoreError::InternalConsistency(detail)) => {
                error!(detail = %detail, "Internal consistency failure");
            }
            ApiError::Core(CoreError::Storage(detail)) => {
                error!(detail = %detail, "Storage failure");
            }
            other => warn!(status = status.as_u16(), error = %other, "Request rejected"),
        }

        let body = ErrorBody {
            code: self.code().to_string(),
            message: self.public_message(),
        };
        (status, Json(body)).into_response()
    }
}

// Extractor rejections are all decoding failures.

impl From<FormRejection> for ApiError {
    fn from(rejection: FormRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::BadRequest(err.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
