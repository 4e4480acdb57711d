//! Header checks shared by the handlers.
//!
//! Media types are compared on the essence only (`type/subtype`), so
//! `application/json; charset=utf-8` counts as `application/json`.

use axum::http::header::{ACCEPT, CONTENT_TYPE};
use axum::http::HeaderMap;

use crate::error::ApiError;

pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
pub const JSON: &str = "application/json";
pub const MULTIPART_FORM_DATA: &str = "multipart/form-data";

fn essence(media_type: &str) -> String {
    media_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Rejects the request unless its `Content-Type` is `expected`.
pub fn require_content_type(headers: &HeaderMap, expected: &str) -> Result<(), ApiError> {
    let actual = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(essence);

    match actual {
        Some(actual) if actual == expected => Ok(()),
        Some(actual) => Err(ApiError::bad_request(format!(
            "Expected Content-Type {expected}, got {actual}"
        ))),
        None => Err(ApiError::bad_request(format!(
            "Missing Content-Type, expected {expected}"
        ))),
    }
}

/// Rejects the request unless `Accept` lists `expected`.
///
/// Wildcards are not honoured: the client has to ask for the type.
pub fn require_accept(headers: &HeaderMap, expected: &str) -> Result<(), ApiError> {
    let accepted = headers
        .get_all(ACCEPT)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .any(|media_type| essence(media_type) == expected);

    if accepted {
        Ok(())
    } else {
        Err(ApiError::bad_request(format!("Accept must include {expected}")))
    }
}
