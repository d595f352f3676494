//! API key gate for the processing endpoints.
//!
//! - Clients send the shared key in the `x-api-key` header
//! - The expected key comes from `API_KEY` (see [`crate::config`])
//! - Health and version endpoints stay public

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::routes::AppState;
use super::types::ApiError;
use crate::util::constant_time_eq;

/// Header carrying the client's API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Check a presented key against the expected one.
pub fn check_api_key(presented: Option<&str>, expected: &str) -> Result<(), ApiError> {
    match presented {
        None | Some("") => Err(ApiError::MissingApiKey),
        Some(key) if constant_time_eq(key, expected) => Ok(()),
        Some(_) => Err(ApiError::InvalidApiKey),
    }
}

/// Check the raw header value; one that is not visible ASCII is a wrong key.
pub fn check_header(header: Option<&HeaderValue>, expected: &str) -> Result<(), ApiError> {
    match header.map(HeaderValue::to_str) {
        None => check_api_key(None, expected),
        Some(Ok(key)) => check_api_key(Some(key), expected),
        Some(Err(_)) => Err(ApiError::InvalidApiKey),
    }
}

pub async fn require_api_key(
    State(state): State<Arc<AppState>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let checked = check_header(req.headers().get(API_KEY_HEADER), &state.config.api_key);
    match checked {
        Ok(()) => next.run(req).await,
        Err(err) => {
            match err {
                ApiError::MissingApiKey => tracing::warn!("API request without API key"),
                _ => tracing::warn!("API request with invalid API key"),
            }
            err.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_key_passes() {
        assert!(check_api_key(Some("development-key"), "development-key").is_ok());
    }

    #[test]
    fn missing_or_empty_key_is_401() {
        assert!(matches!(
            check_api_key(None, "development-key"),
            Err(ApiError::MissingApiKey)
        ));
        assert!(matches!(
            check_api_key(Some(""), "development-key"),
            Err(ApiError::MissingApiKey)
        ));
    }

    #[test]
    fn non_ascii_header_is_403() {
        let header = HeaderValue::from_bytes(b"caf\xe9").unwrap();
        assert!(matches!(
            check_header(Some(&header), "development-key"),
            Err(ApiError::InvalidApiKey)
        ));
        assert!(matches!(
            check_header(None, "development-key"),
            Err(ApiError::MissingApiKey)
        ));

        let header = HeaderValue::from_static("development-key");
        assert!(check_header(Some(&header), "development-key").is_ok());
    }

    #[test]
    fn wrong_key_is_403() {
        assert!(matches!(
            check_api_key(Some("invalid-key"), "development-key"),
            Err(ApiError::InvalidApiKey)
        ));
    }
}
