//! API request and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};

use crate::agents::AgentError;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Always `"healthy"` while the process serves requests
    pub status: String,

    /// Name of the agent behind `POST /process`
    pub agent: String,

    /// Service version
    pub version: String,

    pub build_date: String,
}

/// JSON error body shared by every failing endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short, stable error label
    pub error: String,

    /// Human-readable detail
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// One message per validation violation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
            details: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = Some(details);
        self
    }
}

/// Every way a request can fail before or during agent execution.
#[derive(Debug)]
pub enum ApiError {
    /// No `x-api-key` header (401)
    MissingApiKey,
    /// `x-api-key` does not match (403)
    InvalidApiKey,
    /// Request body failed validation (400)
    Validation(Vec<String>),
    /// No agent registered under the requested name (404)
    UnknownAgent(String),
    /// The agent returned an error (500)
    Processing(AgentError),
    /// No route matched (404)
    NotFound,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingApiKey => StatusCode::UNAUTHORIZED,
            ApiError::InvalidApiKey => StatusCode::FORBIDDEN,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::UnknownAgent(_) | ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Processing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> ErrorResponse {
        match self {
            ApiError::MissingApiKey => ErrorResponse::new("API key required"),
            ApiError::InvalidApiKey => ErrorResponse::new("Invalid API key"),
            ApiError::Validation(details) => {
                ErrorResponse::new("Invalid input").with_details(details.clone())
            }
            ApiError::UnknownAgent(name) => ErrorResponse::new("Unknown agent")
                .with_message(format!("No agent registered under '{}'", name)),
            ApiError::Processing(err) => {
                ErrorResponse::new("Processing failed").with_message(err.to_string())
            }
            ApiError::NotFound => ErrorResponse::new("Not found"),
        }
    }
}

impl From<AgentError> for ApiError {
    fn from(err: AgentError) -> Self {
        ApiError::Processing(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_omits_absent_fields() {
        let value = serde_json::to_value(ApiError::MissingApiKey.body()).unwrap();
        assert_eq!(value, serde_json::json!({ "error": "API key required" }));
    }

    #[test]
    fn processing_error_carries_agent_message() {
        let err = ApiError::from(AgentError::Internal("boom".to_string()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = err.body();
        assert_eq!(body.error, "Processing failed");
        assert_eq!(body.message.as_deref(), Some("Internal error: boom"));
    }
}
