use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::Value;

use crate::application::services::{ErrorKind, ProcessingError};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: Value) -> Self {
        Self {
            error: error.into(),
            details: Some(details),
        }
    }
}

impl IntoResponse for ProcessingError {
    fn into_response(self) -> Response {
        match self.kind() {
            ErrorKind::Validation => tracing::warn!(error = %self, "Rejected request"),
            ErrorKind::Cancelled => tracing::info!(error = %self, "Request cancelled"),
            _ => tracing::error!(error = %self, kind = ?self.kind(), "Request failed"),
        }

        let (status, body) = match self {
            ProcessingError::Validation(message) => {
                (StatusCode::BAD_REQUEST, ErrorResponse::new(message))
            }
            ProcessingError::Configuration(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorResponse::new(message))
            }
            ProcessingError::TranscriptionFailed { payload, .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::with_details("Transcription failed.", payload),
            ),
            ProcessingError::Summarization(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::with_details("Gemini API error.", Value::String(e.to_string())),
            ),
            err @ ProcessingError::Timeout { .. } => (
                StatusCode::GATEWAY_TIMEOUT,
                ErrorResponse::with_details(
                    "Transcription timed out.",
                    Value::String(err.to_string()),
                ),
            ),
            ProcessingError::Cancelled => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorResponse::new("Server is shutting down."),
            ),
            err @ (ProcessingError::Transcription(_) | ProcessingError::Staging(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::with_details("Server error.", Value::String(err.to_string())),
            ),
        };

        (status, Json(body)).into_response()
    }
}
