use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::application::services::ProcessingError;
use crate::infrastructure::observability::sanitize_prompt;
use crate::presentation::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SummarizeResponse {
    pub summary: String,
}

/// `POST /summarize-with-gemini`
#[tracing::instrument(skip(state, body))]
pub async fn summarize_handler(
    State(state): State<AppState>,
    body: Result<Json<SummarizeRequest>, JsonRejection>,
) -> Response {
    let text = match body {
        Ok(Json(request)) => request.text,
        Err(rejection) => {
            return ProcessingError::Validation(rejection.body_text()).into_response();
        }
    };

    tracing::debug!(
        text = %sanitize_prompt(text.as_deref().unwrap_or_default()),
        "Processing summarization request"
    );

    match state.summarization.summarize(text.as_deref()).await {
        Ok(summary) => (StatusCode::OK, Json(SummarizeResponse { summary })).into_response(),
        Err(e) => e.into_response(),
    }
}
