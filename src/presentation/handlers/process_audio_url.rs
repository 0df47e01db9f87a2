use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::application::services::{IngressRequest, ProcessingError};
use crate::presentation::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ProcessAudioUrlRequest {
    pub url: Option<String>,
}

/// `POST /process-audio-url`: transcribes audio the service fetches itself.
#[tracing::instrument(skip(state, body))]
pub async fn process_audio_url_handler(
    State(state): State<AppState>,
    body: Result<Json<ProcessAudioUrlRequest>, JsonRejection>,
) -> Response {
    let url = match body {
        Ok(Json(request)) => request.url,
        Err(rejection) => {
            return ProcessingError::Validation(rejection.body_text()).into_response();
        }
    };

    let request = IngressRequest { upload: None, url };
    let cancel = state.shutdown.child_token();

    match state.audio_processing.process(request, &cancel).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => e.into_response(),
    }
}
