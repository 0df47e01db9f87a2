use std::io;

use axum::Json;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use futures::{StreamExt, TryStreamExt};

use crate::application::services::{IngressRequest, ProcessingError};
use crate::presentation::state::AppState;

const AUDIO_FIELD: &str = "audio";
const URL_FIELD: &str = "url";

/// `POST /process-audio`: multipart with an `audio` file (or a `url` text field).
#[tracing::instrument(skip(state, multipart))]
pub async fn process_audio_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let multipart = match multipart {
        Ok(m) => m,
        Err(rejection) => {
            return ProcessingError::Validation(format!(
                "Expected a multipart form with an `audio` file: {}",
                rejection.body_text()
            ))
            .into_response();
        }
    };

    let request = match read_form(&state, multipart).await {
        Ok(request) => request,
        Err(e) => return e.into_response(),
    };

    let cancel = state.shutdown.child_token();
    match state.audio_processing.process(request, &cancel).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Stages the `audio` field and collects the `url` field. Other fields are
/// skipped. Anything already staged is released if reading fails.
async fn read_form(
    state: &AppState,
    mut multipart: Multipart,
) -> Result<IngressRequest, ProcessingError> {
    let mut request = IngressRequest::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(f)) => f,
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read multipart");
                discard(request).await;
                return Err(ProcessingError::Validation(format!(
                    "Failed to read multipart: {}",
                    e
                )));
            }
        };

        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(AUDIO_FIELD) => {
                if request.upload.is_some() {
                    discard(request).await;
                    return Err(ProcessingError::Validation(
                        "Only one audio file may be uploaded.".to_string(),
                    ));
                }

                let filename = field.file_name().unwrap_or("audio").to_string();
                let mime_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();

                tracing::debug!(filename = %filename, mime_type = %mime_type, "Receiving audio upload");

                let stream = field.map_err(io::Error::other).boxed();
                match state
                    .audio_processing
                    .ingress()
                    .stage(&filename, &mime_type, stream)
                    .await
                {
                    Ok(upload) => request.upload = Some(upload),
                    Err(e) => {
                        discard(request).await;
                        return Err(e);
                    }
                }
            }
            Some(URL_FIELD) => match field.text().await {
                Ok(text) => request.url = Some(text),
                Err(e) => {
                    discard(request).await;
                    return Err(ProcessingError::Validation(format!(
                        "Failed to read url field: {}",
                        e
                    )));
                }
            },
            other => {
                tracing::debug!(field = ?other, "Ignoring multipart field");
            }
        }
    }

    Ok(request)
}

async fn discard(request: IngressRequest) {
    if let Some(upload) = request.upload {
        upload.release().await;
    }
}
