use std::io;
use std::sync::Arc;

use bytes::Bytes;
use futures::stream::BoxStream;

use crate::application::ports::{StagingStore, StagingStoreError};
use crate::domain::{AudioSubmission, StoragePath, UploadId};

use super::ProcessingError;

const MISSING_INPUT: &str = "No file uploaded.";

/// An upload written to the staging store. Deleted exactly once: by
/// `release`, or by `Drop` if the owner never got to call it.
pub struct StagedUpload {
    store: Arc<dyn StagingStore>,
    path: StoragePath,
    mime_type: String,
    size_bytes: u64,
    released: bool,
}

impl StagedUpload {
    pub fn path(&self) -> &StoragePath {
        &self.path
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn submission(&self) -> AudioSubmission {
        AudioSubmission::Upload {
            staged_path: self.path.clone(),
            mime_type: self.mime_type.clone(),
        }
    }

    pub async fn release(mut self) {
        self.released = true;
        match self.store.delete(&self.path).await {
            Ok(()) => tracing::debug!(path = %self.path, "Staged upload deleted"),
            Err(e) => tracing::warn!(
                error = %e,
                path = %self.path,
                "Failed to delete staged upload"
            ),
        }
    }
}

impl Drop for StagedUpload {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        let store = Arc::clone(&self.store);
        let path = self.path.clone();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                tracing::debug!(path = %path, "Staged upload dropped unreleased, scheduling delete");
                handle.spawn(async move {
                    if let Err(e) = store.delete(&path).await {
                        tracing::warn!(error = %e, path = %path, "Failed to delete staged upload");
                    }
                });
            }
            Err(_) => {
                tracing::warn!(path = %path, "Staged upload dropped outside a runtime, file left behind");
            }
        }
    }
}

/// Raw caller input: exactly one of the two must be present.
#[derive(Default)]
pub struct IngressRequest {
    pub upload: Option<StagedUpload>,
    pub url: Option<String>,
}

impl IngressRequest {
    pub fn from_upload(upload: StagedUpload) -> Self {
        Self {
            upload: Some(upload),
            url: None,
        }
    }

    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            upload: None,
            url: Some(url.into()),
        }
    }
}

/// A validated submission together with the upload it may own.
pub struct StagedSubmission {
    submission: AudioSubmission,
    upload: Option<StagedUpload>,
}

impl StagedSubmission {
    pub fn submission(&self) -> &AudioSubmission {
        &self.submission
    }

    pub async fn release(self) {
        if let Some(upload) = self.upload {
            upload.release().await;
        }
    }
}

pub struct IngressHandler {
    staging_store: Arc<dyn StagingStore>,
}

impl IngressHandler {
    pub fn new(staging_store: Arc<dyn StagingStore>) -> Self {
        Self { staging_store }
    }

    /// Streams an uploaded file into staging under a fresh unique path.
    #[tracing::instrument(skip(self, stream))]
    pub async fn stage(
        &self,
        filename: &str,
        mime_type: &str,
        stream: BoxStream<'_, Result<Bytes, io::Error>>,
    ) -> Result<StagedUpload, ProcessingError> {
        let upload_id = UploadId::new();
        let path = StoragePath::for_upload(&upload_id, filename);

        // Io errors come from reading the caller's body, not from the store.
        let size_bytes = match self.staging_store.store(&path, stream).await {
            Ok(size) => size,
            Err(StagingStoreError::Io(e)) => {
                tracing::warn!(error = %e, "Failed to read uploaded audio");
                return Err(ProcessingError::Validation(format!(
                    "Failed to read uploaded file: {}",
                    e
                )));
            }
            Err(e) => return Err(e.into()),
        };

        let upload = StagedUpload {
            store: Arc::clone(&self.staging_store),
            path,
            mime_type: mime_type.to_string(),
            size_bytes,
            released: false,
        };

        if size_bytes == 0 {
            tracing::warn!("Uploaded audio file is empty");
            upload.release().await;
            return Err(ProcessingError::Validation(
                "Uploaded file is empty.".to_string(),
            ));
        }

        tracing::info!(
            upload_id = %upload_id.as_uuid(),
            path = %upload.path(),
            mime_type = %upload.mime_type(),
            bytes = upload.size_bytes(),
            "Audio upload staged"
        );

        Ok(upload)
    }

    /// Validates that the request carries exactly one usable audio source.
    /// Never touches the network.
    pub async fn accept(&self, request: IngressRequest) -> Result<StagedSubmission, ProcessingError> {
        match (request.upload, request.url) {
            (None, None) => {
                tracing::warn!("Audio request without file or URL");
                Err(ProcessingError::Validation(MISSING_INPUT.to_string()))
            }
            (Some(upload), Some(_)) => {
                tracing::warn!("Audio request with both file and URL");
                upload.release().await;
                Err(ProcessingError::Validation(
                    "Provide either an audio file or a URL, not both.".to_string(),
                ))
            }
            (Some(upload), None) => Ok(StagedSubmission {
                submission: upload.submission(),
                upload: Some(upload),
            }),
            (None, Some(url)) => {
                let source_url = validate_audio_url(&url)?;
                Ok(StagedSubmission {
                    submission: AudioSubmission::UrlReference { source_url },
                    upload: None,
                })
            }
        }
    }
}

fn validate_audio_url(raw: &str) -> Result<String, ProcessingError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ProcessingError::Validation(MISSING_INPUT.to_string()));
    }

    let parsed = reqwest::Url::parse(trimmed)
        .map_err(|e| ProcessingError::Validation(format!("Invalid audio URL: {}", e)))?;

    match parsed.scheme() {
        "http" | "https" => Ok(trimmed.to_string()),
        other => Err(ProcessingError::Validation(format!(
            "Unsupported audio URL scheme: {}",
            other
        ))),
    }
}
