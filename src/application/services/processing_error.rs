use std::time::Duration;

use serde_json::Value;

use crate::application::ports::{LlmClientError, StagingStoreError, TranscriptionServiceError};

/// Coarse classification used at the request boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Configuration,
    UpstreamService,
    TranscriptionFailed,
    Timeout,
    Cancelled,
    Internal,
}

#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Configuration(String),
    #[error("transcription service: {0}")]
    Transcription(#[from] TranscriptionServiceError),
    #[error("summarization service: {0}")]
    Summarization(#[from] LlmClientError),
    #[error("transcription failed: {}", reason.as_deref().unwrap_or("no reason reported"))]
    TranscriptionFailed {
        reason: Option<String>,
        payload: Value,
    },
    #[error("transcription not finished after {attempts} polls ({elapsed:?})")]
    Timeout { attempts: u32, elapsed: Duration },
    #[error("transcription cancelled")]
    Cancelled,
    #[error("staging store: {0}")]
    Staging(#[from] StagingStoreError),
}

impl ProcessingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProcessingError::Validation(_) => ErrorKind::Validation,
            ProcessingError::Configuration(_) => ErrorKind::Configuration,
            ProcessingError::Transcription(_) | ProcessingError::Summarization(_) => {
                ErrorKind::UpstreamService
            }
            ProcessingError::TranscriptionFailed { .. } => ErrorKind::TranscriptionFailed,
            ProcessingError::Timeout { .. } => ErrorKind::Timeout,
            ProcessingError::Cancelled => ErrorKind::Cancelled,
            ProcessingError::Staging(_) => ErrorKind::Internal,
        }
    }
}
