use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{ApiKey, TranscriptId, TranscriptionJob};

/// Remote speech-to-text service with an upload / create / poll lifecycle.
#[async_trait]
pub trait TranscriptionService: Send + Sync {
    /// Uploads raw audio bytes and returns a URL the service can transcribe from.
    async fn upload(
        &self,
        api_key: &ApiKey,
        audio: Vec<u8>,
    ) -> Result<String, TranscriptionServiceError>;

    async fn create_transcript(
        &self,
        api_key: &ApiKey,
        request: &TranscriptRequest,
    ) -> Result<TranscriptionJob, TranscriptionServiceError>;

    async fn get_transcript(
        &self,
        api_key: &ApiKey,
        id: &TranscriptId,
    ) -> Result<TranscriptionJob, TranscriptionServiceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionServiceError {
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("service returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Analysis features requested alongside the transcript.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptionFeatures {
    pub speaker_labels: bool,
    pub summarization: bool,
    pub summary_model: String,
    pub summary_type: String,
    pub iab_categories: bool,
}

impl Default for TranscriptionFeatures {
    fn default() -> Self {
        Self {
            speaker_labels: true,
            summarization: true,
            summary_model: "informative".to_string(),
            summary_type: "bullets".to_string(),
            iab_categories: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptRequest {
    pub audio_url: String,
    #[serde(flatten)]
    pub features: TranscriptionFeatures,
}

impl TranscriptRequest {
    pub fn new(audio_url: impl Into<String>, features: TranscriptionFeatures) -> Self {
        Self {
            audio_url: audio_url.into(),
            features,
        }
    }
}
