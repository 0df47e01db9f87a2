use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::Value;

use crate::application::ports::{
    TranscriptRequest, TranscriptionService, TranscriptionServiceError,
};
use crate::domain::{ApiKey, TranscriptId, TranscriptionJob};

pub const ASSEMBLY_AI_BASE_URL: &str = "https://api.assemblyai.com/v2";

pub struct AssemblyAiClient {
    client: Client,
    base_url: String,
}

impl AssemblyAiClient {
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self, TranscriptionServiceError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| TranscriptionServiceError::ApiRequestFailed(format!("client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn read_job(response: Response) -> Result<TranscriptionJob, TranscriptionServiceError> {
        let payload: Value = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| TranscriptionServiceError::InvalidResponse(format!("body: {}", e)))?;

        TranscriptionJob::from_payload(payload)
            .map_err(|e| TranscriptionServiceError::InvalidResponse(e.to_string()))
    }
}

#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    pub upload_url: String,
}

#[async_trait]
impl TranscriptionService for AssemblyAiClient {
    async fn upload(
        &self,
        api_key: &ApiKey,
        audio: Vec<u8>,
    ) -> Result<String, TranscriptionServiceError> {
        let url = format!("{}/upload", self.base_url);
        let bytes = audio.len();

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, api_key.expose())
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(audio)
            .send()
            .await
            .map_err(|e| TranscriptionServiceError::ApiRequestFailed(format!("upload: {}", e)))?;

        let upload: UploadResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| TranscriptionServiceError::InvalidResponse(format!("upload body: {}", e)))?;

        tracing::debug!(bytes, "Audio uploaded to AssemblyAI");

        Ok(upload.upload_url)
    }

    async fn create_transcript(
        &self,
        api_key: &ApiKey,
        request: &TranscriptRequest,
    ) -> Result<TranscriptionJob, TranscriptionServiceError> {
        let url = format!("{}/transcript", self.base_url);

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, api_key.expose())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                TranscriptionServiceError::ApiRequestFailed(format!("create transcript: {}", e))
            })?;

        Self::read_job(response).await
    }

    async fn get_transcript(
        &self,
        api_key: &ApiKey,
        id: &TranscriptId,
    ) -> Result<TranscriptionJob, TranscriptionServiceError> {
        let url = format!("{}/transcript/{}", self.base_url, id);

        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, api_key.expose())
            .send()
            .await
            .map_err(|e| {
                TranscriptionServiceError::ApiRequestFailed(format!("poll transcript: {}", e))
            })?;

        Self::read_job(response).await
    }
}

async fn check_status(response: Response) -> Result<Response, TranscriptionServiceError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "unknown error".to_string());
    Err(TranscriptionServiceError::Status {
        status: status.as_u16(),
        body,
    })
}
