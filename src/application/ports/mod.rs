mod llm_client;
mod staging_store;
mod transcription_service;

pub use llm_client::{LlmClient, LlmClientError};
pub use staging_store::{StagingStore, StagingStoreError};
pub use transcription_service::{
    TranscriptRequest, TranscriptionFeatures, TranscriptionService, TranscriptionServiceError,
};
