use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::application::services::{AudioProcessingService, SummarizationService};

#[derive(Clone)]
pub struct AppState {
    pub audio_processing: Arc<AudioProcessingService>,
    pub summarization: Arc<SummarizationService>,
    /// Cancelled on shutdown; each request polls under a child token.
    pub shutdown: CancellationToken,
    pub max_upload_bytes: usize,
}
