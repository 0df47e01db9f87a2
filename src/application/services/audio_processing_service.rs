use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::domain::TranscriptResult;

use super::{IngressHandler, IngressRequest, ProcessingError, TranscriptionOrchestrator};

/// One transcription round trip: validate, transcribe, release staging.
pub struct AudioProcessingService {
    ingress: Arc<IngressHandler>,
    orchestrator: TranscriptionOrchestrator,
}

impl AudioProcessingService {
    pub fn new(ingress: Arc<IngressHandler>, orchestrator: TranscriptionOrchestrator) -> Self {
        Self {
            ingress,
            orchestrator,
        }
    }

    pub fn ingress(&self) -> &IngressHandler {
        &self.ingress
    }

    pub async fn process(
        &self,
        request: IngressRequest,
        cancel: &CancellationToken,
    ) -> Result<TranscriptResult, ProcessingError> {
        let staged = self.ingress.accept(request).await?;

        let result = self
            .orchestrator
            .transcribe(staged.submission(), cancel)
            .await;

        staged.release().await;
        result
    }
}
