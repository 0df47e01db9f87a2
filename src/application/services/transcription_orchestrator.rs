use std::sync::Arc;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::application::ports::{
    StagingStore, TranscriptRequest, TranscriptionFeatures, TranscriptionService,
};
use crate::domain::{
    ApiKey, AudioSubmission, TranscriptResult, TranscriptionJob, TranscriptionStatus,
};

use super::{PollPolicy, ProcessingError, assemble_transcript};

/// Drives one submission through upload, job creation and polling.
pub struct TranscriptionOrchestrator {
    service: Arc<dyn TranscriptionService>,
    staging_store: Arc<dyn StagingStore>,
    api_key: Option<ApiKey>,
    features: TranscriptionFeatures,
    poll_policy: PollPolicy,
}

impl TranscriptionOrchestrator {
    pub fn new(
        service: Arc<dyn TranscriptionService>,
        staging_store: Arc<dyn StagingStore>,
        api_key: Option<ApiKey>,
        poll_policy: PollPolicy,
    ) -> Self {
        Self {
            service,
            staging_store,
            api_key,
            features: TranscriptionFeatures::default(),
            poll_policy,
        }
    }

    pub fn with_features(mut self, features: TranscriptionFeatures) -> Self {
        self.features = features;
        self
    }

    /// Transcribes `submission` and returns the completed result.
    ///
    /// Fails with `Configuration` before any network call when no API key is
    /// configured. Stops with `Cancelled` as soon as `cancel` fires.
    #[tracing::instrument(skip_all, fields(submission = submission.kind()))]
    pub async fn transcribe(
        &self,
        submission: &AudioSubmission,
        cancel: &CancellationToken,
    ) -> Result<TranscriptResult, ProcessingError> {
        let api_key = self.api_key.as_ref().ok_or_else(|| {
            tracing::warn!("Transcription requested without an AssemblyAI API key");
            ProcessingError::Configuration("AssemblyAI API key not configured.".to_string())
        })?;

        let job = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!("Transcription cancelled");
                return Err(ProcessingError::Cancelled);
            }
            job = self.run(api_key, submission) => job?,
        };

        match job.status {
            TranscriptionStatus::Completed => {
                let transcript_id = job.id;
                let result = assemble_transcript(job.payload)?;
                tracing::info!(
                    transcript_id = %transcript_id,
                    utterances = result.utterances.as_ref().map_or(0, Vec::len),
                    topics = result.topics().map_or(0, |t| t.len()),
                    "Transcription completed"
                );
                Ok(result)
            }
            _ => {
                let reason = job.service_error().map(str::to_string);
                tracing::warn!(
                    transcript_id = %job.id,
                    reason = reason.as_deref().unwrap_or("unknown"),
                    "Transcription failed"
                );
                Err(ProcessingError::TranscriptionFailed {
                    reason,
                    payload: job.payload,
                })
            }
        }
    }

    async fn run(
        &self,
        api_key: &ApiKey,
        submission: &AudioSubmission,
    ) -> Result<TranscriptionJob, ProcessingError> {
        let audio_url = self.resolve_audio_url(api_key, submission).await?;

        let request = TranscriptRequest::new(audio_url, self.features.clone());
        let job = self.service.create_transcript(api_key, &request).await?;

        tracing::info!(
            transcript_id = %job.id,
            status = %job.status,
            "Transcription job created"
        );

        self.poll_until_terminal(api_key, job).await
    }

    async fn resolve_audio_url(
        &self,
        api_key: &ApiKey,
        submission: &AudioSubmission,
    ) -> Result<String, ProcessingError> {
        match submission {
            AudioSubmission::Upload {
                staged_path,
                mime_type,
            } => {
                let audio = self.staging_store.fetch(staged_path).await?;
                tracing::debug!(
                    bytes = audio.len(),
                    mime_type = %mime_type,
                    "Uploading staged audio"
                );
                let upload_url = self.service.upload(api_key, audio).await?;
                Ok(upload_url)
            }
            AudioSubmission::UrlReference { source_url } => Ok(source_url.clone()),
        }
    }

    /// Re-fetches the job until its status is terminal. A job that is
    /// already terminal is returned without any poll.
    async fn poll_until_terminal(
        &self,
        api_key: &ApiKey,
        mut job: TranscriptionJob,
    ) -> Result<TranscriptionJob, ProcessingError> {
        let started = Instant::now();
        // A timeout too large to represent means no deadline.
        let deadline = started.checked_add(self.poll_policy.timeout);
        let mut attempts: u32 = 0;

        while !job.is_terminal() {
            if attempts >= self.poll_policy.max_attempts {
                tracing::warn!(attempts, "Poll attempt budget exhausted");
                return Err(ProcessingError::Timeout {
                    attempts,
                    elapsed: started.elapsed(),
                });
            }

            let delay = self.poll_policy.delay_before(attempts);
            let poll = async {
                tokio::time::sleep(delay).await;
                self.service.get_transcript(api_key, &job.id).await
            };

            let next = match deadline {
                Some(deadline) => tokio::time::timeout_at(deadline, poll)
                    .await
                    .map_err(|_| {
                        tracing::warn!(attempts, "Poll deadline exceeded");
                        ProcessingError::Timeout {
                            attempts,
                            elapsed: started.elapsed(),
                        }
                    })??,
                None => poll.await?,
            };
            attempts += 1;

            tracing::debug!(
                transcript_id = %next.id,
                status = %next.status,
                attempt = attempts,
                "Polled transcription job"
            );
            job = next;
        }

        Ok(job)
    }
}
