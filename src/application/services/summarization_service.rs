use std::sync::Arc;

use crate::application::ports::LlmClient;
use crate::domain::ApiKey;

use super::ProcessingError;

pub const DEFAULT_FALLBACK_SUMMARY: &str = "No summary returned.";

/// Relays transcript text to the generative-text service.
pub struct SummarizationService {
    llm_client: Arc<dyn LlmClient>,
    api_key: Option<ApiKey>,
    fallback_summary: String,
}

impl SummarizationService {
    pub fn new(llm_client: Arc<dyn LlmClient>, api_key: Option<ApiKey>) -> Self {
        Self {
            llm_client,
            api_key,
            fallback_summary: DEFAULT_FALLBACK_SUMMARY.to_string(),
        }
    }

    pub fn with_fallback_summary(mut self, fallback_summary: impl Into<String>) -> Self {
        self.fallback_summary = fallback_summary.into();
        self
    }

    /// The credential is checked before the input. A response without
    /// candidate text yields the fallback summary instead of an error.
    pub async fn summarize(&self, input_text: Option<&str>) -> Result<String, ProcessingError> {
        let api_key = self.api_key.as_ref().ok_or_else(|| {
            tracing::warn!("Summarization requested without a Gemini API key");
            ProcessingError::Configuration("Gemini API key not configured.".to_string())
        })?;

        let text = input_text
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ProcessingError::Validation("No text provided.".to_string()))?;

        match self.llm_client.generate(api_key, text).await? {
            Some(summary) if !summary.is_empty() => {
                tracing::info!(chars = summary.len(), "Summary generated");
                Ok(summary)
            }
            _ => {
                tracing::info!("No candidate text in summarization response, using fallback");
                Ok(self.fallback_summary.clone())
            }
        }
    }
}
