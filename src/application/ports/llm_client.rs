use async_trait::async_trait;

use crate::domain::ApiKey;

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Sends `prompt` verbatim and returns the first generated text, if the
    /// service produced one.
    async fn generate(
        &self,
        api_key: &ApiKey,
        prompt: &str,
    ) -> Result<Option<String>, LlmClientError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LlmClientError {
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("rate limited")]
    RateLimited,
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
