use std::fmt;

use serde_json::Value;

use super::TranscriptionStatus;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TranscriptId(String);

impl TranscriptId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TranscriptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Snapshot of a transcription job as last reported by the service.
/// The raw payload is kept as-is so a terminal snapshot can be returned verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptionJob {
    pub id: TranscriptId,
    pub status: TranscriptionStatus,
    pub payload: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionJobError {
    #[error("payload is missing field `{0}`")]
    MissingField(&'static str),
    #[error("{0}")]
    InvalidStatus(String),
}

impl TranscriptionJob {
    pub fn from_payload(payload: Value) -> Result<Self, TranscriptionJobError> {
        let id = payload
            .get("id")
            .and_then(Value::as_str)
            .ok_or(TranscriptionJobError::MissingField("id"))?;
        let status = payload
            .get("status")
            .and_then(Value::as_str)
            .ok_or(TranscriptionJobError::MissingField("status"))?
            .parse::<TranscriptionStatus>()
            .map_err(TranscriptionJobError::InvalidStatus)?;

        Ok(Self {
            id: TranscriptId::new(id),
            status,
            payload,
        })
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Error message reported by the service for a failed job, if any.
    pub fn service_error(&self) -> Option<&str> {
        self.payload.get("error").and_then(Value::as_str)
    }
}
