use serde_json::Value;

use crate::application::ports::TranscriptionServiceError;
use crate::domain::TranscriptResult;

/// Checks a completed job payload against the response contract. The payload
/// itself is passed through untouched.
pub fn assemble_transcript(payload: Value) -> Result<TranscriptResult, TranscriptionServiceError> {
    TranscriptResult::from_payload(payload).map_err(|e| {
        TranscriptionServiceError::InvalidResponse(format!("transcript payload: {}", e))
    })
}
