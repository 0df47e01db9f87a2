use super::StoragePath;

/// Audio handed to the transcription flow for a single request.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioSubmission {
    Upload {
        staged_path: StoragePath,
        mime_type: String,
    },
    UrlReference {
        source_url: String,
    },
}

impl AudioSubmission {
    pub fn kind(&self) -> &'static str {
        match self {
            AudioSubmission::Upload { .. } => "upload",
            AudioSubmission::UrlReference { .. } => "url_reference",
        }
    }
}
