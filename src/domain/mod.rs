mod api_key;
mod audio_submission;
mod storage_path;
mod transcript_result;
mod transcription_job;
mod transcription_status;

pub use api_key::ApiKey;
pub use audio_submission::AudioSubmission;
pub use storage_path::{StoragePath, UploadId};
pub use transcript_result::{IabCategories, TranscriptResult, Utterance};
pub use transcription_job::{TranscriptId, TranscriptionJob, TranscriptionJobError};
pub use transcription_status::TranscriptionStatus;
