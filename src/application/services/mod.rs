mod audio_processing_service;
mod ingress_handler;
mod poll_policy;
mod processing_error;
mod result_assembler;
mod summarization_service;
mod transcription_orchestrator;

pub use audio_processing_service::AudioProcessingService;
pub use ingress_handler::{IngressHandler, IngressRequest, StagedSubmission, StagedUpload};
pub use poll_policy::PollPolicy;
pub use processing_error::{ErrorKind, ProcessingError};
pub use result_assembler::assemble_transcript;
pub use summarization_service::{DEFAULT_FALLBACK_SUMMARY, SummarizationService};
pub use transcription_orchestrator::TranscriptionOrchestrator;
