mod error_response;
mod health;
mod process_audio;
mod process_audio_url;
mod summarize;

pub use error_response::ErrorResponse;
pub use health::health_handler;
pub use process_audio::process_audio_handler;
pub use process_audio_url::{ProcessAudioUrlRequest, process_audio_url_handler};
pub use summarize::{SummarizeRequest, SummarizeResponse, summarize_handler};
