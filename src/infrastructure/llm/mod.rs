mod gemini_client;

pub use gemini_client::{GEMINI_BASE_URL, GEMINI_DEFAULT_MODEL, GeminiClient, GenerateContentResponse};
