mod assembly_ai_client;

pub use assembly_ai_client::{ASSEMBLY_AI_BASE_URL, AssemblyAiClient, UploadResponse};
