mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    AssemblyAiSettings, GeminiSettings, LoggingSettings, PollingSettings, ServerSettings,
    Settings, StagingSettings,
};
