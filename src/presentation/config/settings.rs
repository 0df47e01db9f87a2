use std::time::Duration;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment as EnvironmentSource, File};
use serde::Deserialize;

use crate::application::services::{DEFAULT_FALLBACK_SUMMARY, PollPolicy};
use crate::infrastructure::llm::{GEMINI_BASE_URL, GEMINI_DEFAULT_MODEL};
use crate::infrastructure::transcription::ASSEMBLY_AI_BASE_URL;

use super::Environment;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub assemblyai: AssemblyAiSettings,
    pub gemini: GeminiSettings,
    pub staging: StagingSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssemblyAiSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub polling: PollingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollingSettings {
    pub initial_interval_ms: u64,
    pub max_interval_ms: u64,
    pub backoff_factor: f64,
    pub max_attempts: u32,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub fallback_summary: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StagingSettings {
    pub local_path: String,
    pub max_upload_mb: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub filter: String,
    pub json: bool,
}

impl Settings {
    /// Defaults, then `appsettings.<env>.toml`, then `APP_*` variables
    /// (`__` between sections), then the bare `PORT`, `ASSEMBLYAI_API_KEY`
    /// and `GEMINI_API_KEY` variables.
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        Self::builder(environment)?
            .add_source(
                EnvironmentSource::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_override_option("server.port", std::env::var("PORT").ok())?
            .set_override_option(
                "assemblyai.api_key",
                std::env::var("ASSEMBLYAI_API_KEY").ok(),
            )?
            .set_override_option("gemini.api_key", std::env::var("GEMINI_API_KEY").ok())?
            .build()?
            .try_deserialize()
    }

    /// Defaults plus the optional per-environment settings file.
    pub fn builder(environment: Environment) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Ok(Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000_i64)?
            .set_default("assemblyai.base_url", ASSEMBLY_AI_BASE_URL)?
            .set_default("assemblyai.request_timeout_secs", 300_i64)?
            .set_default("assemblyai.polling.initial_interval_ms", 5_000_i64)?
            .set_default("assemblyai.polling.max_interval_ms", 60_000_i64)?
            .set_default("assemblyai.polling.backoff_factor", 2.0)?
            .set_default("assemblyai.polling.max_attempts", 100_i64)?
            .set_default("assemblyai.polling.timeout_secs", 3_600_i64)?
            .set_default("gemini.base_url", GEMINI_BASE_URL)?
            .set_default("gemini.model", GEMINI_DEFAULT_MODEL)?
            .set_default("gemini.fallback_summary", DEFAULT_FALLBACK_SUMMARY)?
            .set_default("gemini.request_timeout_secs", 120_i64)?
            .set_default("staging.local_path", "uploads")?
            .set_default("staging.max_upload_mb", 500_i64)?
            .set_default("logging.filter", "")?
            .set_default("logging.json", environment == Environment::Prod)?
            .add_source(File::with_name(&environment.settings_file()).required(false)))
    }
}

impl PollingSettings {
    pub fn to_policy(&self) -> PollPolicy {
        PollPolicy {
            initial_interval: Duration::from_millis(self.initial_interval_ms),
            max_interval: Duration::from_millis(self.max_interval_ms),
            backoff_factor: self.backoff_factor,
            max_attempts: self.max_attempts,
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

impl StagingSettings {
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}
