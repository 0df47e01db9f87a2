use crate::presentation::config::{Environment, LoggingSettings};

pub const DEFAULT_LOG_FILTER: &str = "info,meeting_summarizer=debug,tower_http=debug";

/// Configuration for tracing initialization.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub environment: Environment,
    pub json_format: bool,
    /// Filter used when `RUST_LOG` is not set.
    pub default_filter: String,
}

impl TracingConfig {
    pub fn from_settings(environment: Environment, logging: &LoggingSettings) -> Self {
        let default_filter = if logging.filter.trim().is_empty() {
            DEFAULT_LOG_FILTER.to_string()
        } else {
            logging.filter.clone()
        };
        Self {
            environment,
            json_format: logging.json,
            default_filter,
        }
    }
}
