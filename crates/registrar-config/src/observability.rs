use crate::{env_flag, env_or};

/// Logging and metrics switches.
#[derive(Clone, Debug)]
pub struct ObservabilityConfig {
    /// When false no Prometheus recorder is installed and file logs are skipped.
    pub enabled: bool,
    pub log_level: String,
    pub log_dir: String,
}

impl ObservabilityConfig {
    pub fn from_env() -> Self {
        Self {
            enabled: env_flag("OBSERVABILITY_ENABLED", true),
            log_level: env_or("LOG_LEVEL", "info".to_string()),
            log_dir: env_or("LOG_DIR", "storage/logs".to_string()),
        }
    }
}
