use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url_validator_core::DEFAULT_QUIET;
use url_validator_engine::ProbeSettings;
use validator_logging::{validator_info, validator_warn};

use super::logging::LogDestination;
use crate::AppError;

const CONFIG_FILENAME: &str = "url_validator.ron";
const CONFIG_ENV: &str = "URL_VALIDATOR_CONFIG";

/// Tunables read from `url_validator.ron`. Missing fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub debounce_ms: u64,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub redirect_limit: usize,
    pub log_destination: LogDestination,
}

impl Default for AppConfig {
    fn default() -> Self {
        let probe = ProbeSettings::default();
        Self {
            debounce_ms: DEFAULT_QUIET.as_millis() as u64,
            connect_timeout_ms: probe.connect_timeout.as_millis() as u64,
            request_timeout_ms: probe.request_timeout.as_millis() as u64,
            redirect_limit: probe.redirect_limit,
            log_destination: LogDestination::default(),
        }
    }
}

impl AppConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn probe_settings(&self) -> ProbeSettings {
        ProbeSettings {
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            redirect_limit: self.redirect_limit,
        }
    }
}

/// `$URL_VALIDATOR_CONFIG` if set, else `./url_validator.ron`.
pub fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(".").join(CONFIG_FILENAME))
}

pub fn parse_config(text: &str) -> Result<AppConfig, AppError> {
    Ok(ron::from_str(text)?)
}

/// Reads the config file, falling back to defaults when it is missing or unreadable.
pub fn load_config(path: &Path) -> AppConfig {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return AppConfig::default();
        }
        Err(err) => {
            validator_warn!("Failed to read config from {:?}: {}", path, err);
            return AppConfig::default();
        }
    };

    match parse_config(&content) {
        Ok(config) => {
            validator_info!("Loaded config from {:?}", path);
            config
        }
        Err(err) => {
            validator_warn!("Failed to parse config from {:?}: {}", path, err);
            AppConfig::default()
        }
    }
}
