//! Environment-sourced configuration and source-catalog loading

use base64::{engine::general_purpose, Engine as _};
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::models::Source;

/// Process configuration, built once at startup and passed by reference
/// into the components that need it
#[derive(Debug, Clone)]
pub struct Settings {
    pub todoist_api_key: String,
    /// Chat notification credentials; `None` disables chat entirely
    pub telegram: Option<TelegramSettings>,
    /// Source names skipped during a normal all-sources run
    pub disabled_sources: Vec<String>,
    /// Location of the seen-episode database file
    pub database_path: PathBuf,
    pub log_level: tracing::Level,
}

#[derive(Debug, Clone)]
pub struct TelegramSettings {
    pub token: String,
    pub chat_id: String,
}

impl Settings {
    /// Build settings from the process environment.
    ///
    /// `TODOIST_API_KEY` is required. `TELEGRAM_TOKEN` and
    /// `TELEGRAM_CHAT_ID` must be set together or not at all.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            todoist_api_key: getenv_required("TODOIST_API_KEY")?,
            telegram: telegram_from_env()?,
            disabled_sources: disabled_sources_from_env(),
            database_path: database_path_from_env(),
            log_level: log_level_from_env()?,
        })
    }

    pub fn telegram_enabled(&self) -> bool {
        self.telegram.is_some()
    }
}

/// Read an environment variable, treating unset and empty the same way
fn getenv(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn getenv_required(name: &str) -> Result<String> {
    getenv(name).ok_or_else(|| Error::Config(format!("Environment variable '{}' not set", name)))
}

fn telegram_from_env() -> Result<Option<TelegramSettings>> {
    match (getenv("TELEGRAM_TOKEN"), getenv("TELEGRAM_CHAT_ID")) {
        (Some(token), Some(chat_id)) => Ok(Some(TelegramSettings { token, chat_id })),
        (None, None) => Ok(None),
        _ => Err(Error::Config(
            "Must set both TELEGRAM_TOKEN and TELEGRAM_CHAT_ID or neither.".to_string(),
        )),
    }
}

fn disabled_sources_from_env() -> Vec<String> {
    getenv("DISABLED_SOURCES")
        .map(|value| {
            value
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

fn database_path_from_env() -> PathBuf {
    if let Some(path) = getenv("DATABASE_PATH") {
        return PathBuf::from(path);
    }
    dirs::data_local_dir()
        .map(|d| d.join("episode-tracker"))
        .unwrap_or_else(|| PathBuf::from("./episode-tracker"))
        .join("state.db")
}

fn log_level_from_env() -> Result<tracing::Level> {
    let level = getenv("LOG_LEVEL").unwrap_or_else(|| "debug".to_string());
    level
        .parse()
        .map_err(|_| Error::Config(format!("Invalid log level: {}", level)))
}

/// Load the source catalog from the `SOURCES` environment variable:
/// a base64-encoded JSON array of `{"provider", "inputs"}` objects.
pub fn load_sources() -> Result<Vec<Source>> {
    let data = getenv_required("SOURCES")?;
    let decoded = general_purpose::STANDARD
        .decode(data.trim())
        .map_err(|e| Error::Config(format!("SOURCES is not valid base64: {}", e)))?;
    let text = String::from_utf8(decoded)
        .map_err(|e| Error::Config(format!("SOURCES is not valid UTF-8: {}", e)))?;
    parse_sources(&text)
}

fn parse_sources(data: &str) -> Result<Vec<Source>> {
    serde_json::from_str(data).map_err(|e| Error::Config(format!("Invalid source catalog: {}", e)))
}
