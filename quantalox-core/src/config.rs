//! Configuration management
//!
//! Read from `<data_dir>/settings.json`:
//! ```json
//! {
//!   "databaseFile": "quantalox.duckdb",
//!   "http": { "connectTimeoutSecs": 10, "readTimeoutSecs": 30 },
//!   "lstc": { "baseUrl": "https://www.ls-tc.de" }
//! }
//! ```
//! Every field is optional. Keys this crate does not know are kept on save.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::adapters::{split_url, LSTC_DEFAULT_BASE_URL};
use crate::ports::http::{DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_READ_TIMEOUT_SECS};

pub const SETTINGS_FILE: &str = "settings.json";
pub const DEFAULT_DATABASE_FILE: &str = "quantalox.duckdb";

pub const DATABASE_FILE_ENV: &str = "QX_DATABASE_FILE";
pub const LSTC_BASE_URL_ENV: &str = "QX_LSTC_BASE_URL";
pub const HTTP_CONNECT_TIMEOUT_ENV: &str = "QX_HTTP_CONNECT_TIMEOUT";
pub const HTTP_READ_TIMEOUT_ENV: &str = "QX_HTTP_READ_TIMEOUT";

/// Keys accepted by [`Config::get`] and [`Config::set`], in settings.json notation
pub const CONFIG_KEYS: [&str; 4] = [
    "databaseFile",
    "http.connectTimeoutSecs",
    "http.readTimeoutSecs",
    "lstc.baseUrl",
];

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    database_file: Option<String>,
    #[serde(default)]
    http: HttpSettings,
    #[serde(default)]
    lstc: LsTcSettings,
    #[serde(flatten)]
    other: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HttpSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    connect_timeout_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    read_timeout_secs: Option<u64>,
    #[serde(flatten)]
    other: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LsTcSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    base_url: Option<String>,
    #[serde(flatten)]
    other: Map<String, Value>,
}

/// Quantalox configuration (resolved view of settings + environment)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_file: String,
    pub http_connect_timeout_secs: u64,
    pub http_read_timeout_secs: u64,
    pub lstc_base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_file: DEFAULT_DATABASE_FILE.to_string(),
            http_connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            http_read_timeout_secs: DEFAULT_READ_TIMEOUT_SECS,
            lstc_base_url: LSTC_DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl Config {
    /// Load config from the data directory, then apply `QX_*` overrides
    pub fn load(data_dir: &Path) -> Result<Self> {
        Self::load_with_env(data_dir, |name| std::env::var(name).ok())
    }

    /// Load with a custom environment lookup
    pub fn load_with_env<F>(data_dir: &Path, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw = read_settings(data_dir)?;
        let defaults = Self::default();

        let mut config = Self {
            database_file: raw.database_file.unwrap_or(defaults.database_file),
            http_connect_timeout_secs: raw
                .http
                .connect_timeout_secs
                .unwrap_or(defaults.http_connect_timeout_secs),
            http_read_timeout_secs: raw
                .http
                .read_timeout_secs
                .unwrap_or(defaults.http_read_timeout_secs),
            lstc_base_url: raw.lstc.base_url.unwrap_or(defaults.lstc_base_url),
        };

        if let Some(file) = env(DATABASE_FILE_ENV).filter(|v| !v.is_empty()) {
            config.database_file = file;
        }
        if let Some(url) = env(LSTC_BASE_URL_ENV).filter(|v| !v.is_empty()) {
            config.lstc_base_url = url;
        }
        if let Some(secs) = parse_secs(HTTP_CONNECT_TIMEOUT_ENV, env(HTTP_CONNECT_TIMEOUT_ENV)) {
            config.http_connect_timeout_secs = secs;
        }
        if let Some(secs) = parse_secs(HTTP_READ_TIMEOUT_ENV, env(HTTP_READ_TIMEOUT_ENV)) {
            config.http_read_timeout_secs = secs;
        }

        Ok(config)
    }

    /// Load `settings.json` alone, ignoring `QX_*` overrides
    ///
    /// Use this before [`Config::save`] so overrides never get persisted.
    pub fn load_file(data_dir: &Path) -> Result<Self> {
        Self::load_with_env(data_dir, |_| None)
    }

    /// Current value of a settings key; `None` for unknown keys
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "databaseFile" => Some(self.database_file.clone()),
            "http.connectTimeoutSecs" => Some(self.http_connect_timeout_secs.to_string()),
            "http.readTimeoutSecs" => Some(self.http_read_timeout_secs.to_string()),
            "lstc.baseUrl" => Some(self.lstc_base_url.clone()),
            _ => None,
        }
    }

    /// Set one field from its settings key and a string value
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            "databaseFile" => {
                if value.is_empty() {
                    bail!("databaseFile cannot be empty");
                }
                self.database_file = value.to_string();
            }
            "http.connectTimeoutSecs" => {
                self.http_connect_timeout_secs = parse_timeout(key, value)?;
            }
            "http.readTimeoutSecs" => {
                self.http_read_timeout_secs = parse_timeout(key, value)?;
            }
            "lstc.baseUrl" => {
                split_url(value).with_context(|| format!("Invalid value for {}", key))?;
                self.lstc_base_url = value.trim_end_matches('/').to_string();
            }
            _ => bail!(
                "Unknown config key '{}' (expected one of: {})",
                key,
                CONFIG_KEYS.join(", ")
            ),
        }
        Ok(())
    }

    /// Save config to the data directory
    /// Preserves other settings that this crate doesn't manage
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let settings_path = data_dir.join(SETTINGS_FILE);

        // Load existing settings to preserve fields we don't manage
        let mut settings = read_settings(data_dir)?;

        settings.database_file = Some(self.database_file.clone());
        settings.http.connect_timeout_secs = Some(self.http_connect_timeout_secs);
        settings.http.read_timeout_secs = Some(self.http_read_timeout_secs);
        settings.lstc.base_url = Some(self.lstc_base_url.clone());

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)
            .with_context(|| format!("Failed to write {}", settings_path.display()))?;
        Ok(())
    }
}

fn read_settings(data_dir: &Path) -> Result<SettingsFile> {
    let settings_path = data_dir.join(SETTINGS_FILE);
    if !settings_path.exists() {
        return Ok(SettingsFile::default());
    }

    let content = std::fs::read_to_string(&settings_path)
        .with_context(|| format!("Failed to read {}", settings_path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid settings file {}", settings_path.display()))
}

fn parse_timeout(key: &str, value: &str) -> Result<u64> {
    match value.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => bail!("{} must be a positive number of seconds, got '{}'", key, value),
    }
}

fn parse_secs(name: &str, value: Option<String>) -> Option<u64> {
    let value = value?;
    match value.trim().parse::<u64>() {
        Ok(secs) => Some(secs),
        Err(_) => {
            warn!(variable = name, value = %value, "ignoring non-numeric timeout override");
            None
        }
    }
}
