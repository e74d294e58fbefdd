//! Application settings and configuration types.
//!
//! Settings are read from `settings.json` in the platform config directory
//! (`~/.config/sentimeter/` on Linux) and may be overridden by environment
//! variables. A missing file means defaults.

use std::path::{Path, PathBuf};

use chrono::FixedOffset;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Settings file name inside the config directory.
pub const SETTINGS_FILE: &str = "settings.json";

/// Overrides `store.url`.
pub const ENV_STORE_URL: &str = "SENTIMETER_STORE_URL";

/// Overrides `store.api_key`.
pub const ENV_STORE_KEY: &str = "SENTIMETER_STORE_KEY";

/// Errors that can occur while loading settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The settings file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid JSON for [`Settings`].
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The store URL is not an absolute http(s) URL.
    #[error("invalid store url {0:?}")]
    InvalidUrl(String),

    /// No store URL was configured.
    #[error("no store url configured; set store.url in settings.json or SENTIMETER_STORE_URL")]
    MissingStoreUrl,

    /// The UTC offset is outside +/-24h.
    #[error("invalid utc offset: {0} minutes")]
    InvalidOffset(i32),
}

/// Top-level application settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Remote store connection.
    pub store: StoreSettings,
    /// Dashboard behavior.
    pub dashboard: DashboardSettings,
    /// Log output.
    pub logging: LoggingSettings,
}

/// Connection settings for the complaint store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Project or REST root URL.
    pub url: Option<String>,
    /// Project API key (sent as `apikey` and bearer token).
    pub api_key: Option<String>,
    /// Schema to read from, if not `public`.
    pub schema: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            schema: None,
            timeout_secs: 15,
        }
    }
}

/// Dashboard behavior settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    /// Offset from UTC used to decide which calendar day an email falls on.
    pub utc_offset_minutes: i32,
}

impl DashboardSettings {
    /// Returns the configured offset as a chrono timezone.
    pub fn offset(&self) -> Result<FixedOffset, ConfigError> {
        FixedOffset::east_opt(self.utc_offset_minutes * 60)
            .ok_or(ConfigError::InvalidOffset(self.utc_offset_minutes))
    }
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default `tracing` filter directive; `RUST_LOG` takes precedence.
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl Settings {
    /// Returns the default settings file path, if a home directory exists.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("ai", "SentiMeter", "sentimeter")
            .map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
    }

    /// Loads settings from `path`, or the default path when `None`,
    /// then applies environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut settings = match path {
            Some(path) => Self::load_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load_file(&path)?,
                _ => Self::default(),
            },
        };
        settings.apply_env(|key| std::env::var(key).ok());
        Ok(settings)
    }

    /// Reads and parses a settings file.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies overrides from `lookup` (normally the process environment).
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_STORE_URL).filter(|v| !v.trim().is_empty()) {
            self.store.url = Some(url);
        }
        if let Some(key) = lookup(ENV_STORE_KEY).filter(|v| !v.trim().is_empty()) {
            self.store.api_key = Some(key);
        }
    }

    /// Checks that the settings are usable for connecting to the store.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let raw = self
            .store
            .url
            .as_deref()
            .ok_or(ConfigError::MissingStoreUrl)?;
        let url = Url::parse(raw).map_err(|_| ConfigError::InvalidUrl(raw.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl(raw.to_string()));
        }
        self.dashboard.offset()?;
        Ok(())
    }
}
