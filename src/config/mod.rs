//! Configuration and settings management.
//!
//! This module provides application settings types and loading.
//! Settings are stored in the user's config directory as JSON.

mod settings;

pub use settings::{
    ConfigError, DashboardSettings, LoggingSettings, Settings, StoreSettings, ENV_STORE_KEY,
    ENV_STORE_URL, SETTINGS_FILE,
};
