//! Configuration for the Fyre pipeline editor core.
//!
//! # App Data Location
//!
//! Configuration, logs and user plugins live in the platform data directory:
//! - **Linux**: `~/.local/share/org.fyre.pipeline/`
//! - **macOS**: `~/Library/Application Support/org.fyre.pipeline/`
//! - **Windows**: `%APPDATA%\org.fyre.pipeline\`
//!
//! # Files
//!
//! - `config.toml` - Plugin search paths and catalog options
//! - `plugins/` - Per-user plugin modules, searched by default
//! - `logs/` - Daily log files
//!
//! # Example
//!
//! ```toml
//! version = 1
//!
//! [plugins]
//! search_paths = ["/opt/fyre/plugins"]
//! include_default_dirs = true
//!
//! [catalog]
//! include_builtins = true
//! ```

pub mod settings;

pub use settings::*;

use crate::error::{FyreError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application identifier for data directories
pub const APP_ID: &str = "org.fyre.pipeline";

/// Config filename
pub const CONFIG_FILE: &str = "config.toml";

/// Per-user plugin directory name, inside the app data directory
pub const PLUGINS_DIR: &str = "plugins";

/// Log directory name, inside the app data directory
pub const LOG_DIR: &str = "logs";

/// System-wide plugin directory
#[cfg(unix)]
pub const SYSTEM_PLUGIN_DIR: &str = "/usr/lib/fyre/plugins";
#[cfg(not(unix))]
pub const SYSTEM_PLUGIN_DIR: &str = "C:\\Program Files\\Fyre\\plugins";

/// Current config file version
pub const CONFIG_VERSION: u32 = 1;

// ==================== App Data Directory ====================

/// Get the application data directory path
pub fn app_data_dir() -> Option<PathBuf> {
    dirs_next::data_dir().map(|p| p.join(APP_ID))
}

/// Ensure the app data directory exists
pub fn ensure_app_data_dir() -> Result<PathBuf> {
    let dir = app_data_dir().ok_or_else(|| {
        FyreError::Config("Could not determine app data directory".to_string())
    })?;

    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| {
            FyreError::Config(format!("Failed to create app data directory: {}", e))
        })?;
    }

    Ok(dir)
}

/// Get the path to the config file
pub fn config_path() -> Option<PathBuf> {
    app_data_dir().map(|p| p.join(CONFIG_FILE))
}

/// Get the per-user plugin directory
pub fn user_plugin_dir() -> Option<PathBuf> {
    app_data_dir().map(|p| p.join(PLUGINS_DIR))
}

/// Get the log directory
pub fn log_dir() -> Option<PathBuf> {
    app_data_dir().map(|p| p.join(LOG_DIR))
}

// ==================== Editor Config ====================

/// Editor configuration persisted as `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// File format version
    #[serde(default = "default_config_version")]
    pub version: u32,

    #[serde(default)]
    pub plugins: PluginSettings,

    #[serde(default)]
    pub catalog: CatalogSettings,
}

fn default_config_version() -> u32 {
    CONFIG_VERSION
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            plugins: PluginSettings::default(),
            catalog: CatalogSettings::default(),
        }
    }
}

impl EditorConfig {
    /// Load config from the default location
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        let path = config_path().ok_or_else(|| {
            FyreError::Config("Could not determine config path".to_string())
        })?;

        if !path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load config from a specific file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| FyreError::Config(format!("Failed to read config: {}", e)))?;

        toml::from_str(&content).map_err(|e| {
            FyreError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Load config, returning defaults on any error
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        let dir = ensure_app_data_dir()?;
        self.save_to(dir.join(CONFIG_FILE))
    }

    /// Save config to a specific file
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| FyreError::Serialization(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path.as_ref(), content)
            .map_err(|e| FyreError::Config(format!("Failed to write config: {}", e)))
    }
}
