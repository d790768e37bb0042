//! Settings sections of the editor configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where plugin modules are looked up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginSettings {
    /// Extra directories, scanned in order before the default ones
    #[serde(default)]
    pub search_paths: Vec<PathBuf>,

    /// Also scan the per-user and system plugin directories
    #[serde(default = "default_true")]
    pub include_default_dirs: bool,

    /// Module file extension; defaults to the platform's dynamic library one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library_extension: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Default for PluginSettings {
    fn default() -> Self {
        Self {
            search_paths: Vec::new(),
            include_default_dirs: true,
            library_extension: None,
        }
    }
}

impl PluginSettings {
    /// Search paths in scan order: configured ones first, then the defaults.
    pub fn effective_search_paths(&self) -> Vec<PathBuf> {
        let mut paths = self.search_paths.clone();
        if self.include_default_dirs {
            if let Some(dir) = super::user_plugin_dir() {
                paths.push(dir);
            }
            paths.push(PathBuf::from(super::SYSTEM_PLUGIN_DIR));
        }
        paths
    }

    /// Extension of module files, without the leading dot.
    pub fn library_extension(&self) -> String {
        self.library_extension
            .as_deref()
            .map(|ext| ext.trim_start_matches('.'))
            .unwrap_or(std::env::consts::DLL_EXTENSION)
            .to_string()
    }
}

/// What the element catalog contains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// Seed the catalog with the built-in elements
    #[serde(default = "default_true")]
    pub include_builtins: bool,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            include_builtins: true,
        }
    }
}
