use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub const DEFAULT_LOG_FILTER: &str = "info";
pub const DEFAULT_LOCALE: &str = "en";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Overrides the directory conversations are stored in
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    #[serde(default = "default_locale")]
    pub locale: String,
    /// Directive string used when `RUST_LOG` is not set
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    #[serde(default)]
    pub sidebar: SidebarConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            locale: default_locale(),
            log_filter: default_log_filter(),
            sidebar: SidebarConfig::default(),
        }
    }
}

/// Sidebar appearance settings
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SidebarConfig {
    /// Small note shown under the title, e.g. where inference runs
    #[serde(default)]
    pub footer_note: Option<String>,
    /// Image shown below the list, e.g. sponsor logos
    #[serde(default)]
    pub footer_image: Option<PathBuf>,
    #[serde(default)]
    pub start_collapsed: bool,
}

fn default_locale() -> String {
    DEFAULT_LOCALE.to_string()
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

impl Config {
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("Failed to parse config")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::from_json(&raw).with_context(|| format!("Invalid config at {:?}", path))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize config")
    }

    /// Directory holding `conversations.json`
    pub fn resolve_data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(crate::config_manager::user_data_dir_or_temp)
    }
}
