use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::config::Config;

const APP_DIR_NAME: &str = "chatbar";

/// Get the user data directory for Chatbar
/// - macOS: ~/.chatbar/
/// - Windows: %APPDATA%\chatbar\
/// - Linux: ~/.config/chatbar/
pub fn get_user_data_dir() -> Result<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        let home =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Failed to get home directory"))?;
        Ok(home.join(format!(".{}", APP_DIR_NAME)))
    }

    #[cfg(not(target_os = "macos"))]
    {
        let config =
            dirs::config_dir().ok_or_else(|| anyhow::anyhow!("Failed to get config directory"))?;
        Ok(config.join(APP_DIR_NAME))
    }
}

/// Ensure the user data directory exists
pub fn ensure_user_data_dir() -> Result<PathBuf> {
    let dir = get_user_data_dir()?;
    if !dir.exists() {
        log::info!("Creating user data directory: {:?}", dir);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create directory: {:?}", dir))?;
    }
    Ok(dir)
}

fn fallback_data_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(APP_DIR_NAME);
    if let Err(e) = std::fs::create_dir_all(&dir) {
        log::warn!("Failed to create fallback data directory {:?}: {}", dir, e);
    }
    dir
}

pub fn user_data_dir_or_temp() -> PathBuf {
    match ensure_user_data_dir() {
        Ok(dir) => dir,
        Err(e) => {
            log::warn!("Failed to resolve user data directory: {}", e);
            fallback_data_dir()
        }
    }
}

/// Write a default config file at `path` unless one already exists
pub fn ensure_default_config_at(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
    }
    std::fs::write(path, Config::default().to_json()?)
        .with_context(|| format!("Failed to write config file: {:?}", path))?;
    log::info!("Wrote default config to {:?}", path);
    Ok(())
}

/// Config file path in the user data directory
pub fn get_user_config_path_or_temp() -> PathBuf {
    user_data_dir_or_temp().join("config.json")
}

/// Conversations file inside a data directory
pub fn conversations_file_in(data_dir: &Path) -> PathBuf {
    data_dir.join("conversations.json")
}

/// Load the config at `path`, writing the default file first if there is none.
///
/// Runs before logging is installed, so failures are returned rather than
/// logged; the caller falls back to `Config::default()` and reports them.
pub fn load_config(path: &Path) -> Result<Config> {
    ensure_default_config_at(path)?;
    Config::load(path)
}
