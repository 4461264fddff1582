use std::path::{Path, PathBuf};

use super::Config;
use crate::{WindowError, WindowResult};

/// Returns the config directory: `~/.config/uniwin/`.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".config").join("uniwin"))
}

/// Returns the config file path: `~/.config/uniwin/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Tries to load and parse `config.toml`.
pub fn try_load() -> WindowResult<Config> {
    let path =
        config_path().ok_or_else(|| WindowError::Config("could not determine config path".into()))?;
    try_load_from(&path)
}

/// Reads, parses and validates the config file at `path`.
pub fn try_load_from(path: &Path) -> WindowResult<Config> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| WindowError::Config(format!("{}: {e}", path.display())))?;
    let mut config: Config = toml::from_str(&content)
        .map_err(|e| WindowError::Config(format!("{}: {e}", path.display())))?;
    config.validate();
    Ok(config)
}

/// Loads the configuration from disk, falling back to defaults.
///
/// Non-existent files silently return defaults; other errors are logged.
pub fn load() -> Config {
    match config_path() {
        Some(path) => load_from(&path),
        None => Config::default(),
    }
}

/// Like [`load`], for an explicit path.
pub fn load_from(path: &Path) -> Config {
    if !path.exists() {
        return Config::default();
    }
    match try_load_from(path) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("{e}; using defaults");
            Config::default()
        }
    }
}
