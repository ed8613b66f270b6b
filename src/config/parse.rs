//! Configuration file parsing and discovery

use crate::config::types::Config;
use crate::error::{ConfigError, ConfigResult, DevtaskError};
use directories::ProjectDirs;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file names to search for
pub const CONFIG_FILE_NAMES: &[&str] = &["devtask.yml", "devtask.yaml"];

/// Find the configuration file by searching current and parent directories,
/// then the user configuration directory
pub fn find_config_file() -> ConfigResult<PathBuf> {
    let cwd = env::current_dir().map_err(|e| {
        ConfigError::Invalid(format!("Failed to get current directory: {}", e))
    })?;

    match find_config_file_from(cwd) {
        Err(ConfigError::NotFound(searched)) => match user_config_dir() {
            Some(dir) => find_config_file_in(&dir).ok_or_else(|| {
                ConfigError::NotFound(format!("{}, {}", searched, dir.display()))
            }),
            None => Err(ConfigError::NotFound(searched)),
        },
        found => found,
    }
}

/// Find the configuration file starting from a specific directory
pub fn find_config_file_from(start_dir: PathBuf) -> ConfigResult<PathBuf> {
    let mut current_dir = start_dir;
    let mut searched_paths = Vec::new();

    loop {
        if let Some(found) = find_config_file_in(&current_dir) {
            return Ok(found);
        }
        searched_paths.push(current_dir.display().to_string());

        // Try parent directory
        match current_dir.parent() {
            Some(parent) => current_dir = parent.to_path_buf(),
            None => {
                // Reached root without finding config
                return Err(ConfigError::NotFound(searched_paths.join(", ")));
            }
        }
    }
}

/// Look for a config file directly inside `dir`
fn find_config_file_in(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// Per-user fallback location (e.g. `~/.config/devtask` on Linux)
pub fn user_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "devtask").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Parse a configuration file from a path
pub fn parse_config_file(path: &Path) -> Result<Config, DevtaskError> {
    let contents = fs::read_to_string(path).map_err(|e| {
        ConfigError::Invalid(format!("Failed to read {}: {}", path.display(), e))
    })?;

    parse_config(&contents)
}

/// Parse configuration from a string
///
/// The document goes through [`serde_yaml::Value`] first so duplicate keys
/// (two tasks with the same name) are rejected instead of silently overwritten.
pub fn parse_config(yaml: &str) -> Result<Config, DevtaskError> {
    let value: serde_yaml::Value = serde_yaml::from_str(yaml)?;
    if value.is_null() {
        return Ok(Config::default());
    }
    let config: Config = serde_yaml::from_value(value)?;
    Ok(config)
}

/// Parse configuration with automatic file discovery
pub fn parse_config_auto() -> Result<(Config, PathBuf), DevtaskError> {
    let config_path = find_config_file()?;
    let config = parse_config_file(&config_path)?;
    Ok((config, config_path))
}
