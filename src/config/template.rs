//! Bundled workflow file written by `devtask --init`

use crate::config::parse::CONFIG_FILE_NAMES;
use crate::error::{ConfigError, DevtaskError};
use std::fs;
use std::path::{Path, PathBuf};

/// The default developer workflow
pub const DEFAULT_TEMPLATE: &str = include_str!("../../templates/devtask.yml");

/// Write the bundled workflow into `dir`, refusing to replace an existing config
pub fn write_template(dir: &Path) -> Result<PathBuf, DevtaskError> {
    if let Some(existing) = CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
    {
        return Err(ConfigError::AlreadyExists(existing).into());
    }

    let path = dir.join(CONFIG_FILE_NAMES[0]);
    fs::write(&path, DEFAULT_TEMPLATE)?;
    Ok(path)
}
