//! Environment file loading

use crate::error::{ExecutionError, ExecutionResult};
use std::path::Path;

/// Load `path` into the process environment.
///
/// Variables already set in the environment keep their values. Returns
/// `Ok(false)` when the file is absent and not `required`.
pub fn load_env_file(path: &Path, required: bool) -> ExecutionResult<bool> {
    if !path.is_file() {
        if required {
            return Err(ExecutionError::Environment {
                path: path.to_path_buf(),
                error: "file not found".to_string(),
            });
        }
        return Ok(false);
    }

    dotenvy::from_path(path).map_err(|e| ExecutionError::Environment {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;

    Ok(true)
}
