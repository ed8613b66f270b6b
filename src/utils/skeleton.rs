//! `.env` skeletons: a commit-safe copy of an environment file holding only
//! variable names

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Variable names declared in an environment file, each followed by `=`
///
/// Blank lines, comments and lines without `=` are skipped; a leading
/// `export ` is dropped.
pub fn env_var_names(contents: &str) -> Vec<String> {
    let mut names: Vec<String> = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let line = line.strip_prefix("export ").unwrap_or(line).trim_start();
            line.find('=')
                .map(|idx| format!("{}=", line[..idx].trim_end()))
        })
        .collect();
    names.sort();
    names.dedup();
    names
}

/// Path of the skeleton written for `env_path` (`.env` -> `.env.skeleton`)
pub fn skeleton_path(env_path: &Path) -> PathBuf {
    let mut name = env_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| ".env".into());
    name.push(".skeleton");
    env_path.with_file_name(name)
}

/// Write the skeleton of `env_path` next to it and return its path
pub fn write_skeleton(env_path: &Path) -> io::Result<PathBuf> {
    let contents = fs::read_to_string(env_path)?;
    let out = skeleton_path(env_path);

    let mut body = env_var_names(&contents).join("\n");
    if !body.is_empty() {
        body.push('\n');
    }
    fs::write(&out, body)?;
    Ok(out)
}
