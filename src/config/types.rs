//! Core configuration types
//!
//! This module defines the data structures that represent a devtask.yml configuration file.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Environment file loaded when the config does not name one
pub const DEFAULT_DOTENV: &str = ".env";

/// Top-level configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Application name (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Application usage description (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,

    /// Global interpreter to use for shell-form commands (e.g., ["sh", "-c"])
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpreter: Option<Vec<String>>,

    /// Environment file to load before resolving variables
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dotenv: Option<String>,

    /// Fail when the environment file is missing
    #[serde(rename = "dotenv-required", default)]
    pub dotenv_required: bool,

    /// Variables shared by every task
    #[serde(
        default,
        skip_serializing_if = "HashMap::is_empty",
        deserialize_with = "deserialize_vars"
    )]
    pub vars: HashMap<String, Variable>,

    /// Tasks defined in the configuration
    #[serde(default)]
    pub tasks: HashMap<String, Task>,
}

impl Config {
    /// Names of tasks shown in listings and help, sorted
    pub fn public_task_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .tasks
            .iter()
            .filter(|(_, task)| !task.private)
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }
}

/// A task definition
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Task {
    /// Usage description for help text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,

    /// Longer description for help text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Whether this task is private (hidden from help)
    #[serde(default)]
    pub private: bool,

    /// Whether this task should run quietly
    #[serde(default)]
    pub quiet: bool,

    /// Tasks that must succeed before this one, in order
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "deserialize_names"
    )]
    pub deps: Vec<String>,

    /// Commands to execute
    #[serde(default, deserialize_with = "deserialize_commands")]
    pub run: Vec<Command>,
}

/// A command to execute
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Command {
    /// Shell command string
    Simple(String),

    /// Program and arguments spawned without a shell
    Tokens(Vec<String>),

    /// Shell command with additional options
    Complex(CommandDetail),
}

/// Detailed command specification
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CommandDetail {
    /// The command to execute
    pub exec: String,

    /// What to print when running (defaults to exec)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub print: Option<String>,

    /// Whether to suppress the echo line
    #[serde(default)]
    pub quiet: bool,

    /// Working directory for the command
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

/// A variable definition
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Variable {
    /// Fixed string value
    Value(String),

    /// Value read from an environment variable
    Env {
        env: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default: Option<String>,
    },

    /// Trimmed standard output of a shell command
    Command { command: String },
}

/// Custom deserializer for commands that handles both single values and arrays
fn deserialize_commands<'de, D>(deserializer: D) -> Result<Vec<Command>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    use serde_yaml::Value;

    let value = Value::deserialize(deserializer)?;

    match value {
        // Single string or complex command
        Value::String(s) => Ok(vec![Command::Simple(s)]),
        Value::Mapping(_) => {
            let cmd = Command::deserialize(value).map_err(D::Error::custom)?;
            Ok(vec![cmd])
        }
        // Array of commands
        Value::Sequence(seq) => seq
            .into_iter()
            .map(|item| Command::deserialize(item).map_err(D::Error::custom))
            .collect(),
        // Null or not present
        Value::Null => Ok(Vec::new()),
        _ => Err(D::Error::custom("run must be a string, object, or array")),
    }
}

/// Custom deserializer for variables that accepts bare numbers and booleans as fixed values
fn deserialize_vars<'de, D>(deserializer: D) -> Result<HashMap<String, Variable>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    use serde_yaml::Value;

    let raw = HashMap::<String, Value>::deserialize(deserializer)?;

    raw.into_iter()
        .map(|(name, value)| {
            let var = match value {
                Value::Bool(b) => Variable::Value(b.to_string()),
                Value::Number(n) => Variable::Value(n.to_string()),
                other => Variable::deserialize(other)
                    .map_err(|e| D::Error::custom(format!("variable '{}': {}", name, e)))?,
            };
            Ok((name, var))
        })
        .collect()
}

/// Accepts `deps: lint` as shorthand for `deps: [lint]`
fn deserialize_names<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    use serde_yaml::Value;

    let value = Value::deserialize(deserializer)?;

    match value {
        Value::String(s) => Ok(vec![s]),
        Value::Sequence(_) => Vec::<String>::deserialize(value).map_err(D::Error::custom),
        Value::Null => Ok(Vec::new()),
        _ => Err(D::Error::custom("deps must be a task name or a list of task names")),
    }
}
