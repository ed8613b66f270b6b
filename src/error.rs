//! Error types for devtask

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for devtask operations
pub type Result<T> = std::result::Result<T, DevtaskError>;

/// Exit code used when a program cannot be found or spawned
pub const EXIT_NOT_FOUND: i32 = 127;

/// Main error type for devtask
#[derive(Error, Debug)]
pub enum DevtaskError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Task execution errors
    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    /// Variable interpolation errors
    #[error("Interpolation error: {0}")]
    Interpolation(#[from] InterpolationError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// YAML parsing errors
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl DevtaskError {
    /// Process exit code this error should surface as
    pub fn exit_code(&self) -> i32 {
        match self {
            DevtaskError::Execution(e) => e.exit_code(),
            _ => 1,
        }
    }
}

/// Configuration parsing and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to find config file (searched: {0})")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Task '{0}' is not defined")]
    TaskNotFound(String),

    #[error("Task '{task}' depends on undefined task '{dep}'")]
    UnknownPrerequisite { task: String, dep: String },

    #[error("Circular dependency detected: {0}")]
    CircularDependency(String),

    #[error("Variable name '{0}' is reserved")]
    ReservedVariable(String),

    #[error("Refusing to overwrite existing file {0}")]
    AlreadyExists(PathBuf),
}

/// Task execution errors
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Task '{task}' failed: command exited with {}", describe_code(.code))]
    CommandFailed { task: String, code: Option<i32> },

    #[error("Failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Variable '{name}' command failed with {}: {stderr}", describe_code(.code))]
    VariableCommand {
        name: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Environment file {path}: {error}")]
    Environment { path: PathBuf, error: String },

    #[error("Task '{0}' has no interpreter to run shell commands")]
    NoInterpreter(String),
}

impl ExecutionError {
    /// Process exit code this error should surface as
    pub fn exit_code(&self) -> i32 {
        match self {
            ExecutionError::CommandFailed { code: Some(code), .. }
            | ExecutionError::VariableCommand { code: Some(code), .. } => *code,
            ExecutionError::Spawn { source, .. } if source.kind() == io::ErrorKind::NotFound => {
                EXIT_NOT_FOUND
            }
            _ => 1,
        }
    }
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code".to_string(),
    }
}

/// Variable interpolation errors
#[derive(Error, Debug)]
pub enum InterpolationError {
    #[error("Variable '{0}' is not defined")]
    UndefinedVariable(String),

    #[error("Recursive interpolation detected: {0}")]
    RecursiveInterpolation(String),
}

/// Specialized result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Specialized result type for execution operations
pub type ExecutionResult<T> = std::result::Result<T, ExecutionError>;
