//! devtask - a declarative YAML task runner
//!
//! Tasks are named in a `devtask.yml` file; each maps to one or more command
//! templates and may name prerequisite tasks that must succeed first.

// Public modules
pub mod cli;
pub mod config;
pub mod error;
pub mod runner;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use error::{DevtaskError, Result};

/// Current version of devtask
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
