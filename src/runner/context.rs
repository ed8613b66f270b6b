//! Execution context for task running
//!
//! The context tracks all the state needed during one invocation.

use crate::ui::{self, Verbosity};
use std::env;
use std::path::PathBuf;

/// Interpreter used for shell-form commands when the config names none
pub const DEFAULT_INTERPRETER: &[&str] = &["sh", "-c"];

/// Execution context that tracks state during task execution
#[derive(Debug, Clone)]
pub struct Context {
    /// Directory commands run in (the config file's directory)
    pub working_dir: PathBuf,

    /// Configuration file path
    pub config_path: Option<PathBuf>,

    /// Interpreter for shell-form commands (e.g., ["bash", "-c"])
    pub interpreter: Vec<String>,

    /// Verbosity level
    pub verbosity: Verbosity,

    /// Print resolved commands instead of running them
    pub dry_run: bool,
}

impl Context {
    /// Create a new context with default settings
    pub fn new() -> Self {
        Context {
            working_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_path: None,
            interpreter: DEFAULT_INTERPRETER.iter().map(|s| s.to_string()).collect(),
            verbosity: Verbosity::Normal,
            dry_run: false,
        }
    }

    /// Create a context with a specific working directory
    pub fn with_working_dir(mut self, dir: PathBuf) -> Self {
        self.working_dir = dir;
        self
    }

    /// Set the configuration file path; commands then run next to it
    pub fn with_config_path(mut self, path: PathBuf) -> Self {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.working_dir = parent.to_path_buf();
        }
        self.config_path = Some(path);
        self
    }

    /// Set the interpreter
    pub fn with_interpreter(mut self, interpreter: Vec<String>) -> Self {
        self.interpreter = interpreter;
        self
    }

    /// Set verbosity level
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Get the directory for the config file (or the working dir)
    pub fn config_dir(&self) -> PathBuf {
        self.config_path
            .as_ref()
            .and_then(|p| p.parent())
            .filter(|p| !p.as_os_str().is_empty())
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| self.working_dir.clone())
    }

    pub fn print_info(&self, message: &str) {
        ui::print_info(self.verbosity, message);
    }

    pub fn print_debug(&self, message: &str) {
        ui::print_debug(self.verbosity, message);
    }

    /// Print task start message
    pub fn print_task_start(&self, task_name: &str) {
        self.print_debug(&format!("Running task: {}", task_name));
    }

    /// Print task complete message
    pub fn print_task_complete(&self, task_name: &str) {
        self.print_debug(&format!("Task completed: {}", task_name));
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_new() {
        let ctx = Context::new();
        assert_eq!(ctx.verbosity, Verbosity::Normal);
        assert_eq!(ctx.interpreter, vec!["sh", "-c"]);
        assert!(!ctx.dry_run);
        assert!(ctx.config_path.is_none());
    }

    #[test]
    fn test_config_path_sets_working_dir() {
        let ctx = Context::new().with_config_path(PathBuf::from("/repo/devtask.yml"));
        assert_eq!(ctx.working_dir, PathBuf::from("/repo"));
        assert_eq!(ctx.config_dir(), PathBuf::from("/repo"));
    }

    #[test]
    fn test_bare_config_name_keeps_working_dir() {
        let ctx = Context::new()
            .with_working_dir(PathBuf::from("/work"))
            .with_config_path(PathBuf::from("devtask.yml"));
        assert_eq!(ctx.working_dir, PathBuf::from("/work"));
        assert_eq!(ctx.config_dir(), PathBuf::from("/work"));
    }

    #[test]
    fn test_with_interpreter() {
        let ctx = Context::new().with_interpreter(vec!["bash".to_string(), "-c".to_string()]);
        assert_eq!(ctx.interpreter, vec!["bash", "-c"]);
    }

    #[test]
    fn test_with_verbosity_and_dry_run() {
        let ctx = Context::new()
            .with_verbosity(Verbosity::Verbose)
            .with_dry_run(true);
        assert_eq!(ctx.verbosity, Verbosity::Verbose);
        assert!(ctx.dry_run);
    }
}
