//! Configuration validation
//!
//! This module provides validation logic for configuration files.

use crate::config::types::{Config, Task};
use crate::error::{ConfigError, ConfigResult};
use std::collections::HashSet;

/// Variable bound to the pass-through arguments of the invoked task
pub const ARGS_VAR: &str = "args";

/// Validate a complete configuration
pub fn validate_config(config: &Config) -> ConfigResult<()> {
    if config.vars.contains_key(ARGS_VAR) {
        return Err(ConfigError::ReservedVariable(ARGS_VAR.to_string()));
    }

    if let Some(interpreter) = &config.interpreter {
        if interpreter.is_empty() {
            return Err(ConfigError::Invalid(
                "interpreter must name a program".to_string(),
            ));
        }
    }

    // Validate each task
    for (name, task) in &config.tasks {
        validate_task(name, task, config)?;
    }

    // Check for circular dependencies between tasks
    detect_circular_task_dependencies(config)?;

    Ok(())
}

/// Validate a single task
pub fn validate_task(name: &str, task: &Task, config: &Config) -> ConfigResult<()> {
    if name.is_empty() || name.starts_with('-') {
        return Err(ConfigError::Invalid(format!(
            "Invalid task name '{}'",
            name
        )));
    }

    for dep in &task.deps {
        if !config.tasks.contains_key(dep) {
            return Err(ConfigError::UnknownPrerequisite {
                task: name.to_string(),
                dep: dep.clone(),
            });
        }
    }

    Ok(())
}

/// Detect circular dependencies in task prerequisite relationships
fn detect_circular_task_dependencies(config: &Config) -> ConfigResult<()> {
    let mut visited = HashSet::new();
    let mut names: Vec<&String> = config.tasks.keys().collect();
    names.sort();

    for task_name in names {
        let mut stack = Vec::new();
        check_task_cycle(config, task_name, &mut visited, &mut stack)?;
    }
    Ok(())
}

/// Recursively check for cycles in task dependencies
fn check_task_cycle(
    config: &Config,
    task_name: &str,
    visited: &mut HashSet<String>,
    stack: &mut Vec<String>,
) -> ConfigResult<()> {
    // Check if we've found a cycle
    if stack.iter().any(|t| t == task_name) {
        stack.push(task_name.to_string());
        return Err(ConfigError::CircularDependency(stack.join(" -> ")));
    }

    // Skip if already fully processed
    if visited.contains(task_name) {
        return Ok(());
    }

    let task = config
        .tasks
        .get(task_name)
        .ok_or_else(|| ConfigError::TaskNotFound(task_name.to_string()))?;

    stack.push(task_name.to_string());

    for dep in &task.deps {
        check_task_cycle(config, dep, visited, stack)?;
    }

    // Remove from stack and mark as visited
    stack.pop();
    visited.insert(task_name.to_string());

    Ok(())
}
