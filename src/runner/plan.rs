//! Prerequisite chain resolution

use crate::config::Config;
use crate::error::{ConfigError, ConfigResult};
use std::collections::HashSet;

/// Tasks to run for `root`, in execution order.
///
/// Prerequisites are visited depth-first in declared order; every task appears
/// once, after all of its own prerequisites, and `root` comes last.
pub fn resolve_chain(config: &Config, root: &str) -> ConfigResult<Vec<String>> {
    if !config.tasks.contains_key(root) {
        return Err(ConfigError::TaskNotFound(root.to_string()));
    }

    let mut order = Vec::new();
    let mut done = HashSet::new();
    let mut stack = Vec::new();
    visit(config, root, &mut done, &mut stack, &mut order)?;
    Ok(order)
}

fn visit(
    config: &Config,
    name: &str,
    done: &mut HashSet<String>,
    stack: &mut Vec<String>,
    order: &mut Vec<String>,
) -> ConfigResult<()> {
    if done.contains(name) {
        return Ok(());
    }
    if stack.iter().any(|t| t == name) {
        stack.push(name.to_string());
        return Err(ConfigError::CircularDependency(stack.join(" -> ")));
    }

    let task = config.tasks.get(name).ok_or_else(|| match stack.last() {
        Some(parent) => ConfigError::UnknownPrerequisite {
            task: parent.clone(),
            dep: name.to_string(),
        },
        None => ConfigError::TaskNotFound(name.to_string()),
    })?;

    stack.push(name.to_string());
    for dep in &task.deps {
        visit(config, dep, done, stack, order)?;
    }
    stack.pop();

    done.insert(name.to_string());
    order.push(name.to_string());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;

    fn config(yaml: &str) -> Config {
        parse_config(yaml).unwrap()
    }

    #[test]
    fn test_single_task() {
        let config = config("tasks:\n  test:\n    run: pytest\n");
        assert_eq!(resolve_chain(&config, "test").unwrap(), vec!["test"]);
    }

    #[test]
    fn test_unknown_task() {
        let config = config("tasks:\n  test:\n    run: pytest\n");
        assert!(matches!(
            resolve_chain(&config, "tset"),
            Err(ConfigError::TaskNotFound(ref name)) if name == "tset"
        ));
    }

    #[test]
    fn test_declared_order_depth_first() {
        let config = config(
            r#"
tasks:
  qa:
    deps: [deps, lint, type, cov]
  deps: {run: "true"}
  lint: {run: "true"}
  type:
    deps: [type_src, type_app]
  type_src: {run: "true"}
  type_app: {run: "true"}
  cov: {run: "true"}
"#,
        );

        assert_eq!(
            resolve_chain(&config, "qa").unwrap(),
            vec!["deps", "lint", "type_src", "type_app", "type", "cov", "qa"]
        );
    }

    #[test]
    fn test_shared_prerequisite_runs_once() {
        let config = config(
            r#"
tasks:
  all:
    deps: [a, b]
  a:
    deps: [base]
  b:
    deps: [base]
  base: {run: "true"}
"#,
        );

        assert_eq!(
            resolve_chain(&config, "all").unwrap(),
            vec!["base", "a", "b", "all"]
        );
    }

    #[test]
    fn test_cycle_reported() {
        let config = config(
            r#"
tasks:
  a: {deps: [b]}
  b: {deps: [a]}
"#,
        );

        assert!(matches!(
            resolve_chain(&config, "a"),
            Err(ConfigError::CircularDependency(ref chain)) if chain == "a -> b -> a"
        ));
    }

    #[test]
    fn test_missing_prerequisite() {
        let config = config("tasks:\n  qa:\n    deps: [gone]\n");
        assert!(matches!(
            resolve_chain(&config, "qa"),
            Err(ConfigError::UnknownPrerequisite { ref task, ref dep }) if task == "qa" && dep == "gone"
        ));
    }
}
