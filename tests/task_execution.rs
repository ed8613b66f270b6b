//! Integration tests for task execution

mod common;

use common::{create_test_config, read_lines, strings};
use devtask::config::{parse_config, parse_config_file, validate_config};
use devtask::error::{DevtaskError, ExecutionError};
use devtask::runner::{Context, Dispatcher, Verbosity};
use std::fs;

fn context_in(dir: &std::path::Path) -> Context {
    Context::new()
        .with_working_dir(dir.to_path_buf())
        .with_verbosity(Verbosity::Silent)
}

#[test]
fn test_execute_simple_task() {
    let yaml = r#"
tasks:
  hello:
    run: echo "Hello, World!"
"#;

    let config = parse_config(yaml).unwrap();
    validate_config(&config).unwrap();

    let dispatcher = Dispatcher::new(&config, Context::new().with_verbosity(Verbosity::Silent));
    assert!(dispatcher.run("hello", &[]).is_ok());
}

#[test]
fn test_prerequisites_run_in_declared_order() {
    let (temp_dir, config_path) = create_test_config(
        r#"
tasks:
  qa:
    deps: [deps, lint, type]
    run: echo qa >> order.log
  deps:
    run: echo deps >> order.log
  lint:
    run: echo lint >> order.log
  type:
    deps: [type_src, type_app]
  type_src:
    run: echo type_src >> order.log
  type_app:
    run: echo type_app >> order.log
"#,
    );

    let config = parse_config_file(&config_path).unwrap();
    validate_config(&config).unwrap();
    let dispatcher = Dispatcher::new(&config, context_in(temp_dir.path()));

    dispatcher.run("qa", &[]).unwrap();

    assert_eq!(
        read_lines(&temp_dir.path().join("order.log")),
        vec!["deps", "lint", "type_src", "type_app", "qa"]
    );
}

#[test]
fn test_failed_prerequisite_halts_chain() {
    let (temp_dir, config_path) = create_test_config(
        r#"
tasks:
  qa:
    deps: [first, failing, never]
    run: touch qa.txt
  first:
    run: touch first.txt
  failing:
    run:
      - exit 3
      - touch after-failure.txt
  never:
    run: touch never.txt
"#,
    );

    let config = parse_config_file(&config_path).unwrap();
    let dispatcher = Dispatcher::new(&config, context_in(temp_dir.path()));

    let err = dispatcher.run("qa", &[]).unwrap_err();
    assert!(matches!(
        err,
        DevtaskError::Execution(ExecutionError::CommandFailed { ref task, code: Some(3) }) if task == "failing"
    ));
    assert_eq!(err.exit_code(), 3);

    assert!(temp_dir.path().join("first.txt").exists());
    assert!(!temp_dir.path().join("after-failure.txt").exists());
    assert!(!temp_dir.path().join("never.txt").exists());
    assert!(!temp_dir.path().join("qa.txt").exists());
}

#[test]
fn test_trailing_args_reach_final_command() {
    let (temp_dir, config_path) = create_test_config(
        r#"
tasks:
  test:
    deps: [prepare]
    run:
      - echo start > out.txt
      - printf '%s\n' > out.txt
  prepare:
    run: printf '%s\n' ${args} > prepare.txt
"#,
    );

    let config = parse_config_file(&config_path).unwrap();
    let dispatcher = Dispatcher::new(&config, context_in(temp_dir.path()));
    let args = strings(&["-k", "not slow", "$HOME", "it's", "--", ""]);

    dispatcher.run("test", &args).unwrap();

    assert_eq!(read_lines(&temp_dir.path().join("out.txt")), args);
    assert_eq!(read_lines(&temp_dir.path().join("prepare.txt")), vec![""]);
}

#[test]
fn test_token_command_receives_args_unquoted() {
    let (temp_dir, config_path) = create_test_config(
        r#"
tasks:
  echo:
    run:
      - [sh, -c, 'printf "%s\n" "$@" > out.txt', sh, "${args}"]
"#,
    );

    let config = parse_config_file(&config_path).unwrap();
    let dispatcher = Dispatcher::new(&config, context_in(temp_dir.path()));
    let args = strings(&["a b", "*", "${not_a_var}"]);

    dispatcher.run("echo", &args).unwrap();

    assert_eq!(read_lines(&temp_dir.path().join("out.txt")), args);
}

#[test]
fn test_same_environment_same_command_lines() {
    let yaml = r#"
vars:
  src: src
  repo_name:
    command: basename "$(pwd)"
tasks:
  compose:
    run: docker compose -p ${repo_name} up --build ${args}
  lint:
    run: uv run ruff check ${src}
"#;
    let temp_dir = tempfile::TempDir::new().unwrap();
    let config = parse_config(yaml).unwrap();
    let dispatcher = Dispatcher::new(&config, context_in(temp_dir.path()));
    let args = strings(&["--detach"]);

    let first = dispatcher.plan("compose", &args).unwrap();
    let second = dispatcher.plan("compose", &args).unwrap();
    assert_eq!(first, second);

    let repo = temp_dir.path().file_name().unwrap().to_string_lossy().to_string();
    assert_eq!(
        first[0].command_lines(),
        vec![format!("docker compose -p {} up --build --detach", repo)]
    );
}

#[test]
fn test_missing_tool_reports_its_own_failure() {
    let (temp_dir, config_path) = create_test_config(
        r#"
tasks:
  py312:
    run: devtask-missing-uv venv --python 3.12 .venv-3.12
  py311:
    run:
      - [devtask-missing-uv, venv, --python, "3.11"]
"#,
    );

    let config = parse_config_file(&config_path).unwrap();
    let dispatcher = Dispatcher::new(&config, context_in(temp_dir.path()));

    let err = dispatcher.run("py312", &[]).unwrap_err();
    assert_eq!(err.exit_code(), 127);

    let err = dispatcher.run("py311", &[]).unwrap_err();
    assert!(matches!(
        err,
        DevtaskError::Execution(ExecutionError::Spawn { .. })
    ));
    assert_eq!(err.exit_code(), 127);
}

#[test]
fn test_quiet_task_and_detail_dir() {
    let (temp_dir, config_path) = create_test_config(
        r#"
vars:
  out: build
tasks:
  build:
    quiet: true
    run:
      - mkdir -p ${out}
      - exec: pwd > where.txt
        dir: ${out}
"#,
    );

    let config = parse_config_file(&config_path).unwrap();
    let ctx = Context::new()
        .with_config_path(config_path.clone())
        .with_verbosity(Verbosity::Silent);
    let dispatcher = Dispatcher::new(&config, ctx);

    dispatcher.run("build", &[]).unwrap();

    let build_dir = temp_dir.path().join("build");
    let recorded = fs::read_to_string(build_dir.join("where.txt")).unwrap();
    assert_eq!(
        fs::canonicalize(recorded.trim()).unwrap(),
        fs::canonicalize(&build_dir).unwrap()
    );
}

#[test]
fn test_dry_run_executes_nothing() {
    let (temp_dir, config_path) = create_test_config(
        r#"
tasks:
  all:
    deps: [first]
    run: touch all.txt
  first:
    run: touch first.txt
"#,
    );

    let config = parse_config_file(&config_path).unwrap();
    let dispatcher = Dispatcher::new(&config, context_in(temp_dir.path()).with_dry_run(true));

    dispatcher.run("all", &[]).unwrap();

    assert!(!temp_dir.path().join("first.txt").exists());
    assert!(!temp_dir.path().join("all.txt").exists());
}

#[test]
fn test_custom_interpreter() {
    let (temp_dir, config_path) = create_test_config(
        r#"
interpreter: [bash, -c]
tasks:
  arrays:
    run: 'xs=(a b c); echo "${#xs[@]}" > count.txt'
"#,
    );

    let config = parse_config_file(&config_path).unwrap();
    let ctx = context_in(temp_dir.path())
        .with_interpreter(config.interpreter.clone().unwrap());
    let dispatcher = Dispatcher::new(&config, ctx);

    dispatcher.run("arrays", &[]).unwrap();
    assert_eq!(read_lines(&temp_dir.path().join("count.txt")), vec!["3"]);
}
