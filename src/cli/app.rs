//! Main CLI application

use crate::config::{
    parse_config_auto, parse_config_file, validate_config, write_template, Config, DEFAULT_DOTENV,
};
use crate::error::{ConfigError, DevtaskError};
use crate::runner::{Context, Dispatcher, Verbosity};
use crate::VERSION;
use crate::ui;
use crate::utils::{load_env_file, write_skeleton};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use clap_complete::Shell;
use std::ffi::OsString;
use std::io;
use std::path::PathBuf;

/// Name of the positional that collects pass-through arguments
const TASK_ARGS: &str = "args";

/// CLI application
pub struct App {
    /// The clap command
    command: Command,
    /// Parsed and validated configuration with its path
    loaded: Result<(Config, PathBuf), DevtaskError>,
}

impl App {
    /// Create a new app, discovering the configuration file
    pub fn new() -> Self {
        Self::from_loaded(parse_config_auto())
    }

    /// Create app with a specific config file
    pub fn with_config_file(path: PathBuf) -> Self {
        Self::from_loaded(parse_config_file(&path).map(|config| (config, path)))
    }

    fn from_loaded(loaded: Result<(Config, PathBuf), DevtaskError>) -> Self {
        let loaded = loaded.and_then(|(config, path)| {
            validate_config(&config)?;
            Ok((config, path))
        });
        let command = build_command(loaded.as_ref().ok().map(|(config, _)| config));

        App { command, loaded }
    }

    /// Run the application with the process arguments
    pub fn run(self) -> Result<(), DevtaskError> {
        self.run_from(std::env::args_os())
    }

    /// Run the application with explicit arguments (first item is the binary name)
    pub fn run_from<I, T>(mut self, args: I) -> Result<(), DevtaskError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self.command.clone().get_matches_from(args);

        // Handle global flags first
        let verbosity = get_verbosity(&matches);

        if matches.get_flag("init") {
            let path = write_template(&std::env::current_dir()?)?;
            ui::print_info(verbosity, &format!("Wrote {}", path.display()));
            return Ok(());
        }

        let (config, config_path) = self.loaded?;

        if let Some(shell) = matches.get_one::<Shell>("completions") {
            let bin_name = self.command.get_name().to_string();
            clap_complete::generate(*shell, &mut self.command, bin_name, &mut io::stdout());
            return Ok(());
        }

        if matches.get_flag("list") {
            print!("{}", render_task_list(&config));
            return Ok(());
        }

        // Create execution context
        let mut ctx = Context::new()
            .with_config_path(config_path.clone())
            .with_verbosity(verbosity)
            .with_dry_run(matches.get_flag("dry-run"));

        // Set interpreter if specified in config
        if let Some(interpreter) = &config.interpreter {
            ctx = ctx.with_interpreter(interpreter.clone());
        }

        let env_file = env_file_path(&config, &ctx, matches.get_one::<PathBuf>("env-file"));

        if matches.get_flag("env-skeleton") {
            let path = write_skeleton(&env_file.path)?;
            ui::print_info(verbosity, &format!("Wrote {}", path.display()));
            return Ok(());
        }

        if !matches.get_flag("no-dotenv") {
            let loaded = load_env_file(&env_file.path, env_file.required)?;
            if loaded {
                ctx.print_debug(&format!("Loaded {}", env_file.path.display()));
            }
        }

        let dispatcher = Dispatcher::new(&config, ctx);

        if matches.get_flag("evaluate") {
            for (name, value) in dispatcher.variables()? {
                println!("{} = {}", name, value);
            }
            return Ok(());
        }

        // Check if a task was specified
        let (task_name, task_matches) = match matches.subcommand() {
            Some((name, sub_matches)) => (name.to_string(), sub_matches),
            None => {
                // No task specified, show help
                self.command.print_help()?;
                println!();
                return Ok(());
            }
        };

        if !config.tasks.contains_key(&task_name) {
            return Err(ConfigError::TaskNotFound(task_name).into());
        }

        let task_args = parse_task_args(task_matches);
        dispatcher.run(&task_name, &task_args)
    }
}

/// Build the clap command from configuration
fn build_command(config: Option<&Config>) -> Command {
    let name = config
        .and_then(|c| c.name.clone())
        .unwrap_or_else(|| "devtask".to_string());
    let about = config
        .and_then(|c| c.usage.clone())
        .unwrap_or_else(|| "A declarative YAML task runner".to_string());

    let mut cmd = Command::new(name)
        .bin_name("devtask")
        .version(VERSION)
        .about(about)
        .allow_external_subcommands(true)
        .disable_help_subcommand(true)
        .subcommand_value_name("TASK")
        .subcommand_help_heading("Tasks")
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Path to devtask.yml config file"),
        )
        .arg(
            Arg::new("env-file")
                .long("env-file")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Environment file to load (must exist)"),
        )
        .arg(
            Arg::new("no-dotenv")
                .long("no-dotenv")
                .help("Do not load an environment file")
                .action(ArgAction::SetTrue)
                .conflicts_with("env-file"),
        )
        .arg(
            Arg::new("dry-run")
                .short('n')
                .long("dry-run")
                .help("Print resolved commands without running them")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list")
                .short('l')
                .long("list")
                .help("List available tasks")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("evaluate")
                .long("evaluate")
                .help("Print the resolved value of every variable")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("init")
                .long("init")
                .help("Write the default workflow to ./devtask.yml")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("env-skeleton")
                .long("env-skeleton")
                .help("Write <env file>.skeleton holding only variable names")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("completions")
                .long("completions")
                .value_name("SHELL")
                .value_parser(value_parser!(Shell))
                .help("Print a shell completion script"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only print command output and errors")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("silent")
                .short('s')
                .long("silent")
                .help("Print only command output and devtask errors")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Print verbose output")
                .action(ArgAction::SetTrue),
        );

    let Some(config) = config else {
        return cmd;
    };

    // Add subcommands for each task
    let mut names: Vec<&String> = config.tasks.keys().collect();
    names.sort();

    for task_name in names {
        let task = &config.tasks[task_name];

        let mut about = task.usage.clone().unwrap_or_default();
        if !task.deps.is_empty() {
            about = format!("{} [after: {}]", about, task.deps.join(", "))
                .trim_start()
                .to_string();
        }

        // Everything after the task name belongs to the task's command
        let mut task_cmd = Command::new(task_name.clone())
            .about(about)
            .hide(task.private)
            .disable_help_flag(true)
            .arg(
                Arg::new(TASK_ARGS)
                    .value_name("ARGS")
                    .help("Arguments passed through to the task's command")
                    .num_args(0..)
                    .trailing_var_arg(true)
                    .allow_hyphen_values(true),
            );

        // Add long description if available
        if let Some(desc) = &task.description {
            task_cmd = task_cmd.long_about(desc.clone());
        }

        cmd = cmd.subcommand(task_cmd);
    }

    cmd
}

/// Get verbosity level from matches
fn get_verbosity(matches: &ArgMatches) -> Verbosity {
    if matches.get_flag("silent") {
        Verbosity::Silent
    } else if matches.get_flag("quiet") {
        Verbosity::Quiet
    } else if matches.get_flag("verbose") {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    }
}

/// Pass-through arguments of a task subcommand, in order
fn parse_task_args(matches: &ArgMatches) -> Vec<String> {
    matches
        .get_many::<String>(TASK_ARGS)
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}

/// Environment file to load and whether it must exist
struct EnvFile {
    path: PathBuf,
    required: bool,
}

fn env_file_path(config: &Config, ctx: &Context, cli_path: Option<&PathBuf>) -> EnvFile {
    match cli_path {
        Some(path) => EnvFile {
            path: path.clone(),
            required: true,
        },
        None => EnvFile {
            path: ctx
                .config_dir()
                .join(config.dotenv.as_deref().unwrap_or(DEFAULT_DOTENV)),
            required: config.dotenv_required,
        },
    }
}

/// Text of `devtask --list`
fn render_task_list(config: &Config) -> String {
    let names = config.public_task_names();
    let width = names.iter().map(|n| n.len()).max().unwrap_or(0);

    let mut out = String::from("Available tasks:\n");
    for name in names {
        let task = &config.tasks[name];
        out.push_str(&ui::format_task_line(
            name,
            task.usage.as_deref(),
            &task.deps,
            width,
        ));
        out.push('\n');
    }
    out
}

/// Run the CLI application with provided arguments
pub fn run() -> Result<(), DevtaskError> {
    // Check if --file flag is provided first
    let args: Vec<String> = std::env::args().collect();
    let file_path = extract_file_arg(&args);

    let app = if let Some(path) = file_path {
        App::with_config_file(path)
    } else {
        App::new()
    };

    app.run()
}

/// Extract --file argument before clap parsing
///
/// Only flags ahead of the task name count; anything after it is passed
/// through to the task.
fn extract_file_arg(args: &[String]) -> Option<PathBuf> {
    build_command(None)
        .ignore_errors(true)
        .try_get_matches_from(args)
        .ok()
        .and_then(|matches| matches.get_one::<PathBuf>("file").cloned())
}
