//! Command rendering and execution
//!
//! A command template becomes a [`PreparedCommand`] once every placeholder is
//! resolved; only prepared commands are ever spawned.

use crate::config;
use crate::config::ARGS_VAR;
use crate::error::{DevtaskError, ExecutionError, ExecutionResult};
use crate::runner::{interpolate_with, references, Context, VarResolver};
use crate::ui;
use crate::utils::shell;
use std::path::PathBuf;
use std::process::{Command as StdCommand, ExitStatus, Stdio};

/// Runtime representation of a command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Shell command run through the interpreter
    Shell {
        exec: String,
        print: Option<String>,
        quiet: bool,
        dir: Option<String>,
    },

    /// Program and arguments spawned directly
    Tokens(Vec<String>),
}

impl Command {
    /// Create from config
    pub fn from_config(config: config::Command) -> Self {
        match config {
            config::Command::Simple(exec) => Command::Shell {
                exec,
                print: None,
                quiet: false,
                dir: None,
            },
            config::Command::Tokens(tokens) => Command::Tokens(tokens),
            config::Command::Complex(detail) => Command::Shell {
                exec: detail.exec,
                print: detail.print,
                quiet: detail.quiet,
                dir: detail.dir,
            },
        }
    }

    /// Whether the template mentions `${args}`
    pub fn references_args(&self) -> bool {
        match self {
            Command::Shell { exec, .. } => references(exec, ARGS_VAR),
            Command::Tokens(tokens) => tokens.iter().any(|t| references(t, ARGS_VAR)),
        }
    }

    /// Resolve placeholders, binding `${args}` to `args`.
    ///
    /// With `append_args` the arguments are also added to the end of the
    /// command line.
    pub fn prepare(
        &self,
        resolver: &mut VarResolver<'_>,
        args: &[String],
        append_args: bool,
        ctx: &Context,
    ) -> Result<PreparedCommand, DevtaskError> {
        match self {
            Command::Shell {
                exec,
                print,
                quiet,
                dir,
            } => {
                let quoted = shell::join(args);
                let mut lookup = |name: &str| {
                    if name == ARGS_VAR {
                        Ok(quoted.clone())
                    } else {
                        resolver.lookup(name)
                    }
                };

                let mut script = interpolate_with(exec, &mut lookup)?;
                if append_args && !args.is_empty() {
                    script.push(' ');
                    script.push_str(&quoted);
                }
                let print = print
                    .as_deref()
                    .map(|p| interpolate_with(p, &mut lookup))
                    .transpose()?;
                let dir = match dir {
                    Some(d) => ctx.working_dir.join(interpolate_with(d, &mut lookup)?),
                    None => ctx.working_dir.clone(),
                };

                Ok(PreparedCommand {
                    display: print.unwrap_or_else(|| script.clone()),
                    invocation: Invocation::Shell(script),
                    quiet: *quiet,
                    dir,
                })
            }
            Command::Tokens(tokens) => {
                let mut argv = Vec::with_capacity(tokens.len() + args.len());
                for token in tokens {
                    if token == "${args}" {
                        argv.extend(args.iter().cloned());
                        continue;
                    }
                    argv.push(interpolate_with(token, |name| {
                        if name == ARGS_VAR {
                            Ok(args.join(" "))
                        } else {
                            resolver.lookup(name)
                        }
                    })?);
                }
                if append_args {
                    argv.extend(args.iter().cloned());
                }

                Ok(PreparedCommand {
                    display: shell::join(&argv),
                    invocation: Invocation::Direct(argv),
                    quiet: false,
                    dir: ctx.working_dir.clone(),
                })
            }
        }
    }
}

/// How a prepared command is spawned
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Script handed to the interpreter
    Shell(String),

    /// argv spawned without a shell
    Direct(Vec<String>),
}

/// A fully resolved command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedCommand {
    pub invocation: Invocation,

    /// Line echoed before running
    pub display: String,

    pub quiet: bool,

    /// Working directory
    pub dir: PathBuf,
}

impl PreparedCommand {
    /// Resolved command line, as a shell would read it
    pub fn command_line(&self) -> String {
        match &self.invocation {
            Invocation::Shell(script) => script.clone(),
            Invocation::Direct(argv) => shell::join(argv),
        }
    }
}

/// Execute a prepared command on behalf of `task`
pub fn execute_command(
    task: &str,
    cmd: &PreparedCommand,
    quiet: bool,
    ctx: &Context,
) -> ExecutionResult<()> {
    if ctx.dry_run {
        ui::print_dry_run(ctx.verbosity, &cmd.command_line());
        return Ok(());
    }

    // Print the command if not quiet
    if !quiet && !cmd.quiet {
        ui::print_command(ctx.verbosity, &cmd.display);
    }

    let mut command = match &cmd.invocation {
        Invocation::Shell(script) => {
            let (program, interpreter_args) = ctx
                .interpreter
                .split_first()
                .ok_or_else(|| ExecutionError::NoInterpreter(task.to_string()))?;
            let mut command = StdCommand::new(program);
            command.args(interpreter_args).arg(script);
            command
        }
        Invocation::Direct(argv) => {
            let Some((program, rest)) = argv.split_first() else {
                return Ok(());
            };
            let mut command = StdCommand::new(program);
            command.args(rest);
            command
        }
    };

    command.current_dir(&cmd.dir);

    // Set up stdio
    command.stdin(Stdio::inherit());
    command.stdout(Stdio::inherit());
    command.stderr(Stdio::inherit());

    let status = command.status().map_err(|source| ExecutionError::Spawn {
        program: program_name(cmd, ctx),
        source,
    })?;

    // Check exit status
    if !status.success() {
        return Err(ExecutionError::CommandFailed {
            task: task.to_string(),
            code: exit_code(status),
        });
    }

    Ok(())
}

fn program_name(cmd: &PreparedCommand, ctx: &Context) -> String {
    match &cmd.invocation {
        Invocation::Shell(_) => ctx.interpreter.first().cloned().unwrap_or_default(),
        Invocation::Direct(argv) => argv.first().cloned().unwrap_or_default(),
    }
}

/// Exit code to mirror for `status`; `128 + signal` when killed by a signal
pub fn exit_code(status: ExitStatus) -> Option<i32> {
    if let Some(code) = status.code() {
        return Some(code);
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return Some(128 + signal);
        }
    }
    None
}
