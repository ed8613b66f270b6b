//! Task execution types and logic
//!
//! This module contains the runtime representation of tasks and the
//! dispatcher that runs a task together with its prerequisites.

use crate::config::{self, Config};
use crate::error::{ConfigError, DevtaskError, ExecutionResult};
use crate::runner::{
    execute_command, resolve_chain, Command, Context, PreparedCommand, VarResolver,
};

/// Runtime task representation
#[derive(Debug, Clone)]
pub struct Task {
    /// Task name
    pub name: String,

    /// Usage description
    pub usage: Option<String>,

    /// Longer description
    pub description: Option<String>,

    /// Whether this task is private
    pub private: bool,

    /// Whether this task should run quietly
    pub quiet: bool,

    /// Prerequisite task names, in declared order
    pub deps: Vec<String>,

    /// Commands to execute
    pub commands: Vec<Command>,
}

impl Task {
    /// Create a new task from configuration
    pub fn from_config(name: String, config: config::Task) -> Self {
        Task {
            name,
            usage: config.usage,
            description: config.description,
            private: config.private,
            quiet: config.quiet,
            deps: config.deps,
            commands: config.run.into_iter().map(Command::from_config).collect(),
        }
    }

    /// Whether any command consumes `${args}` itself
    pub fn references_args(&self) -> bool {
        self.commands.iter().any(Command::references_args)
    }

    /// Resolve every command of the task.
    ///
    /// `args` go wherever `${args}` appears; when no command mentions it they
    /// are appended to the last command.
    pub fn prepare(
        &self,
        resolver: &mut VarResolver<'_>,
        args: &[String],
        ctx: &Context,
    ) -> Result<PreparedTask, DevtaskError> {
        let append_to_last = !args.is_empty() && !self.references_args();
        let last = self.commands.len().saturating_sub(1);

        let commands = self
            .commands
            .iter()
            .enumerate()
            .map(|(i, cmd)| cmd.prepare(resolver, args, append_to_last && i == last, ctx))
            .collect::<Result<Vec<_>, _>>()?;

        if self.commands.is_empty() && !args.is_empty() {
            ctx.print_info(&format!(
                "Task '{}' runs no commands of its own; ignoring arguments",
                self.name
            ));
        }

        Ok(PreparedTask {
            name: self.name.clone(),
            quiet: self.quiet,
            commands,
        })
    }
}

/// A task whose commands are fully resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedTask {
    pub name: String,
    pub quiet: bool,
    pub commands: Vec<PreparedCommand>,
}

impl PreparedTask {
    /// Run the commands in order, stopping at the first failure
    pub fn execute(&self, ctx: &Context) -> ExecutionResult<()> {
        ctx.print_task_start(&self.name);
        for cmd in &self.commands {
            execute_command(&self.name, cmd, self.quiet, ctx)?;
        }
        ctx.print_task_complete(&self.name);
        Ok(())
    }

    /// Resolved command lines
    pub fn command_lines(&self) -> Vec<String> {
        self.commands.iter().map(PreparedCommand::command_line).collect()
    }
}

/// Runs named tasks from a configuration
pub struct Dispatcher<'a> {
    config: &'a Config,
    ctx: Context,
}

impl<'a> Dispatcher<'a> {
    pub fn new(config: &'a Config, ctx: Context) -> Self {
        Dispatcher { config, ctx }
    }

    /// Resolve the prerequisite chain of `task_name` and every command in it.
    ///
    /// Nothing is executed; variables referenced by the chain are computed
    /// here, once.
    pub fn plan(
        &self,
        task_name: &str,
        args: &[String],
    ) -> Result<Vec<PreparedTask>, DevtaskError> {
        let chain = resolve_chain(self.config, task_name)?;
        let mut resolver = VarResolver::new(&self.config.vars, &self.ctx);

        chain
            .iter()
            .map(|name| {
                let task_config = self
                    .config
                    .tasks
                    .get(name)
                    .ok_or_else(|| ConfigError::TaskNotFound(name.clone()))?;
                let task = Task::from_config(name.clone(), task_config.clone());
                let task_args: &[String] = if name == task_name { args } else { &[] };
                task.prepare(&mut resolver, task_args, &self.ctx)
            })
            .collect()
    }

    /// Resolve every declared variable, sorted by name
    pub fn variables(&self) -> Result<Vec<(String, String)>, DevtaskError> {
        let mut resolver = VarResolver::new(&self.config.vars, &self.ctx);
        let mut vars: Vec<(String, String)> = resolver.resolve_all()?.into_iter().collect();
        vars.sort();
        Ok(vars)
    }

    /// Run `task_name` after its prerequisites; the first failure aborts the chain
    pub fn run(&self, task_name: &str, args: &[String]) -> Result<(), DevtaskError> {
        let plan = self.plan(task_name, args)?;
        for task in &plan {
            task.execute(&self.ctx)?;
        }
        Ok(())
    }
}
