//! Resolution of declared variables
//!
//! Each variable is computed at most once per invocation and only when a
//! command (or another variable) references it.

use crate::config::Variable;
use crate::error::{DevtaskError, ExecutionError, InterpolationError};
use crate::runner::{interpolate_with, Context};
use std::collections::HashMap;
use std::env;
use std::process::{Command as StdCommand, Stdio};

/// Memoising resolver for the `vars` section of a config
pub struct VarResolver<'a> {
    defs: &'a HashMap<String, Variable>,
    ctx: &'a Context,
    resolved: HashMap<String, String>,
    stack: Vec<String>,
}

impl<'a> VarResolver<'a> {
    pub fn new(defs: &'a HashMap<String, Variable>, ctx: &'a Context) -> Self {
        VarResolver {
            defs,
            ctx,
            resolved: HashMap::new(),
            stack: Vec::new(),
        }
    }

    /// Value of `name`: a declared variable, else an environment variable
    pub fn lookup(&mut self, name: &str) -> Result<String, DevtaskError> {
        if self.defs.contains_key(name) {
            return self.resolve(name);
        }
        env::var(name).map_err(|_| InterpolationError::UndefinedVariable(name.to_string()).into())
    }

    /// Interpolate `s` against declared variables and the environment
    pub fn interpolate(&mut self, s: &str) -> Result<String, DevtaskError> {
        interpolate_with(s, |name| self.lookup(name))
    }

    /// Resolve a declared variable
    pub fn resolve(&mut self, name: &str) -> Result<String, DevtaskError> {
        if let Some(value) = self.resolved.get(name) {
            return Ok(value.clone());
        }

        if self.stack.iter().any(|n| n == name) {
            let mut chain = self.stack.clone();
            chain.push(name.to_string());
            return Err(InterpolationError::RecursiveInterpolation(chain.join(" -> ")).into());
        }

        let defs = self.defs;
        let def = defs
            .get(name)
            .ok_or_else(|| InterpolationError::UndefinedVariable(name.to_string()))?;

        self.stack.push(name.to_string());
        let value = self.evaluate(name, def);
        self.stack.pop();

        let value = value?;
        self.ctx
            .print_debug(&format!("Resolved variable {} = {}", name, value));
        self.resolved.insert(name.to_string(), value.clone());
        Ok(value)
    }

    /// Resolve every declared variable
    pub fn resolve_all(&mut self) -> Result<HashMap<String, String>, DevtaskError> {
        let mut names: Vec<&String> = self.defs.keys().collect();
        names.sort();
        for name in names {
            self.resolve(name)?;
        }
        Ok(self.resolved.clone())
    }

    fn evaluate(&mut self, name: &str, def: &Variable) -> Result<String, DevtaskError> {
        match def {
            Variable::Value(value) => self.interpolate(value),
            Variable::Env { env: var, default } => match env::var(var) {
                Ok(value) => Ok(value),
                Err(_) => match default {
                    Some(default) => self.interpolate(default),
                    None => Err(InterpolationError::UndefinedVariable(var.clone()).into()),
                },
            },
            Variable::Command { command } => {
                let script = self.interpolate(command)?;
                Ok(capture_output(name, &script, self.ctx)?)
            }
        }
    }
}

/// Run `script` through the interpreter and return its trimmed stdout
fn capture_output(name: &str, script: &str, ctx: &Context) -> Result<String, ExecutionError> {
    let (program, interpreter_args) = ctx
        .interpreter
        .split_first()
        .ok_or_else(|| ExecutionError::NoInterpreter(name.to_string()))?;

    let output = StdCommand::new(program)
        .args(interpreter_args)
        .arg(script)
        .current_dir(&ctx.working_dir)
        .stdin(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .map_err(|source| ExecutionError::Spawn {
            program: program.clone(),
            source,
        })?;

    if !output.status.success() {
        return Err(ExecutionError::VariableCommand {
            name: name.to_string(),
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout)
        .trim_end_matches(['\n', '\r'])
        .to_string())
}
