//! The shell tool
//!
//! Runs the task's `script` through `/bin/sh -c` from inside the task's
//! directory. A non-zero exit fails the task.

use crate::error::{ExecutionError, ExecutionResult, Result};
use crate::runner::{interpolate, Context, Task, WorkingDirGuard};
use crate::tools::Tool;
use std::process::{Command, Stdio};

/// Runs a shell script
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellTool;

impl ShellTool {
    pub const NAME: &'static str = "shell";

    /// Interpreter every script runs through
    pub const INTERPRETER: &'static str = "/bin/sh";
}

impl Tool for ShellTool {
    fn run(&self, task: &Task, ctx: &Context) -> Result<()> {
        let script = interpolate(task.required_string("script")?, &ctx.vars)?;

        let guard = WorkingDirGuard::enter(&task.imported_path)?;
        let result = run_script(&task.name, &script, ctx);
        // A failed restore outranks the script's own result
        guard.restore()?;

        Ok(result?)
    }
}

/// Run a script through the interpreter in the current directory
fn run_script(task_name: &str, script: &str, ctx: &Context) -> ExecutionResult<()> {
    ctx.print_command(script);

    let status = Command::new(ShellTool::INTERPRETER)
        .arg("-c")
        .arg(script)
        .envs(&ctx.vars)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|error| ExecutionError::Spawn {
            program: ShellTool::INTERPRETER.to_string(),
            error,
        })?;

    if !status.success() {
        return Err(ExecutionError::ScriptFailed {
            task: task_name.to_string(),
            code: status.code(),
        });
    }

    Ok(())
}
