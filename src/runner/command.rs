//! Command execution
//!
//! External processes are reached only through [`CommandRunner`], so the
//! executor can be driven by a recording fake in tests.

use crate::error::{ExecutionError, ExecutionResult, MISSING_TOOL_EXIT_CODE};
use crate::runner::{interpolate, Command, Context};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command as StdCommand, ExitStatus, Stdio};

/// A fully resolved command, ready to hand to a [`CommandRunner`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program to start (the interpreter)
    pub program: String,

    /// Arguments, ending with the interpolated command string
    pub args: Vec<String>,

    /// Working directory for the process
    pub dir: PathBuf,

    /// Extra environment on top of the inherited one
    pub env: Vec<(String, String)>,

    /// The interpolated command string, used in messages
    pub command: String,
}

/// Capability boundary for everything that touches the outside world
pub trait CommandRunner {
    /// Run an invocation to completion and return its exit code
    ///
    /// Only a failure to start the process is an `Err`; a non-zero exit is
    /// reported through the returned code.
    fn run(&mut self, invocation: &Invocation) -> ExecutionResult<i32>;

    /// Delete a file or directory tree; a missing path is not an error
    fn remove(&mut self, path: &Path) -> ExecutionResult<()>;
}

/// Runs invocations as real child processes with inherited stdio
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        ProcessRunner
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&mut self, invocation: &Invocation) -> ExecutionResult<i32> {
        let mut command = StdCommand::new(&invocation.program);
        command.args(&invocation.args);
        command.current_dir(&invocation.dir);

        command.stdin(Stdio::inherit());
        command.stdout(Stdio::inherit());
        command.stderr(Stdio::inherit());

        for (key, value) in &invocation.env {
            command.env(key, value);
        }

        let status = command.status().map_err(|_| ExecutionError::MissingTool {
            command: invocation.command.clone(),
        })?;

        Ok(exit_code(status))
    }

    fn remove(&mut self, path: &Path) -> ExecutionResult<()> {
        let result = match fs::symlink_metadata(path) {
            Ok(meta) if meta.is_dir() => fs::remove_dir_all(path),
            Ok(_) => fs::remove_file(path),
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(ExecutionError::Remove {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

/// Map a process status to a shell-style exit code
#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;

    status
        .code()
        .or_else(|| status.signal().map(|signal| 128 + signal))
        .unwrap_or(1)
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}

/// Resolve a command against the context into an [`Invocation`]
pub fn build_invocation(cmd: &Command, ctx: &Context) -> ExecutionResult<Invocation> {
    let exec_str = interpolate(cmd.exec(), &ctx.vars)?;

    let dir = match cmd.dir() {
        Some(dir) => ctx.working_dir.join(interpolate(dir, &ctx.vars)?),
        None => ctx.working_dir.clone(),
    };

    let (program, interpreter_args) = match ctx.interpreter.split_first() {
        Some((program, rest)) => (program.clone(), rest.to_vec()),
        None => {
            return Err(ExecutionError::MissingTool {
                command: exec_str,
            })
        }
    };

    let mut args = interpreter_args;
    args.push(exec_str.clone());

    let mut env: Vec<(String, String)> = ctx
        .vars
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    env.sort();

    Ok(Invocation {
        program,
        args,
        dir,
        env,
        command: exec_str,
    })
}

/// Run a command through the runner, turning a non-zero exit into an error
pub fn execute_command<R: CommandRunner + ?Sized>(
    cmd: &Command,
    ctx: &Context,
    runner: &mut R,
) -> ExecutionResult<()> {
    let invocation = build_invocation(cmd, ctx)?;

    if !cmd.is_quiet() {
        let print_str = interpolate(cmd.print(), &ctx.vars).unwrap_or_else(|_| cmd.print().to_string());
        ctx.print_run(&print_str);
    }

    if ctx.dry_run {
        return Ok(());
    }

    ctx.print_debug(&format!(
        "exec {} {:?} in {}",
        invocation.program,
        invocation.args,
        invocation.dir.display()
    ));

    match runner.run(&invocation)? {
        0 => Ok(()),
        MISSING_TOOL_EXIT_CODE => Err(ExecutionError::MissingTool {
            command: invocation.command,
        }),
        code => Err(ExecutionError::CommandFailed {
            command: invocation.command,
            code,
        }),
    }
}
