// src/system/executor.rs

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::Path;
use std::process::{Child, Command as StdCommand, Stdio};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Command could not be parsed: {0}")]
    CommandParse(String),
    #[error("Command '{0}' could not be executed: {1}")]
    CommandFailed(String, std::io::Error),
    #[error("Command '{command}' exited with code {code}.")]
    NonZeroExitStatus { command: String, code: i32 },
}

/// Runs a shell command line in `cwd` and blocks until it finishes. Stdout
/// and stderr are inherited, so the child writes straight to the user's
/// terminal. A non-zero exit surfaces as an error carrying the code.
pub fn execute_command(
    command_line: &str,
    cwd: &Path,
    env_vars: &HashMap<String, String>,
) -> Result<(), ExecutionError> {
    let line = command_line.trim();
    if line.is_empty() {
        // An empty command is a success, not an error.
        return Ok(());
    }

    let parts =
        shlex::split(line).ok_or_else(|| ExecutionError::CommandParse(line.to_string()))?;
    let Some((program, args)) = parts.split_first() else {
        return Ok(());
    };

    let status = spawn_child(line, program, args, cwd, env_vars)
        .map_err(|e| ExecutionError::CommandFailed(line.to_string(), e))?
        .wait()
        .map_err(|e| ExecutionError::CommandFailed(line.to_string(), e))?;

    if !status.success() {
        return Err(ExecutionError::NonZeroExitStatus {
            command: line.to_string(),
            code: status.code().unwrap_or(1),
        });
    }
    Ok(())
}

/// Spawns the child directly, falling back to `cmd /C <line>` on Windows so
/// shell built-ins like `echo` keep working.
fn spawn_child(
    line: &str,
    program: &str,
    args: &[String],
    cwd: &Path,
    env_vars: &HashMap<String, String>,
) -> Result<Child, std::io::Error> {
    let cwd = dunce::simplified(cwd);

    let direct = StdCommand::new(program)
        .args(args)
        .current_dir(cwd)
        .envs(env_vars)
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn();

    match direct {
        Err(e) if e.kind() == ErrorKind::NotFound && cfg!(target_os = "windows") => {
            log::debug!("Command '{}' not found. Retrying with cmd /C.", program);
            StdCommand::new("cmd")
                .arg("/C")
                .arg(line) // cmd gets the full, unparsed line
                .current_dir(cwd)
                .envs(env_vars)
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit())
                .spawn()
        }
        other => other,
    }
}
