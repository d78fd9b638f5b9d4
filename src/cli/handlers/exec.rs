// src/cli/handlers/exec.rs

use anyhow::Result;
use clap::Parser;
use std::collections::HashMap;
use std::env;

use crate::{
    cli::args::ExecArgs,
    core::prompt::Prompt,
    system::executor,
};

/// The main handler for the `exec` command.
/// Runs a shell command in the current directory, forwarding its exit code.
pub fn handle(args: Vec<String>, _io: &mut dyn Prompt) -> Result<()> {
    let exec_args = ExecArgs::try_parse_from(&args)?;

    let command_line = exec_args.command.join(" ");
    let cwd = env::current_dir()?;

    executor::execute_command(&command_line, &cwd, &HashMap::new())?;
    Ok(())
}
