// src/cli/dispatcher.rs

use anyhow::Result;
use colored::Colorize;

use crate::{
    cli::handlers,
    core::{
        chain::{CommandRegistry, Runnable},
        prompt::Prompt,
    },
    system::executor::ExecutionError,
};

/// Defines a system command, its aliases, and its handler function.
/// The handler signature is kept consistent across all commands for simplicity in the registry.
pub struct CommandDefinition {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    handler: fn(Vec<String>, &mut dyn Prompt) -> Result<()>,
}

/// The single source of truth for all system commands.
/// To add a new command, simply add a new entry to this static array.
pub static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition {
        name: "alias",
        aliases: &["gsa"],
        handler: handlers::alias::handle,
    },
    CommandDefinition {
        name: "chain",
        aliases: &[],
        handler: handlers::chain::handle,
    },
    CommandDefinition {
        name: "exec",
        aliases: &[],
        handler: handlers::exec::handle,
    },
];

/// Finds a command definition in the registry by its name or alias.
pub fn find_command(name: &str) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
}

/// The main application dispatcher. Routes the first argument to its
/// handler and hands the rest through untouched.
pub fn dispatch(all_args: Vec<String>, io: &mut dyn Prompt) -> Result<()> {
    log::debug!("Dispatching args: {:?}", all_args);

    let mut args = all_args.into_iter();
    let Some(action) = args.next() else {
        print_usage();
        return Ok(());
    };

    match find_command(&action) {
        Some(command) => (command.handler)(args.collect(), io),
        None => {
            print_usage();
            Err(anyhow::anyhow!("Unknown command '{action}'."))
        }
    }
}

fn print_usage() {
    println!("{}", "Available commands:".bold());
    for command in COMMAND_REGISTRY {
        if command.aliases.is_empty() {
            println!("  {}", command.name.cyan());
        } else {
            println!(
                "  {} {}",
                command.name.cyan(),
                format!("({})", command.aliases.join(", ")).dimmed()
            );
        }
    }
}

/// Adapts the static command registry to the chain executor's registry
/// port, so chain files can invoke any registered command by name.
pub struct CliRegistry;

impl CommandRegistry for CliRegistry {
    fn find(&self, command_id: &str) -> Option<Box<dyn Runnable + '_>> {
        find_command(command_id).map(|definition| Box::new(CliRunnable { definition }) as _)
    }
}

struct CliRunnable {
    definition: &'static CommandDefinition,
}

impl Runnable for CliRunnable {
    fn run(
        &self,
        arguments: &[(String, String)],
        options: &[(String, String)],
        io: &mut dyn Prompt,
    ) -> Result<i32> {
        // Argument values are forwarded positionally, in declaration order.
        // Options become `--name value` pairs, or a bare `--name` for flags.
        let mut argv: Vec<String> = arguments.iter().map(|(_, value)| value.clone()).collect();
        for (name, value) in options {
            argv.push(format!("--{name}"));
            if !value.is_empty() {
                argv.push(value.clone());
            }
        }

        match (self.definition.handler)(argv, io) {
            Ok(()) => Ok(0),
            Err(e) => {
                if let Some(ExecutionError::NonZeroExitStatus { code, .. }) =
                    e.downcast_ref::<ExecutionError>()
                {
                    return Ok(*code);
                }
                eprintln!("{}: {}", "Error".red().bold(), e);
                Ok(1)
            }
        }
    }
}
