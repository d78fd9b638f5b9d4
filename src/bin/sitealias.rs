// src/bin/sitealias.rs

use clap::Parser;
use colored::Colorize;
use sitealias::{
    cli::{Cli, dispatcher, prompt::ConsolePrompt},
    system::executor,
};

/// The main entry point of the `sitealias` application.
/// It sets up logging, parses arguments, dispatches to the correct handler,
/// and performs centralized error handling.
fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let mut io = ConsolePrompt::new();

    // The entire application logic is wrapped in a Result to enable centralized error handling.
    if let Err(e) = dispatcher::dispatch(cli.args, &mut io) {
        // A child process that ran and failed already wrote to stderr; just
        // mirror its exit code.
        if let Some(executor::ExecutionError::NonZeroExitStatus { code, .. }) =
            e.downcast_ref::<executor::ExecutionError>()
        {
            std::process::exit(*code);
        }

        // For all other errors, print a formatted message to stderr and exit with a failure code.
        eprintln!("\n{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}
