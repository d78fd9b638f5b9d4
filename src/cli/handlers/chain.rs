// src/cli/handlers/chain.rs

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use serde::Deserialize;
use std::fs;

use crate::{
    cli::{args::ChainArgs, dispatcher::CliRegistry},
    core::{chain::ChainRunner, prompt::Prompt},
    models::{ChainItem, OptionValue},
};

/// One `[[step]]` entry of a chain file, before conversion into a queue item.
#[derive(Debug, Deserialize)]
struct StepDef {
    command: String,
    #[serde(default)]
    arguments: toml::Table,
    #[serde(default)]
    options: toml::Table,
}

#[derive(Debug, Deserialize)]
struct ChainFile {
    #[serde(default)]
    step: Vec<StepDef>,
}

/// The main handler for the `chain` command.
/// Reads an ordered command queue from a TOML file and runs it fail-fast.
pub fn handle(args: Vec<String>, io: &mut dyn Prompt) -> Result<()> {
    let chain_args = ChainArgs::try_parse_from(&args)?;

    let content = fs::read_to_string(&chain_args.file)
        .with_context(|| format!("Could not read chain file '{}'.", chain_args.file.display()))?;
    let mut queue = parse_chain(&content)
        .with_context(|| format!("Invalid chain file '{}'.", chain_args.file.display()))?;

    if queue.is_empty() {
        println!("The chain file contains no steps; nothing to do.");
        return Ok(());
    }

    let runner = ChainRunner::new(&CliRegistry).with_explain(chain_args.explain);
    let result = runner.run(&mut queue, io)?;

    if !result.success() {
        return Err(anyhow!(
            "Chain '{}' aborted: a step exited with code {}. Remaining steps were not run.",
            chain_args.file.display(),
            result.exit_code
        ));
    }
    Ok(())
}

/// Converts the parsed file into queue items. Argument and option tables
/// keep their file order.
fn parse_chain(content: &str) -> Result<Vec<ChainItem>> {
    let file: ChainFile = toml::from_str(content)?;

    file.step
        .into_iter()
        .map(|step| {
            let arguments = step
                .arguments
                .into_iter()
                .map(|(name, value)| Ok((name, scalar_to_string(&value)?)))
                .collect::<Result<Vec<_>>>()?;
            let options = step
                .options
                .into_iter()
                .map(|(name, value)| {
                    let value = match value {
                        toml::Value::Boolean(flag) => OptionValue::Flag(flag),
                        other => OptionValue::Value(scalar_to_string(&other)?),
                    };
                    Ok((name, value))
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(ChainItem {
                command: step.command,
                arguments,
                options,
            })
        })
        .collect()
}

fn scalar_to_string(value: &toml::Value) -> Result<String> {
    match value {
        toml::Value::String(text) => Ok(text.clone()),
        toml::Value::Integer(number) => Ok(number.to_string()),
        toml::Value::Float(number) => Ok(number.to_string()),
        toml::Value::Boolean(flag) => Ok(flag.to_string()),
        other => Err(anyhow!(
            "Unsupported value '{other}' in chain file; only scalars are allowed."
        )),
    }
}
