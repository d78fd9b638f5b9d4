// src/cli/handlers/alias.rs

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use colored::Colorize;
use std::env;
use std::path::PathBuf;

use super::commons;
use crate::{
    cli::args::AliasArgs,
    constants::PROJECT_ALIAS_DIRNAME,
    core::{prompt::Prompt, resolver::Resolver, schema::Schema, settings},
    models::InputBag,
    system::{
        finder,
        generator::{AliasGenerator, YamlAliasGenerator},
    },
};

/// The main handler for the `alias` command.
/// Resolves every alias parameter and writes the site's YAML alias file.
pub fn handle(args: Vec<String>, io: &mut dyn Prompt) -> Result<()> {
    // 1. Parse arguments
    let alias_args = AliasArgs::try_parse_from(&args)?;

    let settings = settings::load_settings()?;

    // 2. Collect explicit flag values. Deprecated spellings travel under
    //    their own names; the resolver adopts them into the canonical field.
    let input = build_input_bag(&alias_args)?;

    // 3. Resolve the full record, asking for whatever is still missing.
    let schema = Schema::site_alias(&settings)?;
    let resolver = Resolver::new(&schema, !alias_args.autosolve);
    let record = resolver.resolve(&input, io)?;

    let name = record
        .get("name")
        .ok_or_else(|| anyhow!("Resolution finished without a site name."))?;
    let name = commons::validate_site_name(name)?;

    // 4. Decide where the alias file goes.
    let directory = target_directory(&record, &settings)?;

    let path = YamlAliasGenerator
        .generate(&record, &directory)
        .with_context(|| format!("Could not generate the alias for '{name}'."))?;

    println!(
        "{} {}",
        "Generated site alias:".green(),
        path.display().to_string().bold()
    );
    Ok(())
}

/// Maps present flags into the resolver's input bag. The `--site` flag
/// pre-fills `directory` with the project's own `console/` directory when a
/// project root can be found from the current directory.
fn build_input_bag(args: &AliasArgs) -> Result<InputBag> {
    let mut input = InputBag::new();

    let flags: [(&str, &Option<String>); 19] = [
        ("type", &args.r#type),
        ("name", &args.name),
        ("environment", &args.environment),
        ("drupal-root", &args.drupal_root),
        ("composer-root", &args.composer_root),
        ("server-root", &args.server_root),
        ("site-uri", &args.site_uri),
        ("host-name", &args.host_name),
        ("host", &args.host),
        ("host-port", &args.host_port),
        ("port", &args.port),
        ("user", &args.user),
        ("extra-options", &args.extra_options),
        ("account-name", &args.account_name),
        ("account-pass", &args.account_pass),
        ("account-mail", &args.account_mail),
        ("repo-type", &args.repo_type),
        ("repo-url", &args.repo_url),
        ("repo-branch", &args.repo_branch),
    ];
    for (name, value) in flags {
        if let Some(value) = value {
            input.set(name, value.clone());
        }
    }

    if let Some(directory) = &args.directory {
        input.set("directory", directory.clone());
    } else if args.site {
        let cwd = env::current_dir()?;
        let root = finder::find_project_root(&cwd).ok_or_else(|| {
            anyhow!("The --site flag requires running inside a project (no composer.json found).")
        })?;
        input.set(
            "directory",
            root.join(PROJECT_ALIAS_DIRNAME).display().to_string(),
        );
    }

    Ok(input)
}

/// The resolved `directory` value wins; otherwise the first configured alias
/// directory is used.
fn target_directory(
    record: &crate::models::ResolvedConfig,
    settings: &crate::models::Settings,
) -> Result<PathBuf> {
    if let Some(directory) = record.get("directory").filter(|d| !d.is_empty()) {
        return Ok(PathBuf::from(directory));
    }
    settings
        .alias_directories
        .first()
        .cloned()
        .ok_or_else(|| anyhow!("No alias directory is configured and none was provided."))
}
