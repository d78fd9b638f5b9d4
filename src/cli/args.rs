// src/cli/args.rs
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true)] // Important: Prevents clap from expecting "alias" as the first arg
pub struct AliasArgs {
    /// Save the alias inside the project's own `console/` directory.
    #[arg(long)]
    pub site: bool,

    /// The target type of the alias (local, ssh or container).
    #[arg(long, value_name = "TYPE")]
    pub r#type: Option<String>,

    /// The site name. If not provided, will be asked interactively.
    #[arg(long)]
    pub name: Option<String>,

    /// The environment this alias points at (e.g. "develop", "stage").
    #[arg(long)]
    pub environment: Option<String>,

    /// The project root on the target machine.
    #[arg(long)]
    pub drupal_root: Option<String>,

    /// Deprecated spelling of --drupal-root, kept for older scripts.
    #[arg(long, hide = true)]
    pub composer_root: Option<String>,

    /// The web server document root.
    #[arg(long)]
    pub server_root: Option<String>,

    /// The URI the site answers on.
    #[arg(long)]
    pub site_uri: Option<String>,

    /// The remote host to connect to (ssh and container types).
    #[arg(long)]
    pub host_name: Option<String>,

    /// Deprecated spelling of --host-name.
    #[arg(long, hide = true)]
    pub host: Option<String>,

    /// The remote port to connect to.
    #[arg(long)]
    pub host_port: Option<String>,

    /// Deprecated spelling of --host-port.
    #[arg(long, hide = true)]
    pub port: Option<String>,

    /// The user to connect as.
    #[arg(long)]
    pub user: Option<String>,

    /// Extra transport options, or one of the labels from the settings file.
    #[arg(long)]
    pub extra_options: Option<String>,

    /// The administrator account name.
    #[arg(long)]
    pub account_name: Option<String>,

    /// The administrator account password.
    #[arg(long)]
    pub account_pass: Option<String>,

    /// The administrator account mail.
    #[arg(long)]
    pub account_mail: Option<String>,

    /// The version control system holding the site (e.g. "git").
    #[arg(long)]
    pub repo_type: Option<String>,

    /// The repository URL.
    #[arg(long)]
    pub repo_url: Option<String>,

    /// The branch to track.
    #[arg(long)]
    pub repo_branch: Option<String>,

    /// Where to write the alias file. Defaults to the configured directories.
    #[arg(long)]
    pub directory: Option<String>,

    /// Do not ask for user input, use defaults for unspecified values.
    #[arg(long)]
    pub autosolve: bool,
}

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true)]
pub struct ChainArgs {
    /// The chain file describing the commands to run, in order.
    pub file: PathBuf,

    /// Print each command before executing it.
    #[arg(long)]
    pub explain: bool,
}

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true)]
pub struct ExecArgs {
    /// The shell command line to execute, verbatim.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
    pub command: Vec<String>,
}
