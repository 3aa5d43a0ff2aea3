//! Command-line surface: subcommands and the options shared by all of them.
use std::path::PathBuf;

use clap::builder::FalseyValueParser;
use clap::{ArgAction, Parser, Subcommand};

/// Top-level CLI entry point for machine setup.
#[derive(Parser, Debug)]
#[command(
    name = "machine-setup",
    about = "Provision a developer machine with a curated toolset",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// Config file path (default: ~/.config/.machine-setup/config.yaml)
    #[arg(long, global = true, env = "MACHINE_SETUP_CONFIG_PATH")]
    pub config: Option<PathBuf>,

    /// Skip the interactive welcome and selection prompts and select every tool
    #[arg(
        long = "no-form",
        global = true,
        env = "MACHINE_SETUP_NO_FORM",
        action = ArgAction::SetTrue,
        value_parser = FalseyValueParser::new()
    )]
    pub no_form: bool,
}

impl GlobalOpts {
    /// The config path to use for this run.
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        crate::config::resolve_path(self.config.clone())
    }
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize the config and install the selected dev tools
    Setup,
    /// Upgrade packages (default: every package in the config)
    Update(PackagesOpts),
    /// Remove packages and drop them from the config
    Uninstall(RequiredPackagesOpts),
    /// Show which configured packages are installed
    Status,
    /// Print version information
    Version,
}

/// Optional list of package names.
#[derive(Parser, Debug, Clone)]
pub struct PackagesOpts {
    /// Package names
    pub names: Vec<String>,
}

/// Non-empty list of package names.
#[derive(Parser, Debug, Clone)]
pub struct RequiredPackagesOpts {
    /// Package names
    #[arg(required = true)]
    pub names: Vec<String>,
}

impl Command {
    /// Name used for the per-command log file.
    #[must_use]
    pub const fn log_name(&self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::Update(_) => "update",
            Self::Uninstall(_) => "uninstall",
            Self::Status => "status",
            Self::Version => "version",
        }
    }
}
