#![forbid(unsafe_code)]

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::build;

pub mod lint;

#[derive(Debug, Parser)]
#[command(name = "srcpackc", about = "Source distribution builder CLI", version)]
pub struct Cli {
    /// Logging filter (overrides SRCPACK_LOG)
    #[arg(long = "log", default_value = "info", global = true)]
    pub verbosity: String,

    /// Emit machine-readable JSON output where applicable
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build a source distribution archive and manifest
    Build(BuildArgs),
    /// Validate a project without writing artifacts
    Lint(lint::LintArgs),
}

#[derive(Debug, Clone, Parser)]
pub struct BuildArgs {
    /// Root directory of the project (must contain about.toml)
    #[arg(long = "in", value_name = "DIR")]
    pub input: PathBuf,

    /// Output path for the distribution archive (defaults to dist/<name>-<version>.zip)
    #[arg(long = "out", value_name = "FILE")]
    pub archive_out: Option<PathBuf>,

    /// Output path for the generated manifest (JSON)
    #[arg(long, value_name = "FILE", default_value = "dist/MANIFEST.json")]
    pub manifest: PathBuf,

    /// When set, the command validates input without writing artifacts
    #[arg(long)]
    pub dry_run: bool,
}

pub fn run() -> Result<()> {
    run_with_cli(Cli::parse())
}

/// Resolve the logging filter to use for subscriber initialisation.
pub fn resolve_env_filter(cli: &Cli) -> String {
    std::env::var("SRCPACK_LOG").unwrap_or_else(|_| cli.verbosity.clone())
}

/// Execute the CLI using a pre-parsed argument set.
pub fn run_with_cli(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Build(args) => build::run(&build::BuildOptions::from(args))?,
        Command::Lint(args) => lint::handle(args, cli.json)?,
    }

    Ok(())
}
