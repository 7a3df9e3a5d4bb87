//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};
use dm_core::Version;

/// dbmigrator - apply and roll back versioned SQL migration scripts
#[derive(Parser, Debug)]
#[command(name = "dm")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory searched for dm.json / dm.yml / dm.yaml
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Explicit config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override the database path
    #[arg(short, long, global = true)]
    pub database: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply pending versions
    Up(MigrateArgs),

    /// Undo the current version, or everything above --target
    Down(MigrateArgs),

    /// Move to a version, up or down as needed
    To(ToArgs),

    /// Show the statements a run would execute, without running them
    Plan(PlanArgs),

    /// Show the recorded version and what the script offers
    Status(StatusArgs),
}

/// Options shared by every command that executes statements
#[derive(Args, Debug, Clone, Default)]
pub struct RunOptions {
    /// Migration script path (overrides config)
    #[arg(short, long)]
    pub file: Option<String>,

    /// Run all statements in one transaction
    #[arg(long, conflicts_with = "no_transaction")]
    pub transaction: bool,

    /// Run statements one by one, continuing past failures
    #[arg(long)]
    pub no_transaction: bool,
}

impl RunOptions {
    /// `Some` only when a flag was given, so config stays in charge otherwise.
    pub fn transaction_override(&self) -> Option<bool> {
        match (self.transaction, self.no_transaction) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

/// Arguments for the up and down commands
#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// Stop at this version
    #[arg(short, long, value_parser = parse_version)]
    pub target: Option<Version>,

    #[command(flatten)]
    pub run: RunOptions,
}

/// Arguments for the to command
#[derive(Args, Debug)]
pub struct ToArgs {
    /// Version to end up at
    #[arg(value_name = "VERSION", value_parser = parse_version)]
    pub target_version: Version,

    #[command(flatten)]
    pub run: RunOptions,
}

/// Arguments for the plan command
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Plan a down run instead of an up run
    #[arg(long)]
    pub down: bool,

    /// Stop at this version
    #[arg(short, long, value_parser = parse_version)]
    pub target: Option<Version>,

    /// Migration script path (overrides config)
    #[arg(short, long)]
    pub file: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Migration script path (overrides config)
    #[arg(short, long)]
    pub file: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Output formats for the reporting commands
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON document
    Json,
}

fn parse_version(value: &str) -> Result<Version, String> {
    value.parse().map_err(|e: dm_core::CoreError| e.to_string())
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
