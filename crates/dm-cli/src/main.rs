//! dbmigrator CLI - apply and roll back versioned SQL migration scripts

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::Cli;
use commands::{migrate, plan, status};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    match &cli.command {
        cli::Commands::Up(args) => migrate::execute_up(args, &cli.global),
        cli::Commands::Down(args) => migrate::execute_down(args, &cli.global),
        cli::Commands::To(args) => migrate::execute_to(args, &cli.global),
        cli::Commands::Plan(args) => plan::execute(args, &cli.global),
        cli::Commands::Status(args) => status::execute(args, &cli.global),
    }
}

/// `info` by default, `debug` with `--verbose`; `RUST_LOG` wins over both.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .format_target(verbose)
        .init();
}
