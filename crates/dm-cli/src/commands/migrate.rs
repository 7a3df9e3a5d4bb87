//! up, down and to command implementations

use anyhow::Result;
use dm_core::{Direction, Version};
use dm_migrate::{MigrateError, MigrationOutcome};

use crate::cli::{GlobalArgs, MigrateArgs, RunOptions, ToArgs};
use crate::commands::common::{apply_overrides, build_engine, load_config};

/// Execute the up command
pub fn execute_up(args: &MigrateArgs, global: &GlobalArgs) -> Result<()> {
    run(&args.run, global, Direction::Up, args.target)
}

/// Execute the down command
pub fn execute_down(args: &MigrateArgs, global: &GlobalArgs) -> Result<()> {
    run(&args.run, global, Direction::Down, args.target)
}

/// Execute the to command
pub fn execute_to(args: &ToArgs, global: &GlobalArgs) -> Result<()> {
    run(&args.run, global, Direction::Up, Some(args.target_version))
}

fn run(
    options: &RunOptions,
    global: &GlobalArgs,
    direction: Direction,
    target: Option<Version>,
) -> Result<()> {
    let mut config = load_config(global)?;
    apply_overrides(
        &mut config,
        options.file.as_deref(),
        options.transaction_override(),
    );
    let target = target.or(config.target_version);

    let engine = build_engine(&config)?;
    report(engine.process_with(direction, target))
}

fn report(result: Result<MigrationOutcome, MigrateError>) -> Result<()> {
    match result {
        Ok(outcome) => {
            println!(
                "Migrated {} from {} to {} ({} statement(s) executed)",
                outcome.direction, outcome.from, outcome.to, outcome.summary.executed
            );
            if outcome.summary.failed > 0 {
                println!(
                    "  {} statement(s) failed and were skipped",
                    outcome.summary.failed
                );
            }
            Ok(())
        }
        Err(MigrateError::NothingToRun { current, direction }) => {
            println!("Nothing to run {}: database is at version {}", direction, current);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
