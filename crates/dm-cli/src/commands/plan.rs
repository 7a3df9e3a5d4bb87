//! Plan command implementation

use anyhow::{Context, Result};
use dm_core::Direction;

use crate::cli::{GlobalArgs, OutputFormat, PlanArgs};
use crate::commands::common::{apply_overrides, build_engine, load_config};

/// Execute the plan command
pub fn execute(args: &PlanArgs, global: &GlobalArgs) -> Result<()> {
    let mut config = load_config(global)?;
    apply_overrides(&mut config, args.file.as_deref(), None);

    let direction = if args.down {
        Direction::Down
    } else {
        Direction::Up
    };
    let target = args.target.or(config.target_version);

    let engine = build_engine(&config)?;
    let plan = engine.plan_with(direction, target)?;

    match args.output {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&plan).context("Failed to serialize plan")?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            if plan.is_empty() {
                println!(
                    "Nothing to run {}: database is at version {}",
                    plan.direction, plan.current
                );
                return Ok(());
            }
            println!(
                "Plan: {} from {} to {} ({} statement(s))",
                plan.direction,
                plan.current,
                plan.next_version,
                plan.statements.len()
            );
            for statement in &plan.statements {
                println!("  {}", statement);
            }
        }
    }
    Ok(())
}
