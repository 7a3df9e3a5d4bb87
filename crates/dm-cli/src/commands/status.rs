//! Status command implementation

use anyhow::{Context, Result};

use crate::cli::{GlobalArgs, OutputFormat, StatusArgs};
use crate::commands::common::{apply_overrides, build_engine, load_config};

/// Execute the status command
pub fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let mut config = load_config(global)?;
    apply_overrides(&mut config, args.file.as_deref(), None);

    let engine = build_engine(&config)?;
    let status = engine.status()?;

    match args.output {
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(&status).context("Failed to serialize status")?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            println!("Current version:  {}", status.current);
            println!("Latest in script: {}", status.latest_available);
            println!("Pending up:       {}", status.pending_up);
        }
    }
    Ok(())
}
