use super::*;
use clap::CommandFactory;

#[test]
fn verify_cli_args() {
    // Validates the entire command tree: short flag conflicts,
    // duplicate args, and other clap definition errors.
    Cli::command().debug_assert();
}

#[test]
fn test_up_with_target_and_file() {
    let cli = Cli::try_parse_from(["dm", "up", "--target", "1.2", "-f", "m.sql"]).unwrap();
    match cli.command {
        Commands::Up(args) => {
            assert_eq!(args.target, Some(Version::new(1, 2, 0)));
            assert_eq!(args.run.file.as_deref(), Some("m.sql"));
            assert_eq!(args.run.transaction_override(), None);
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn test_to_takes_positional_version() {
    let cli = Cli::try_parse_from(["dm", "to", "v2.0.1", "--no-transaction"]).unwrap();
    match cli.command {
        Commands::To(args) => {
            assert_eq!(args.target_version, Version::new(2, 0, 1));
            assert_eq!(args.run.transaction_override(), Some(false));
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn test_bad_version_rejected() {
    assert!(Cli::try_parse_from(["dm", "to", "abc"]).is_err());
    assert!(Cli::try_parse_from(["dm", "down", "--target", "0.0"]).is_err());
}

#[test]
fn test_transaction_flags_conflict() {
    assert!(Cli::try_parse_from(["dm", "up", "--transaction", "--no-transaction"]).is_err());
}

#[test]
fn test_global_args_after_subcommand() {
    let cli = Cli::try_parse_from(["dm", "status", "--verbose", "--config", "dm.yml"]).unwrap();
    assert!(cli.global.verbose);
    assert_eq!(cli.global.config.as_deref(), Some("dm.yml"));
    assert_eq!(cli.global.project_dir, ".");
}

#[test]
fn test_plan_defaults() {
    let cli = Cli::try_parse_from(["dm", "plan"]).unwrap();
    match cli.command {
        Commands::Plan(args) => {
            assert!(!args.down);
            assert_eq!(args.output, OutputFormat::Text);
        }
        other => panic!("unexpected command {other:?}"),
    }
}
