use clap::{CommandFactory, Parser};
use refchain::tooling::cli::{Cli, Commands};

#[test]
fn parse_valid_command_matrix() {
    let cases: Vec<Vec<&str>> = vec![
        vec!["refchain", "config"],
        vec!["refchain", "run", "flow.yaml"],
        vec!["refchain", "run", "flow.yaml", "--output-dir", "out"],
        vec!["refchain", "run", "flow.yaml", "--format", "json"],
        vec!["refchain", "--log-level", "debug", "run", "flow.yaml"],
        vec!["refchain", "--config", "custom.toml", "config"],
    ];

    for args in cases {
        let parsed = Cli::try_parse_from(args.clone());
        assert!(parsed.is_ok(), "expected valid parse for args: {args:?}");
    }
}

#[test]
fn parse_rejects_run_without_workflow() {
    assert!(Cli::try_parse_from(["refchain", "run"]).is_err());
    assert!(Cli::try_parse_from(["refchain", "replay"]).is_err());
}

#[test]
fn run_arguments_are_captured() {
    let cli = Cli::try_parse_from(["refchain", "run", "flow.yaml", "--output-dir", "out"]).unwrap();
    match cli.command {
        Commands::Run {
            workflow,
            output_dir,
            format,
        } => {
            assert_eq!(workflow.to_str(), Some("flow.yaml"));
            assert_eq!(output_dir.as_deref().and_then(|p| p.to_str()), Some("out"));
            assert_eq!(format, "text");
        }
        Commands::Config => panic!("expected run"),
    }
}

#[test]
fn command_definition_is_consistent() {
    Cli::command().debug_assert();
}
