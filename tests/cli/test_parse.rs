//! Tests for argument parsing and configuration overrides

use clap::Parser;
use jenkins_rag::cli::{load_config, Cli, Commands, OutputFormat};
use jenkins_rag::Config;
use std::path::PathBuf;

#[test]
fn test_parse_ingest_overrides() {
    let cli = Cli::try_parse_from([
        "jenkins-rag",
        "--format",
        "json",
        "ingest",
        "--persist-dir",
        "/tmp/store",
        "--collection-name",
        "nightly",
        "--log-folder",
        "/var/log/jenkins",
        "-w",
        "8",
        "--reset",
    ])
    .unwrap();

    assert_eq!(cli.format, OutputFormat::Json);
    let Commands::Ingest(args) = &cli.command else {
        panic!("expected ingest command");
    };
    assert_eq!(args.workers, Some(8));
    assert!(args.reset);

    let mut config = Config::default();
    cli.command.apply_overrides(&mut config);

    assert_eq!(config.storage.persist_dir, PathBuf::from("/tmp/store"));
    assert_eq!(config.storage.collection_name, "nightly");
    assert_eq!(config.indexing.log_folder, PathBuf::from("/var/log/jenkins"));
}

#[test]
fn test_parse_ask_defaults_leave_config_alone() {
    let cli = Cli::try_parse_from(["jenkins-rag", "ask", "Why did it fail?"]).unwrap();

    let Commands::Ask(args) = &cli.command else {
        panic!("expected ask command");
    };
    assert_eq!(args.question.as_deref(), Some("Why did it fail?"));
    assert_eq!(args.n_results, None);

    let mut config = Config::default();
    cli.command.apply_overrides(&mut config);

    assert_eq!(config.storage.collection_name, "jenkins_logs");
}

#[test]
fn test_parse_ask_without_question() {
    let cli = Cli::try_parse_from(["jenkins-rag", "ask", "-k", "5"]).unwrap();

    let Commands::Ask(args) = &cli.command else {
        panic!("expected ask command");
    };
    assert!(args.question.is_none());
    assert_eq!(args.n_results, Some(5));
}

#[test]
fn test_parse_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "jenkins-rag",
        "show-config",
        "--config",
        "ci.toml",
        "--log-json",
    ])
    .unwrap();

    assert_eq!(cli.config, Some(PathBuf::from("ci.toml")));
    assert!(cli.log_json);
}

#[test]
fn test_parse_rejects_unknown_format() {
    assert!(Cli::try_parse_from(["jenkins-rag", "--format", "xml", "show-config"]).is_err());
}

#[test]
fn test_collection_flag_fixes_invalid_settings_file() {
    let temp = tempfile::TempDir::new().unwrap();
    let settings = temp.path().join("settings.toml");
    std::fs::write(&settings, "[storage]\ncollection_name = \"bad name!\"\n").unwrap();
    let settings = settings.to_str().unwrap();

    let plain = Cli::try_parse_from(["jenkins-rag", "--config", settings, "ask", "Why?"]).unwrap();
    assert!(load_config(&plain).is_err());

    let fixed = Cli::try_parse_from([
        "jenkins-rag",
        "--config",
        settings,
        "ask",
        "--collection-name",
        "nightly",
        "Why?",
    ])
    .unwrap();
    let config = load_config(&fixed).unwrap();
    assert_eq!(config.storage.collection_name, "nightly");
}
