//! Tests for ingest CLI command
//!
//! Tests the ingest command handler:
//! - Ingesting into a new collection (human and JSON)
//! - Worker override and reset
//! - Error cases (missing folder, zero workers, unreadable logs)

use crate::cli::test_helpers::{create_cli_fixture, create_cli_fixture_with};
use jenkins_rag::cli::commands::ingest::{execute, IngestArgs};
use jenkins_rag::cli::OutputFormat;
use jenkins_rag::Config;

fn args() -> IngestArgs {
    IngestArgs {
        persist_dir: None,
        collection_name: None,
        log_folder: None,
        workers: None,
        reset: false,
        quiet: true,
    }
}

#[tokio::test]
async fn test_ingest_new_collection_human() {
    let fixture = create_cli_fixture();

    let result = execute(args(), &fixture.services, OutputFormat::Human).await;

    assert!(result.is_ok(), "Ingest should succeed: {:?}", result.err());
    let collection = fixture
        .services
        .store
        .get_collection("jenkins_logs")
        .unwrap();
    assert_eq!(collection.count(), 3);
}

#[tokio::test]
async fn test_ingest_json_with_worker_override() {
    let fixture = create_cli_fixture();

    let result = execute(
        IngestArgs {
            workers: Some(16),
            ..args()
        },
        &fixture.services,
        OutputFormat::Json,
    )
    .await;

    assert!(result.is_ok(), "Ingest should succeed: {:?}", result.err());
}

#[tokio::test]
async fn test_ingest_twice_with_reset() {
    let fixture = create_cli_fixture();

    execute(args(), &fixture.services, OutputFormat::Human)
        .await
        .unwrap();
    execute(
        IngestArgs {
            reset: true,
            ..args()
        },
        &fixture.services,
        OutputFormat::Human,
    )
    .await
    .unwrap();

    let collection = fixture
        .services
        .store
        .get_collection("jenkins_logs")
        .unwrap();
    assert_eq!(collection.count(), 3);
}

#[tokio::test]
async fn test_ingest_zero_workers_rejected() {
    let fixture = create_cli_fixture();

    let result = execute(
        IngestArgs {
            workers: Some(0),
            ..args()
        },
        &fixture.services,
        OutputFormat::Human,
    )
    .await;

    assert!(result.is_err());
    assert!(!fixture.services.store.collection_exists("jenkins_logs"));
}

#[tokio::test]
async fn test_ingest_missing_folder() {
    let mut config = Config::default();
    config.indexing.log_folder = "/nonexistent/jenkins/logs".into();
    let (services, _llm, _temp) = crate::common::create_test_services(config);

    let result = execute(args(), &std::sync::Arc::new(services), OutputFormat::Human).await;

    let err = result.unwrap_err().to_string();
    assert!(err.contains("not a directory"), "unexpected error: {err}");
}

#[tokio::test]
async fn test_ingest_unreadable_log_fails() {
    let mut fixture = create_cli_fixture();
    fixture.logs.add_bytes("job-1/binary.txt", &[0xff, 0x00, 0xfe]);

    let result = execute(args(), &fixture.services, OutputFormat::Human).await;

    let err = result.unwrap_err().to_string();
    assert!(err.contains("binary.txt"), "unexpected error: {err}");
}

#[tokio::test]
async fn test_ingest_unreadable_log_skipped_when_configured() {
    let mut config = Config::default();
    config.indexing.skip_failed_files = true;
    let mut fixture = create_cli_fixture_with(config);
    fixture.logs.add_bytes("job-1/binary.txt", &[0xff, 0x00, 0xfe]);

    let result = execute(args(), &fixture.services, OutputFormat::Json).await;

    assert!(result.is_ok(), "Ingest should skip bad file: {:?}", result.err());
}
