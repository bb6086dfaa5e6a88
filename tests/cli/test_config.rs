//! Tests for show-config CLI command

use crate::cli::test_helpers::create_cli_fixture;
use jenkins_rag::cli::commands::config::{execute, ConfigArgs};
use jenkins_rag::cli::OutputFormat;

#[tokio::test]
async fn test_show_config_human() {
    let fixture = create_cli_fixture();

    let result = execute(ConfigArgs { all: true }, &fixture.services, OutputFormat::Human).await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_show_config_json() {
    let fixture = create_cli_fixture();

    let result = execute(ConfigArgs { all: false }, &fixture.services, OutputFormat::Json).await;

    assert!(result.is_ok());
}
