//! jenkins-rag CLI - question answering over Jenkins CI logs
//!
//! # Examples
//!
//! ```bash
//! # Chunk and index every *.txt log under data/logs
//! jenkins-rag ingest --log-folder data/logs --workers 8
//!
//! # Ask one question
//! jenkins-rag ask "Why did the Test stage fail?"
//!
//! # Ask every question from the [questions] table
//! jenkins-rag ask
//!
//! # Preview the stage chunks of a log
//! jenkins-rag chunk data/logs/build-42.txt
//! ```

use clap::Parser;
use jenkins_rag::cli::{run, Cli};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "jenkins_rag=info".into());
    let registry = tracing_subscriber::registry().with(filter);

    // stdout carries command output
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_json);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
