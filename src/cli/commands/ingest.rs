//! Ingest command - chunk a log folder and index it

use crate::cli::output::{self, colors, format_duration};
use crate::cli::OutputFormat;
use crate::core::services::{IngestRequest, Services};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments for the ingest command
#[derive(Args, Debug)]
pub struct IngestArgs {
    /// Directory holding the persistent index [default: storage.persist_dir]
    #[arg(long, value_name = "DIR")]
    pub persist_dir: Option<PathBuf>,

    /// Collection receiving the chunks [default: storage.collection_name]
    #[arg(long, value_name = "NAME")]
    pub collection_name: Option<String>,

    /// Folder searched recursively for logs [default: indexing.log_folder]
    #[arg(long, value_name = "DIR")]
    pub log_folder: Option<PathBuf>,

    /// Number of files chunked in parallel [default: indexing.no_of_threads]
    #[arg(long, short = 'w')]
    pub workers: Option<usize>,

    /// Empty the collection before indexing
    #[arg(long)]
    pub reset: bool,

    /// Suppress progress output
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

/// Ingestion result response
#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub collection: String,
    pub log_folder: String,
    pub files_discovered: usize,
    pub files_chunked: usize,
    pub files_failed: usize,
    pub chunks_created: usize,
    pub chunks_indexed: usize,
    pub collection_size: usize,
    pub duration_secs: f64,
}

/// Execute the ingest command
pub async fn execute(
    args: IngestArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = &services.config;
    let log_folder = config.indexing.log_folder.clone();

    if !log_folder.is_dir() {
        return Err(format!(
            "Log folder '{}' is not a directory. Pass --log-folder or set indexing.log_folder.",
            log_folder.display()
        )
        .into());
    }

    if args.workers == Some(0) {
        return Err("Worker count must be at least 1.".into());
    }

    config.log_config();

    if !args.quiet && format == OutputFormat::Human {
        eprintln!(
            "Ingesting {} into '{}'...",
            colors::file_path(&log_folder.display().to_string()),
            colors::label(&config.storage.collection_name)
        );
    }

    let stats = services
        .ingest(IngestRequest {
            log_folder: log_folder.clone(),
            collection_name: config.storage.collection_name.clone(),
            workers: args.workers,
            reset: args.reset,
        })
        .await?;

    let response = IngestResponse {
        collection: config.storage.collection_name.clone(),
        log_folder: log_folder.to_string_lossy().into_owned(),
        files_discovered: stats.files_discovered,
        files_chunked: stats.files_chunked,
        files_failed: stats.files_failed,
        chunks_created: stats.chunks_created,
        chunks_indexed: stats.chunks_indexed,
        collection_size: stats.collection_size,
        duration_secs: stats.duration_ms as f64 / 1000.0,
    };

    match format {
        OutputFormat::Human => {
            if response.files_failed > 0 {
                output::print_warning(&format!(
                    "{} file(s) could not be chunked and were skipped",
                    response.files_failed
                ));
            }
            println!(
                "{} {} files ({} chunks) in {}",
                colors::success("Indexed"),
                colors::number(&response.files_chunked.to_string()),
                colors::number(&response.chunks_indexed.to_string()),
                colors::number(&format_duration(response.duration_secs))
            );
            println!(
                "Collection '{}' now holds {} chunks",
                colors::label(&response.collection),
                colors::number(&response.collection_size.to_string())
            );
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
