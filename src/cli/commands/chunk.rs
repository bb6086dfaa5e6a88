//! Chunk command - preview stage chunks without indexing

use crate::cli::output::{self, colors, format_bytes};
use crate::cli::OutputFormat;
use crate::core::indexer::{ChunkingPipeline, StageChunker};
use crate::core::services::Services;
use crate::core::types::Chunk;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments for the chunk command
#[derive(Args, Debug)]
pub struct ChunkArgs {
    /// Log file, or folder searched recursively
    pub path: PathBuf,

    /// Stage marker regex with one capture group [default: indexing.stage_marker]
    #[arg(long, value_name = "REGEX")]
    pub marker: Option<String>,

    /// Lines of each chunk to print (0 prints headers only)
    #[arg(long, default_value = "3")]
    pub lines: usize,
}

/// One chunk in the preview
#[derive(Debug, Serialize)]
pub struct ChunkItem {
    pub source: String,
    pub stage: String,
    pub chunk_index: usize,
    pub start_offset: usize,
    pub end_offset: usize,
    pub text: String,
}

/// Chunk preview response
#[derive(Debug, Serialize)]
pub struct ChunkResponse {
    pub path: String,
    pub marker: String,
    pub total_chunks: usize,
    pub chunks: Vec<ChunkItem>,
}

/// Execute the chunk command
pub async fn execute(
    args: ChunkArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let indexing = &services.config.indexing;
    let marker = args
        .marker
        .clone()
        .unwrap_or_else(|| indexing.stage_marker.clone());
    let chunker = StageChunker::new(&marker)?;

    let chunks: Vec<Chunk> = if args.path.is_dir() {
        let pipeline = ChunkingPipeline::new(
            chunker,
            indexing.include_patterns.clone(),
            indexing.exclude_patterns.clone(),
            indexing.no_of_threads,
        )?;
        let mut chunks = pipeline.chunk_directory(&args.path).await?.into_result()?;
        // Merge order follows task completion; list by file instead
        chunks.sort_by(|a, b| {
            a.source
                .cmp(&b.source)
                .then(a.chunk_index.cmp(&b.chunk_index))
        });
        chunks
    } else {
        let path = args.path.clone();
        tokio::task::spawn_blocking(move || chunker.chunk_file(&path)).await??
    };

    let response = ChunkResponse {
        path: args.path.to_string_lossy().into_owned(),
        marker,
        total_chunks: chunks.len(),
        chunks: chunks
            .into_iter()
            .map(|c| ChunkItem {
                source: c.source.to_string_lossy().into_owned(),
                stage: c.stage,
                chunk_index: c.chunk_index,
                start_offset: c.start_offset,
                end_offset: c.end_offset,
                text: c.text,
            })
            .collect(),
    };

    match format {
        OutputFormat::Human => {
            if response.chunks.is_empty() {
                println!(
                    "No chunks in {}",
                    colors::file_path(&response.path)
                );
                return Ok(());
            }

            println!(
                "{} chunk(s) in {}:\n",
                colors::number(&response.total_chunks.to_string()),
                colors::file_path(&response.path)
            );
            for chunk in &response.chunks {
                println!(
                    "[{}] {} {} {}",
                    colors::number(&chunk.chunk_index.to_string()),
                    colors::stage(&chunk.stage),
                    colors::file_path(&chunk.source),
                    colors::dim(&format!(
                        "(bytes {}..{}, {})",
                        chunk.start_offset,
                        chunk.end_offset,
                        format_bytes((chunk.end_offset - chunk.start_offset) as u64)
                    ))
                );
                if args.lines > 0 {
                    output::print_excerpt(&chunk.text, args.lines);
                }
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
