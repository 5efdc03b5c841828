//! Crawler module for archive walking and post processing
//!
//! This module contains the core download logic, including:
//! - HTTP fetching with per-request timeouts
//! - Archive page parsing and post link filtering
//! - Paginated archive discovery
//! - Per-source orchestration of fetch, extract, localize and render

mod archive;
mod fetcher;
mod orchestrator;
mod parser;

pub use archive::discover_posts;
pub use fetcher::{
    build_http_client, describe_network_error, is_end_of_listing, FetchResponse, HttpFetcher,
    ARCHIVE_TIMEOUT, IMAGE_TIMEOUT, POST_TIMEOUT,
};
pub use orchestrator::{source_output_dirs, Orchestrator};
pub use parser::{parse_archive_page, ArchivePage};

use crate::config::Config;
use crate::output::SourceSummary;
use crate::Result;

/// Runs a complete download with the default collaborators
///
/// This is the main entry point for a run. For each configured source it
/// will:
/// 1. Load the download log (incremental mode)
/// 2. Walk the archive
/// 3. Fetch, extract, localize and render every new post
/// 4. Summarize the outcome
pub async fn download(config: Config) -> Result<Vec<SourceSummary>> {
    let orchestrator = Orchestrator::new(config)?;
    Ok(orchestrator.run().await)
}
