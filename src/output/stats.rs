//! Per-source run statistics
//!
//! Each source processed by a run yields one `SourceSummary`. The summaries
//! are logged as the source finishes and printed together at the end.

use crate::state::PostOutcome;
use std::path::PathBuf;

/// Counts for one source within one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSummary {
    /// Source root URL as configured
    pub source: String,

    /// Directory the source's posts were written to
    pub output_dir: PathBuf,

    /// Number of post URLs found in the archive
    pub discovered: usize,

    /// Posts written in every requested format
    pub downloaded: usize,

    /// Posts skipped because the download log already had them
    pub skipped: usize,

    /// Posts that failed at any stage
    pub failed: usize,
}

impl SourceSummary {
    pub fn new(source: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            output_dir: output_dir.into(),
            discovered: 0,
            downloaded: 0,
            skipped: 0,
            failed: 0,
        }
    }

    /// Counts one post outcome
    pub fn record(&mut self, outcome: PostOutcome) {
        match outcome {
            PostOutcome::Downloaded => self.downloaded += 1,
            PostOutcome::Skipped => self.skipped += 1,
            PostOutcome::Failed => self.failed += 1,
        }
    }

    /// Posts that reached a terminal outcome
    pub fn processed(&self) -> usize {
        self.downloaded + self.skipped + self.failed
    }

    /// Logs the summary at info level
    pub fn log(&self) {
        tracing::info!(
            "Finished {}: {} discovered, {} downloaded, {} skipped, {} failed",
            self.source,
            self.discovered,
            self.downloaded,
            self.skipped,
            self.failed
        );
    }
}

/// Prints the run summary to stdout
pub fn print_run_summary(summaries: &[SourceSummary]) {
    println!("=== Download Summary ===\n");

    if summaries.is_empty() {
        println!("No sources were processed.");
        return;
    }

    for summary in summaries {
        println!("{}", summary.source);
        println!("  Output: {}", summary.output_dir.display());
        println!("  Discovered: {}", summary.discovered);
        println!("  Downloaded: {}", summary.downloaded);
        println!("  Skipped: {}", summary.skipped);
        println!("  Failed: {}", summary.failed);
        if summary.processed() < summary.discovered {
            println!(
                "  Not processed: {}",
                summary.discovered - summary.processed()
            );
        }
        println!();
    }

    let downloaded: usize = summaries.iter().map(|s| s.downloaded).sum();
    let skipped: usize = summaries.iter().map(|s| s.skipped).sum();
    let failed: usize = summaries.iter().map(|s| s.failed).sum();
    println!(
        "Total: {} downloaded, {} skipped, {} failed across {} source(s)",
        downloaded,
        skipped,
        failed,
        summaries.len()
    );
}
