//! Run orchestrator - per-source and per-post control flow
//!
//! Each source moves through `Init → LoadLog → Discover → Process →
//! Summarize`. Every post is handled sequentially and any error it raises is
//! caught at the post boundary, so one broken post or source never stops the
//! run.

use crate::assets::localize_images;
use crate::config::Config;
use crate::crawler::archive::discover_posts;
use crate::crawler::fetcher::{HttpFetcher, POST_TIMEOUT};
use crate::extract::{extract_metadata, ContentExtractor, PostMetadata, ReadabilityLikeExtractor};
use crate::output::{
    date_prefix, output_filename, OutputFormat, PostRenderer, RenderError, RenderJob,
    SourceSummary,
};
use crate::state::{PostOutcome, SourceStage};
use crate::storage::{DownloadLog, DOWNLOAD_LOG_FILE};
use crate::url::{normalize_source_root, slugify, url_slug};
use crate::Result;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use url::Url;

/// Main run coordinator
pub struct Orchestrator {
    config: Config,
    fetcher: HttpFetcher,
    extractor: Box<dyn ContentExtractor>,
    renderer: PostRenderer,
}

impl Orchestrator {
    /// Creates an orchestrator with the default collaborators
    ///
    /// Builds the shared HTTP client from the configured user agent.
    pub fn new(config: Config) -> Result<Self> {
        let fetcher = HttpFetcher::with_user_agent(&config.user_agent)?;
        Ok(Self {
            config,
            fetcher,
            extractor: Box::new(ReadabilityLikeExtractor),
            renderer: PostRenderer::default(),
        })
    }

    pub fn with_fetcher(mut self, fetcher: HttpFetcher) -> Self {
        self.fetcher = fetcher;
        self
    }

    pub fn with_extractor(mut self, extractor: Box<dyn ContentExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_renderer(mut self, renderer: PostRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// Processes every configured source in order
    pub async fn run(&self) -> Vec<SourceSummary> {
        let formats = resolve_formats(&self.config.normalized_formats());
        let mut summaries = Vec::new();

        for (source, output_dir) in source_output_dirs(&self.config) {
            let root = match normalize_source_root(&source) {
                Ok(root) => root,
                Err(e) => {
                    tracing::error!("Skipping source {}: {}", source, e);
                    continue;
                }
            };

            let summary = self.process_source(&source, &root, &output_dir, &formats).await;
            summary.log();
            summaries.push(summary);
        }

        summaries
    }

    async fn process_source(
        &self,
        source: &str,
        root: &Url,
        output_dir: &Path,
        formats: &[OutputFormat],
    ) -> SourceSummary {
        let mut summary = SourceSummary::new(source, output_dir);
        let mut stage = SourceStage::Init;
        tracing::info!(
            "Processing {} into {}",
            root,
            output_dir.display()
        );

        if let Err(e) = std::fs::create_dir_all(output_dir) {
            tracing::error!(
                "Could not create output directory {}: {}",
                output_dir.display(),
                e
            );
            advance(&mut stage, SourceStage::Summarize);
            return summary;
        }

        let mut log = if self.config.incremental {
            advance(&mut stage, SourceStage::LoadLog);
            let log = DownloadLog::load(output_dir.join(DOWNLOAD_LOG_FILE));
            tracing::info!(
                "Found {} previously processed URLs in {}",
                log.len(),
                log.path().display()
            );
            Some(log)
        } else {
            None
        };

        advance(&mut stage, SourceStage::Discover);
        let post_urls = discover_posts(&self.fetcher, root, self.config.delay_duration()).await;
        summary.discovered = post_urls.len();
        tracing::info!("Discovered {} posts for {}", post_urls.len(), root);

        if post_urls.is_empty() {
            advance(&mut stage, SourceStage::Summarize);
            return summary;
        }

        advance(&mut stage, SourceStage::Process);
        for (i, post_url) in post_urls.iter().enumerate() {
            if log.as_ref().is_some_and(|log| log.contains(post_url.as_str())) {
                tracing::info!("Skipping already processed post: {}", post_url);
                summary.record(PostOutcome::Skipped);
                continue;
            }

            tracing::info!("Processing post {}/{}: {}", i + 1, post_urls.len(), post_url);
            let outcome = match self.process_post(post_url, output_dir, formats).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!("Failed to process {}: {}", post_url, e);
                    PostOutcome::Failed
                }
            };

            if outcome.is_error() {
                tracing::warn!("Post {} failed and is not marked as processed", post_url);
            } else if outcome.is_success() {
                if let Some(log) = log.as_mut() {
                    if let Err(e) = log.record(post_url.as_str()) {
                        tracing::error!(
                            "Could not update download log {}: {}",
                            log.path().display(),
                            e
                        );
                    }
                }
            }
            summary.record(outcome);

            tokio::time::sleep(self.config.delay_duration()).await;
        }

        advance(&mut stage, SourceStage::Summarize);
        summary
    }

    /// Fetches, extracts, localizes and renders one post
    ///
    /// Returns `Downloaded` only when every requested format was written.
    async fn process_post(
        &self,
        post_url: &Url,
        output_dir: &Path,
        formats: &[OutputFormat],
    ) -> Result<PostOutcome> {
        let response = self.fetcher.get(post_url.as_str(), POST_TIMEOUT).await?;
        let raw_html = response.text();

        let mut metadata = extract_metadata(&raw_html, post_url.as_str());
        let content = self.extractor.extract(&raw_html);
        metadata.resolve_title(content.extracted_title.as_deref());

        let slugs = PostSlugs::new(&metadata, post_url);

        let fragment = if self.config.download_images {
            let dest_dir = output_dir
                .join(&self.config.assets_dir_name)
                .join(&slugs.assets);
            let (rewritten, report) = localize_images(
                &self.fetcher,
                &content.html_fragment,
                post_url,
                &dest_dir,
                &slugs.assets,
                &self.config.assets_dir_name,
            )
            .await?;
            tracing::debug!(
                "Images for {}: {} localized, {} inline, {} failed",
                post_url,
                report.localized,
                report.inline_skipped,
                report.failed
            );
            rewritten
        } else {
            content.html_fragment
        };

        let today = chrono::Local::now().date_naive();
        let prefix = date_prefix(metadata.published_date.as_deref(), today);

        let mut all_ok = true;
        for &format in formats {
            let path = output_dir.join(output_filename(&prefix, &slugs.file, format));
            let job = RenderJob {
                format,
                output_path: &path,
                metadata: &metadata,
                fragment: &fragment,
            };

            match self.renderer.render(&job) {
                Ok(()) => tracing::info!("Saved {} to {}", format, path.display()),
                Err(e) => {
                    all_ok = false;
                    log_render_error(&e, format, &metadata);
                }
            }
        }

        Ok(if all_ok {
            PostOutcome::Downloaded
        } else {
            PostOutcome::Failed
        })
    }
}

/// File and asset directory names derived for one post
#[derive(Debug, Clone, PartialEq, Eq)]
struct PostSlugs {
    /// Stem of rendered filenames, after the date prefix
    file: String,
    /// Directory under the assets dir holding this post's images
    assets: String,
}

impl PostSlugs {
    fn new(metadata: &PostMetadata, post_url: &Url) -> Self {
        let from_url = url_slug(post_url);
        let title_slug = if metadata.has_placeholder_title() {
            String::new()
        } else {
            slugify(metadata.display_title())
        };

        let assets = if !title_slug.is_empty() {
            title_slug.clone()
        } else if !from_url.is_empty() {
            from_url.clone()
        } else {
            format!("post_{}", from_url)
        };

        let file = if title_slug.is_empty() {
            assets.clone()
        } else {
            title_slug
        };

        Self { file, assets }
    }
}

/// Parses format names, warning about and dropping unknown ones
fn resolve_formats(names: &[String]) -> Vec<OutputFormat> {
    let mut seen = HashSet::new();
    let mut formats = Vec::new();
    for name in names {
        match name.parse::<OutputFormat>() {
            Ok(format) => {
                if seen.insert(format) {
                    formats.push(format);
                }
            }
            Err(e) => tracing::warn!("{}; it will be skipped", e),
        }
    }
    formats
}

fn log_render_error(error: &RenderError, format: OutputFormat, metadata: &PostMetadata) {
    if error.is_converter_missing() {
        tracing::error!(
            "{} for {} output of '{}'. Install pandoc (and a PDF engine for pdf) to enable it.",
            error,
            format,
            metadata.display_title()
        );
    } else {
        tracing::error!(
            "Could not save {} output for '{}': {}",
            format,
            metadata.display_title(),
            error
        );
    }
}

fn advance(stage: &mut SourceStage, next: SourceStage) {
    if stage.is_terminal() {
        tracing::warn!("Source already finished, ignoring transition to {}", next);
        return;
    }
    if stage.can_transition_to(next) {
        tracing::debug!("Source stage {} -> {}", stage, next);
    } else {
        tracing::warn!("Unexpected source stage transition {} -> {}", stage, next);
    }
    *stage = next;
}

/// Pairs each non-empty source with its output directory
///
/// A single source writes straight into `output_dir`; several sources each
/// get a subdirectory named after their host (and port, when one is given).
pub fn source_output_dirs(config: &Config) -> Vec<(String, PathBuf)> {
    let sources: Vec<String> = config
        .substack_urls
        .iter()
        .map(|s| s.trim().to_string())
        .filter(|s| {
            if s.is_empty() {
                tracing::warn!("Skipping empty source URL entry");
            }
            !s.is_empty()
        })
        .collect();

    if sources.len() <= 1 {
        return sources
            .into_iter()
            .map(|s| (s, config.output_dir.clone()))
            .collect();
    }

    sources
        .into_iter()
        .enumerate()
        .map(|(i, source)| {
            let host_slug = Url::parse(&source)
                .ok()
                .and_then(|url| {
                    let host = url.host_str()?;
                    Some(match url.port() {
                        Some(port) => slugify(&format!("{}:{}", host, port)),
                        None => slugify(host),
                    })
                })
                .unwrap_or_default();
            let name = if host_slug.is_empty() {
                format!("source_{}", i + 1)
            } else {
                host_slug
            };
            let dir = config.output_dir.join(name);
            (source, dir)
        })
        .collect()
}
