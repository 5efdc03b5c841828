//! Archive walker
//!
//! Discovers every post of a source by paginating `archive?page=N` until one
//! of the termination conditions holds:
//!
//! | Condition | Logged as |
//! |-----------|-----------|
//! | No post link on the page | info (end of archive) |
//! | Links, but none survive filtering | info (end of archive) |
//! | Every URL already seen | info (pagination looped) |
//! | HTTP 404 | info (end of archive) |
//! | Other HTTP status or network error | error (walk aborted) |
//!
//! Every termination is a clean stop: the URLs gathered so far are returned.

use crate::crawler::fetcher::{describe_network_error, is_end_of_listing, HttpFetcher, ARCHIVE_TIMEOUT};
use crate::crawler::parser::parse_archive_page;
use crate::url::archive_page_url;
use crate::FetchError;
use std::collections::HashSet;
use std::time::Duration;
use url::Url;

/// Walks the archive of one source and returns its post URLs
///
/// URLs come back in discovery order (page by page, document order within a
/// page) without duplicates. `delay` is slept between archive pages.
pub async fn discover_posts(fetcher: &HttpFetcher, root: &Url, delay: Duration) -> Vec<Url> {
    let mut seen: HashSet<Url> = HashSet::new();
    let mut ordered: Vec<Url> = Vec::new();
    let mut page = 1u32;

    loop {
        let archive_url = match archive_page_url(root, page) {
            Ok(url) => url,
            Err(e) => {
                tracing::error!("Could not build archive URL for {}: {}", root, e);
                break;
            }
        };

        tracing::info!("Fetching archive page: {}", archive_url);
        let response = match fetcher.get(archive_url.as_str(), ARCHIVE_TIMEOUT).await {
            Ok(response) => response,
            Err(FetchError::Status { status, .. }) if is_end_of_listing(status) => {
                tracing::info!(
                    "Archive page {} returned 404. Assuming end of archive.",
                    archive_url
                );
                break;
            }
            Err(FetchError::Status { status, .. }) => {
                tracing::error!("HTTP {} fetching archive page {}", status, archive_url);
                break;
            }
            Err(FetchError::Network { source, .. }) => {
                tracing::error!(
                    "Request error fetching archive page {}: {}",
                    archive_url,
                    describe_network_error(&source)
                );
                break;
            }
        };

        let parsed = parse_archive_page(&response.text(), root);
        if parsed.has_no_links() {
            tracing::info!(
                "No post links found on {}. Assuming end of archive.",
                archive_url
            );
            break;
        }

        if parsed.post_urls.is_empty() {
            tracing::info!(
                "No valid post URLs on {} after filtering. Assuming end of archive.",
                archive_url
            );
            break;
        }

        let new_urls: Vec<Url> = parsed
            .post_urls
            .into_iter()
            .filter(|url| !seen.contains(url))
            .collect();

        if new_urls.is_empty() {
            tracing::info!(
                "No new post URLs on page {} ({}). Assuming end of archive.",
                page,
                archive_url
            );
            break;
        }

        for url in &new_urls {
            tracing::debug!("Discovered post {}", url);
            seen.insert(url.clone());
        }
        let new_count = new_urls.len();
        ordered.extend(new_urls);

        tracing::info!(
            "Found {} new post URLs on page {}. Total unique URLs: {}",
            new_count,
            page,
            ordered.len()
        );

        page += 1;
        tokio::time::sleep(delay).await;
    }

    ordered
}
